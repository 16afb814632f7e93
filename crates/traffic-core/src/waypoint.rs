//! Timestamped pose and velocity samples.

use serde::{Deserialize, Serialize};

/// Timestamp of a waypoint.
///
/// The unit is chosen by the caller. Velocities are expressed in distance
/// per this same unit.
pub type Time = i64;

/// Pose in the plane: `[x, y, yaw]`.
pub type Position = [f64; 3];

/// Screw velocity: `[vx, vy, yaw_rate]`.
pub type Velocity = [f64; 3];

/// A pose and velocity that a vehicle must reach at a given time.
///
/// This is also the exchange record handed in by planners, so it
/// serializes as `{ "time", "position", "velocity" }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    time: Time,
    position: Position,
    velocity: Velocity,
}

impl Waypoint {
    pub fn new(time: Time, position: Position, velocity: Velocity) -> Self {
        Self {
            time,
            position,
            velocity,
        }
    }

    /// Time at which this waypoint must be reached.
    pub fn time(&self) -> Time {
        self.time
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// True when no position or velocity component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.position
            .iter()
            .chain(self.velocity.iter())
            .all(|v| v.is_finite())
    }

    /// Planar `(x, y)` part of the position.
    pub fn xy(&self) -> (f64, f64) {
        (self.position[0], self.position[1])
    }
}
