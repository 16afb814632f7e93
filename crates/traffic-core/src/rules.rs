//! Separation rules and thresholds for conflict detection.

use serde::{Deserialize, Serialize};

/// Configuration for conflict detection.
///
/// Distances are in the units of waypoint positions; `time_tolerance` is in
/// the units of waypoint times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationRules {
    /// Radius of the circular footprint of each vehicle
    pub footprint_radius: f64,
    /// Extra gap required between two footprints
    pub clearance: f64,
    /// How precisely the onset of a conflict is located
    pub time_tolerance: f64,
}

impl Default for SeparationRules {
    fn default() -> Self {
        Self {
            footprint_radius: 0.5,
            clearance: 0.0,
            time_tolerance: 1e-6,
        }
    }
}

impl SeparationRules {
    /// Rules whose safety distance is exactly `distance`.
    pub fn with_safety_distance(distance: f64) -> Self {
        Self {
            footprint_radius: distance / 2.0,
            clearance: 0.0,
            ..Self::default()
        }
    }

    /// Centre-to-centre distance below which two vehicles conflict.
    pub fn safety_distance(&self) -> f64 {
        (2.0 * self.footprint_radius + self.clearance).max(0.0)
    }
}
