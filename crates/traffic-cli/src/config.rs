//! Detection configuration from environment.

use std::env;
use traffic_core::SeparationRules;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub rules: SeparationRules,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any variable source; unset or unparsable values keep
    /// their defaults.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = SeparationRules::default();
        let read = |key: &str, fallback: f64| {
            get(key)
                .and_then(|s| s.parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            rules: SeparationRules {
                footprint_radius: read("TRAFFIC_FOOTPRINT_RADIUS", defaults.footprint_radius),
                clearance: read("TRAFFIC_CLEARANCE", defaults.clearance),
                time_tolerance: read("TRAFFIC_TIME_TOLERANCE", defaults.time_tolerance),
            },
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        footprint_radius: Option<f64>,
        clearance: Option<f64>,
        time_tolerance: Option<f64>,
    ) -> Self {
        if let Some(radius) = footprint_radius {
            self.rules.footprint_radius = radius;
        }
        if let Some(clearance) = clearance {
            self.rules.clearance = clearance;
        }
        if let Some(tolerance) = time_tolerance {
            self.rules.time_tolerance = tolerance;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn reads_vars_and_keeps_defaults() {
        let vars = HashMap::from([
            ("TRAFFIC_FOOTPRINT_RADIUS", "1.5"),
            ("TRAFFIC_CLEARANCE", "not-a-number"),
        ]);
        let config = Config::from_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.rules.footprint_radius, 1.5);
        assert_eq!(config.rules.clearance, 0.0);
        assert_eq!(config.rules.time_tolerance, 1e-6);
    }

    #[test]
    fn overrides_win_over_vars() {
        let config = Config::from_vars(|_| Some("2.0".to_string())).with_overrides(
            None,
            Some(0.25),
            None,
        );
        assert_eq!(config.rules.footprint_radius, 2.0);
        assert_eq!(config.rules.clearance, 0.25);
        assert_eq!(config.rules.safety_distance(), 4.25);
    }
}
