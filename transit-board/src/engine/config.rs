//! Tunable constants for the departure engine.
//!
//! [`EngineConfig::validate`] is the one place accepted ranges are enforced;
//! `from_env` and `from_lookup` never return a config outside them. The
//! getters convert without clamping, except that timer periods are never
//! zero because tokio rejects a zero period. Windows built from unchecked
//! values stay well-formed through [`DepartureWindow::new`].
//!
//! [`DepartureWindow::new`]: crate::domain::DepartureWindow::new

use chrono::Duration;

use crate::domain::BucketScheme;
use crate::sampler::Easing;

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Value could not be parsed
    #[error("{var}: cannot parse {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Value parsed but is outside the accepted range
    #[error("{var}: must be between {min} and {max}")]
    OutOfRange { var: &'static str, min: i64, max: i64 },
}

/// Longest accepted travel time or approach window (one day).
pub const MAX_WINDOW_MINS: i64 = 24 * 60;

/// Longest accepted board refresh period (one hour).
pub const MAX_REFRESH_SECS: u64 = 60 * 60;

/// Longest accepted marker frame period.
pub const MAX_FRAME_MILLIS: u64 = 10_000;

/// Configuration parameters for the departure engine and sampler.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Time from scheduled departure to arrival (minutes).
    pub travel_mins: i64,

    /// Lead time before departure shown as "approaching" (minutes).
    pub approach_mins: i64,

    /// Coarse refresh cadence of the departure board (seconds).
    pub refresh_secs: u64,

    /// Frame cadence of marker smoothing (milliseconds).
    pub frame_millis: u64,

    /// How weekdays map onto timetable lists.
    pub bucket_scheme: BucketScheme,

    /// Easing applied between progress samples.
    pub easing: Easing,
}

impl EngineConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        travel_mins: i64,
        approach_mins: i64,
        refresh_secs: u64,
        frame_millis: u64,
        bucket_scheme: BucketScheme,
        easing: Easing,
    ) -> Self {
        Self {
            travel_mins,
            approach_mins,
            refresh_secs,
            frame_millis,
            bucket_scheme,
            easing,
        }
    }

    /// Read configuration from `TRANSIT_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("TRANSIT_TRAVEL_MINS") {
            config.travel_mins = parse_number("TRANSIT_TRAVEL_MINS", &v)?;
        }
        if let Some(v) = lookup("TRANSIT_APPROACH_MINS") {
            config.approach_mins = parse_number("TRANSIT_APPROACH_MINS", &v)?;
        }
        if let Some(v) = lookup("TRANSIT_REFRESH_SECS") {
            config.refresh_secs = parse_number("TRANSIT_REFRESH_SECS", &v)?;
        }
        if let Some(v) = lookup("TRANSIT_FRAME_MILLIS") {
            config.frame_millis = parse_number("TRANSIT_FRAME_MILLIS", &v)?;
        }
        if let Some(v) = lookup("TRANSIT_BUCKETS") {
            config.bucket_scheme = match v.trim() {
                "three" => BucketScheme::ThreeBucket,
                "two" => BucketScheme::WeekdayWeekend,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "TRANSIT_BUCKETS",
                        value: v,
                        reason: "expected \"three\" or \"two\"",
                    });
                }
            };
        }
        if let Some(v) = lookup("TRANSIT_EASING") {
            config.easing = match v.trim() {
                "linear" => Easing::Linear,
                "ease-in-out" => Easing::EaseInOutCubic,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "TRANSIT_EASING",
                        value: v,
                        reason: "expected \"linear\" or \"ease-in-out\"",
                    });
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("TRANSIT_TRAVEL_MINS", self.travel_mins, 0, MAX_WINDOW_MINS)?;
        check_range("TRANSIT_APPROACH_MINS", self.approach_mins, 0, MAX_WINDOW_MINS)?;
        check_range(
            "TRANSIT_REFRESH_SECS",
            saturating_i64(self.refresh_secs),
            1,
            saturating_i64(MAX_REFRESH_SECS),
        )?;
        check_range(
            "TRANSIT_FRAME_MILLIS",
            saturating_i64(self.frame_millis),
            1,
            saturating_i64(MAX_FRAME_MILLIS),
        )?;
        Ok(())
    }

    /// Returns the travel time as a Duration.
    pub fn travel(&self) -> Duration {
        minutes(self.travel_mins)
    }

    /// Returns the approach window as a Duration.
    pub fn approach(&self) -> Duration {
        minutes(self.approach_mins)
    }

    /// Returns the board refresh period. Never zero.
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_secs.max(1))
    }

    /// Returns the marker frame period. Never zero.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_millis.max(1))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            travel_mins: 45,
            approach_mins: 60,
            refresh_secs: 5,
            frame_millis: 50,
            bucket_scheme: BucketScheme::ThreeBucket,
            easing: Easing::Linear,
        }
    }
}

fn check_range(var: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { var, min, max })
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Minutes as a Duration, saturating at the ends of the Duration range.
fn minutes(mins: i64) -> Duration {
    Duration::try_minutes(mins).unwrap_or(if mins < 0 { Duration::MIN } else { Duration::MAX })
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: "not a number",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.travel_mins, 45);
        assert_eq!(config.approach_mins, 60);
        assert_eq!(config.refresh_secs, 5);
        assert_eq!(config.frame_millis, 50);
        assert_eq!(config.bucket_scheme, BucketScheme::ThreeBucket);
        assert_eq!(config.easing, Easing::Linear);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn duration_methods() {
        let config = EngineConfig::default();

        assert_eq!(config.travel(), Duration::minutes(45));
        assert_eq!(config.approach(), Duration::minutes(60));
        assert_eq!(config.refresh_interval(), std::time::Duration::from_secs(5));
        assert_eq!(config.frame_interval(), std::time::Duration::from_millis(50));
    }

    #[test]
    fn getters_convert_unchecked_values() {
        let config = EngineConfig::new(-5, 90, 0, 0, BucketScheme::ThreeBucket, Easing::Linear);

        assert_eq!(config.travel(), Duration::minutes(-5));
        assert_eq!(config.approach(), Duration::minutes(90));
        assert_eq!(config.refresh_interval(), std::time::Duration::from_secs(1));
        assert_eq!(config.frame_interval(), std::time::Duration::from_millis(1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn extreme_minutes_saturate() {
        let config = EngineConfig::new(
            i64::MAX,
            i64::MIN,
            5,
            50,
            BucketScheme::ThreeBucket,
            Easing::Linear,
        );

        assert_eq!(config.travel(), Duration::MAX);
        assert_eq!(config.approach(), Duration::MIN);
    }

    #[test]
    fn from_lookup_empty_is_default() {
        let config = EngineConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.travel_mins, 45);
        assert_eq!(config.approach_mins, 60);
    }

    #[test]
    fn from_lookup_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("TRANSIT_TRAVEL_MINS", "30"),
            ("TRANSIT_APPROACH_MINS", " 20 "),
            ("TRANSIT_REFRESH_SECS", "10"),
            ("TRANSIT_FRAME_MILLIS", "16"),
            ("TRANSIT_BUCKETS", "two"),
            ("TRANSIT_EASING", "ease-in-out"),
        ]))
        .unwrap();

        assert_eq!(config.travel_mins, 30);
        assert_eq!(config.approach_mins, 20);
        assert_eq!(config.refresh_secs, 10);
        assert_eq!(config.frame_millis, 16);
        assert_eq!(config.bucket_scheme, BucketScheme::WeekdayWeekend);
        assert_eq!(config.easing, Easing::EaseInOutCubic);
    }

    #[test]
    fn from_lookup_rejects_garbage() {
        let err = EngineConfig::from_lookup(lookup(&[("TRANSIT_TRAVEL_MINS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "TRANSIT_TRAVEL_MINS: cannot parse \"soon\" (not a number)"
        );

        assert!(EngineConfig::from_lookup(lookup(&[("TRANSIT_BUCKETS", "four")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[("TRANSIT_EASING", "bounce")])).is_err());
    }

    #[test]
    fn from_lookup_rejects_out_of_range() {
        let err = EngineConfig::from_lookup(lookup(&[("TRANSIT_APPROACH_MINS", "-10")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "TRANSIT_APPROACH_MINS: must be between 0 and 1440");

        assert!(EngineConfig::from_lookup(lookup(&[("TRANSIT_REFRESH_SECS", "0")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[("TRANSIT_REFRESH_SECS", "3601")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[("TRANSIT_FRAME_MILLIS", "0")])).is_err());
    }

    #[test]
    fn from_lookup_rejects_oversized_durations() {
        let err = EngineConfig::from_lookup(lookup(&[("TRANSIT_TRAVEL_MINS", "1000000000000")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::OutOfRange {
                var: "TRANSIT_TRAVEL_MINS",
                min: 0,
                max: MAX_WINDOW_MINS,
            }
        );

        assert!(EngineConfig::from_lookup(lookup(&[("TRANSIT_APPROACH_MINS", "1441")])).is_err());

        let config = EngineConfig::from_lookup(lookup(&[
            ("TRANSIT_TRAVEL_MINS", "1440"),
            ("TRANSIT_APPROACH_MINS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.travel(), Duration::days(1));
    }
}
