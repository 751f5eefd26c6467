use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Reveal delay used when auto-advance is on but no delay was given.
pub const DEFAULT_DELAY_SECONDS: f64 = 4.0;

/// Unit system used when showing areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    #[must_use]
    pub fn area_suffix(self) -> &'static str {
        match self {
            UnitSystem::Imperial => "square miles",
            UnitSystem::Metric => "square kilometers",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Imperial => f.write_str("miles"),
            UnitSystem::Metric => f.write_str("km"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "miles" | "mi" | "imperial" => Ok(UnitSystem::Imperial),
            "km" | "metric" => Ok(UnitSystem::Metric),
            _ => Err(SettingsError::UnknownUnits(s.to_string())),
        }
    }
}

/// How a revealed answer gives way to the next question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvanceMode {
    /// The player moves on with an explicit command.
    #[default]
    Manual,
    /// Legacy mode: the session moves on by itself once `delay` has elapsed.
    Auto { delay: Duration },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("unknown unit system {0:?} (expected \"miles\" or \"km\")")]
    UnknownUnits(String),

    #[error("reveal delay must be a finite number of seconds, got {0}")]
    InvalidDelay(f64),

    #[error("auto-advance needs a reveal delay above zero")]
    ZeroDelay,
}

/// Options fixed for the lifetime of one session engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSettings {
    advance_mode: AdvanceMode,
    unit_system: UnitSystem,
}

/// Unvalidated settings as read from a config file or command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSettingsDraft {
    pub delay_seconds: Option<f64>,
    pub auto_advance: Option<bool>,
    pub units: Option<String>,
}

impl SessionSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` for an unknown unit name, a negative or non-finite delay,
    /// or auto-advance combined with a zero delay.
    pub fn validate(self) -> Result<SessionSettings, SettingsError> {
        let unit_system = match normalize_optional(self.units) {
            Some(raw) => raw.parse()?,
            None => UnitSystem::default(),
        };

        let delay = self.delay_seconds.unwrap_or(DEFAULT_DELAY_SECONDS);
        if !delay.is_finite() || delay < 0.0 {
            return Err(SettingsError::InvalidDelay(delay));
        }

        let advance_mode = if self.auto_advance.unwrap_or(false) {
            if delay == 0.0 {
                return Err(SettingsError::ZeroDelay);
            }
            let delay = Duration::try_from_secs_f64(delay)
                .map_err(|_| SettingsError::InvalidDelay(delay))?;
            AdvanceMode::Auto { delay }
        } else {
            AdvanceMode::Manual
        };

        Ok(SessionSettings {
            advance_mode,
            unit_system,
        })
    }
}

impl SessionSettings {
    #[must_use]
    pub fn new(advance_mode: AdvanceMode, unit_system: UnitSystem) -> Self {
        Self {
            advance_mode,
            unit_system,
        }
    }

    #[must_use]
    pub fn advance_mode(&self) -> AdvanceMode {
        self.advance_mode
    }

    #[must_use]
    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_is_manual_imperial() {
        let settings = SessionSettingsDraft::new().validate().unwrap();
        assert_eq!(settings.advance_mode(), AdvanceMode::Manual);
        assert_eq!(settings.unit_system(), UnitSystem::Imperial);
    }

    #[test]
    fn auto_advance_uses_default_delay() {
        let settings = SessionSettingsDraft {
            auto_advance: Some(true),
            ..SessionSettingsDraft::default()
        }
        .validate()
        .unwrap();
        assert_eq!(
            settings.advance_mode(),
            AdvanceMode::Auto {
                delay: Duration::from_secs(4)
            }
        );
    }

    #[test]
    fn accepts_persisted_unit_names() {
        assert_eq!("km".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!(" Miles ".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!(matches!(
            "furlongs".parse::<UnitSystem>(),
            Err(SettingsError::UnknownUnits(_))
        ));
    }

    #[test]
    fn blank_units_fall_back_to_default() {
        let settings = SessionSettingsDraft {
            units: Some("   ".into()),
            ..SessionSettingsDraft::default()
        }
        .validate()
        .unwrap();
        assert_eq!(settings.unit_system(), UnitSystem::Imperial);
    }

    #[test]
    fn rejects_bad_delays() {
        let negative = SessionSettingsDraft {
            delay_seconds: Some(-1.0),
            ..SessionSettingsDraft::default()
        };
        assert_eq!(negative.validate(), Err(SettingsError::InvalidDelay(-1.0)));

        let zero_auto = SessionSettingsDraft {
            delay_seconds: Some(0.0),
            auto_advance: Some(true),
            units: None,
        };
        assert_eq!(zero_auto.validate(), Err(SettingsError::ZeroDelay));
    }

    #[test]
    fn rejects_delays_too_long_to_schedule() {
        let huge = SessionSettingsDraft {
            delay_seconds: Some(1e30),
            auto_advance: Some(true),
            units: None,
        };
        assert_eq!(huge.validate(), Err(SettingsError::InvalidDelay(1e30)));
    }
}
