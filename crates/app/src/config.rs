//! Session settings from an optional TOML file plus command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;
use trivia_core::model::{SessionSettings, SessionSettingsDraft};

/// Layout of the config file:
///
/// ```toml
/// [session]
/// delay_seconds = 2
/// auto_advance = true
/// units = "km"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    session: SessionSettingsDraft,
}

/// Values given on the command line. They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub delay_seconds: Option<f64>,
    pub auto_advance: bool,
    pub units: Option<String>,
}

/// Resolve the settings for this run. They stay fixed until the process exits.
///
/// # Errors
///
/// Fails if the config file cannot be read or parsed, or the merged settings are invalid.
pub fn load_settings(path: Option<&Path>, overrides: Overrides) -> Result<SessionSettings> {
    let mut draft = match path {
        Some(path) => read_config(path)?.session,
        None => SessionSettingsDraft::new(),
    };

    if overrides.delay_seconds.is_some() {
        draft.delay_seconds = overrides.delay_seconds;
    }
    if overrides.auto_advance {
        draft.auto_advance = Some(true);
    }
    if overrides.units.is_some() {
        draft.units = overrides.units;
    }

    debug!(?draft, "resolved settings draft");
    draft.validate().context("invalid session settings")
}

fn read_config(path: &Path) -> Result<ConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use tempfile::NamedTempFile;
    use trivia_core::model::{AdvanceMode, UnitSystem};

    use super::*;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let settings = load_settings(None, Overrides::default()).unwrap();
        assert_eq!(settings.advance_mode(), AdvanceMode::Manual);
        assert_eq!(settings.unit_system(), UnitSystem::Imperial);
    }

    #[test]
    fn reads_session_table() {
        let file = config_file("[session]\ndelay_seconds = 2\nauto_advance = true\nunits = \"km\"\n");
        let settings = load_settings(Some(file.path()), Overrides::default()).unwrap();
        assert_eq!(
            settings.advance_mode(),
            AdvanceMode::Auto {
                delay: Duration::from_secs(2)
            }
        );
        assert_eq!(settings.unit_system(), UnitSystem::Metric);
    }

    #[test]
    fn command_line_wins_over_file() {
        let file = config_file("[session]\nunits = \"km\"\ndelay_seconds = 9\n");
        let overrides = Overrides {
            delay_seconds: Some(1.5),
            auto_advance: true,
            units: Some("miles".into()),
        };
        let settings = load_settings(Some(file.path()), overrides).unwrap();
        assert_eq!(
            settings.advance_mode(),
            AdvanceMode::Auto {
                delay: Duration::from_millis(1500)
            }
        );
        assert_eq!(settings.unit_system(), UnitSystem::Imperial);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = config_file("[session]\ncolour = \"blue\"\n");
        let err = load_settings(Some(file.path()), Overrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }

    #[test]
    fn invalid_units_are_reported() {
        let overrides = Overrides {
            units: Some("furlongs".into()),
            ..Overrides::default()
        };
        let err = load_settings(None, overrides).unwrap_err();
        assert!(format!("{err:#}").contains("unknown unit system"));
    }
}
