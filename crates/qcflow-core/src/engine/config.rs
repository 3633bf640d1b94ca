use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for invoking the external engine.
///
/// All fields have compile-time-known defaults; a TOML file can override any
/// subset of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// The engine executable invoked for each job.
    pub executable: PathBuf,
    /// Extension appended to generated input decks.
    pub input_extension: String,
    /// Extension of the output file the engine writes next to the input.
    pub output_extension: String,
    /// Kill a job's subprocess after this many seconds. `None` waits
    /// indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("g09"),
            input_extension: ".gjf".to_string(),
            output_extension: ".log".to_string(),
            timeout_seconds: None,
        }
    }
}

impl EngineConfig {
    /// Loads a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// The subprocess timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.executable, PathBuf::from("g09"));
        assert_eq!(config.input_extension, ".gjf");
        assert_eq!(config.output_extension, ".log");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(
            f,
            "executable = \"/opt/g16/g16\"\ntimeout_seconds = 3600\n"
        )
        .unwrap();

        let config = EngineConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.executable, PathBuf::from("/opt/g16/g16"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(3600)));
        assert_eq!(config.input_extension, ".gjf");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<EngineConfig>("excutable = \"g09\"").is_err());
    }
}
