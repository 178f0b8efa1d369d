//! Configuration loading and typed config structures for a tracker.
//!
//! A tracker is configured from YAML. Every field has a default matching
//! the historical behavior of the recorder: a root named `root`, placement
//! after a timeline closes accepted, triggering from unplaced events
//! allowed, and 24-character identifiers.
//!
//! ```yaml
//! root_name: root
//! bounds: strict          # or lenient
//! trigger: require_placed # or allow_unplaced
//! id_length: 24
//! ```

use std::path::Path;

use houston_types::DEFAULT_ID_LENGTH;
use serde::Deserialize;

/// Environment variable overriding [`TrackerConfig::bounds`].
pub const BOUNDS_POLICY_ENV: &str = "HOUSTON_BOUNDS_POLICY";

/// Shortest accepted [`TrackerConfig::id_length`].
pub const MIN_ID_LENGTH: usize = 8;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unrecognized value.
    #[error("invalid value for {var}: {value:?}")]
    InvalidOverride {
        /// The environment variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Generated identifiers would be too short to stay unique.
    #[error("id_length {length} is below the minimum of {min}")]
    IdLengthTooShort {
        /// The configured length.
        length: usize,
        /// The smallest accepted length.
        min: usize,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Whether events may be placed on a timeline after it was joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Placement after `end` is accepted.
    #[default]
    Lenient,
    /// Placing an event stamped after `end` fails with `OutOfBounds`.
    Strict,
}

impl core::str::FromStr for BoundsPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(other.to_owned()),
        }
    }
}

/// What happens when an unplaced event triggers a successor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// The successor is created and left unplaced.
    #[default]
    AllowUnplaced,
    /// Triggering fails with `Unplaced`.
    RequirePlaced,
}

/// Tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackerConfig {
    /// Name given to the root timeline.
    #[serde(default = "default_root_name")]
    pub root_name: String,

    /// Placement policy for joined timelines.
    #[serde(default)]
    pub bounds: BoundsPolicy,

    /// Policy for triggering from unplaced events.
    #[serde(default)]
    pub trigger: TriggerPolicy,

    /// Length of generated identifiers.
    #[serde(default = "default_id_length")]
    pub id_length: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            bounds: BoundsPolicy::default(),
            trigger: TriggerPolicy::default(),
            id_length: default_id_length(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `HOUSTON_BOUNDS_POLICY` overrides `bounds` when set.
    ///
    /// # Errors
    ///
    /// Same as [`from_yaml_file`](Self::from_yaml_file), plus
    /// [`ConfigError::InvalidOverride`] if the override is unrecognized.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_yaml_file(path)?;
        config.apply_env_overrides(std::env::var(BOUNDS_POLICY_ENV).ok().as_deref())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Same as [`from_yaml`](Self::from_yaml), plus
    /// [`ConfigError::InvalidOverride`] if the override is unrecognized.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::from_yaml(yaml)?;
        config.apply_env_overrides(std::env::var(BOUNDS_POLICY_ENV).ok().as_deref())?;
        Ok(config)
    }

    /// Load and validate a YAML file, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// the errors of [`from_yaml`](Self::from_yaml).
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML string, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::IdLengthTooShort`] if `id_length` is below
    /// [`MIN_ID_LENGTH`].
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IdLengthTooShort`] if `id_length` is below
    /// [`MIN_ID_LENGTH`].
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.id_length < MIN_ID_LENGTH {
            return Err(ConfigError::IdLengthTooShort {
                length: self.id_length,
                min: MIN_ID_LENGTH,
            });
        }
        Ok(())
    }

    /// Apply the bounds-policy override, if one is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] for unrecognized values.
    pub fn apply_env_overrides(&mut self, bounds: Option<&str>) -> Result<(), ConfigError> {
        if let Some(raw) = bounds {
            self.bounds = raw.parse().map_err(|value| ConfigError::InvalidOverride {
                var: BOUNDS_POLICY_ENV,
                value,
            })?;
        }
        Ok(())
    }
}

fn default_root_name() -> String {
    "root".to_owned()
}

const fn default_id_length() -> usize {
    DEFAULT_ID_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_historical_behavior() {
        let config = TrackerConfig::default();
        assert_eq!(config.root_name, "root");
        assert_eq!(config.bounds, BoundsPolicy::Lenient);
        assert_eq!(config.trigger, TriggerPolicy::AllowUnplaced);
        assert_eq!(config.id_length, 24);
    }

    #[test]
    fn yaml_fields_deserialize() {
        let config: Result<TrackerConfig, _> =
            serde_yml::from_str("root_name: main\nbounds: strict\ntrigger: require_placed\n");
        let config = config.ok();
        assert_eq!(config.as_ref().map(|c| c.root_name.as_str()), Some("main"));
        assert_eq!(config.as_ref().map(|c| c.bounds), Some(BoundsPolicy::Strict));
        assert_eq!(
            config.as_ref().map(|c| c.trigger),
            Some(TriggerPolicy::RequirePlaced)
        );
        assert_eq!(config.map(|c| c.id_length), Some(24));
    }

    #[test]
    fn empty_mapping_uses_defaults() {
        let config: Result<TrackerConfig, _> = serde_yml::from_str("{}");
        assert_eq!(config.ok(), Some(TrackerConfig::default()));
    }

    #[test]
    fn override_replaces_bounds() {
        let mut config = TrackerConfig::default();
        assert!(config.apply_env_overrides(Some("STRICT")).is_ok());
        assert_eq!(config.bounds, BoundsPolicy::Strict);
        assert!(config.apply_env_overrides(None).is_ok());
        assert_eq!(config.bounds, BoundsPolicy::Strict);
    }

    #[test]
    fn bad_override_is_rejected() {
        let mut config = TrackerConfig::default();
        let result = config.apply_env_overrides(Some("sometimes"));
        assert!(matches!(result, Err(ConfigError::InvalidOverride { .. })));
        assert_eq!(config.bounds, BoundsPolicy::Lenient);
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result: Result<TrackerConfig, ConfigError> =
            serde_yml::from_str::<TrackerConfig>("bounds: [").map_err(ConfigError::from);
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn from_file_reads_yaml() {
        let dir = tempfile::tempdir().ok();
        let path = dir.as_ref().map(|d| d.path().join("houston.yaml"));
        let written = path
            .as_ref()
            .map(|p| std::fs::write(p, "root_name: session\nid_length: 8\n").is_ok());
        assert_eq!(written, Some(true));
        let config = path.and_then(|p| TrackerConfig::from_yaml_file(&p).ok());
        assert_eq!(config.as_ref().map(|c| c.root_name.as_str()), Some("session"));
        assert_eq!(config.as_ref().map(|c| c.bounds), Some(BoundsPolicy::Lenient));
        assert_eq!(config.map(|c| c.id_length), Some(8));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().ok();
        let result = dir
            .as_ref()
            .map(|d| TrackerConfig::from_yaml_file(&d.path().join("absent.yaml")));
        assert!(matches!(result, Some(Err(ConfigError::Io { .. }))));
    }

    #[test]
    fn zero_id_length_is_rejected() {
        let result = TrackerConfig::from_yaml("id_length: 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::IdLengthTooShort { length: 0, min: MIN_ID_LENGTH })
        ));
    }

    #[test]
    fn short_id_length_is_rejected_and_minimum_accepted() {
        let short = TrackerConfig::from_yaml("id_length: 7\n");
        assert!(matches!(short, Err(ConfigError::IdLengthTooShort { length: 7, .. })));
        let minimum = TrackerConfig::from_yaml("id_length: 8\n").ok();
        assert_eq!(minimum.map(|c| c.id_length), Some(MIN_ID_LENGTH));
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(TrackerConfig::default().validate().is_ok());
    }
}
