use bevy::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Tunables for the slingshot and the trailing camera. Read once at
/// startup, immutable afterwards.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlingConfig {
    /// Screen-pixels-to-world scaling applied to the drag offset.
    pub sensitivity: f32,
    /// Maximum distance the ball can be pulled from the anchor.
    pub max_stretch: f32,
    /// Number of points in the trajectory preview. Independent of
    /// `max_stretch`.
    pub preview_samples: usize,
    /// Integration step used by the trajectory preview, in seconds.
    pub preview_timestep: f32,
    /// Multiplier on the squared anchor separation when computing
    /// launch speed.
    pub speed_scale: f32,
    /// `Name` of the collider that counts as ground when the ball
    /// lands. Collisions with anything else are ignored.
    pub ground_tag: String,
    /// Delay between touching the ground and snapping back to rest.
    pub reset_delay_secs: f32,
    /// Smoothing rate of the trailing camera.
    pub follow_speed: f32,
    /// Radius of the ball's collider and mesh; also pads the belt
    /// attachment point.
    pub ball_radius: f32,
}

impl Default for SlingConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            max_stretch: 5.0,
            preview_samples: 5,
            preview_timestep: 0.02,
            speed_scale: 10.0,
            ground_tag: "Ground".to_string(),
            reset_delay_secs: 1.0,
            follow_speed: 2.0,
            ball_radius: 0.5,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(err) => write!(f, "failed to read config file: {err}"),
            ConfigError::Parse(err) => write!(f, "failed to parse config file: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SlingConfig {
    /// Loads the config from `path`, falling back to defaults when the
    /// file does not exist. A malformed file or out-of-range values are
    /// a hard error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: Self = if path.exists() {
            let text = fs::read_to_string(path).map_err(ConfigError::Read)?;
            toml::from_str(&text).map_err(ConfigError::Parse)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sensitivity <= 0.0 {
            return Err(ConfigError::Invalid("sensitivity must be positive".into()));
        }
        if self.max_stretch <= 0.0 {
            return Err(ConfigError::Invalid("max_stretch must be positive".into()));
        }
        if self.preview_samples < 2 {
            return Err(ConfigError::Invalid(
                "preview_samples must be at least 2".into(),
            ));
        }
        if self.preview_timestep <= 0.0 {
            return Err(ConfigError::Invalid(
                "preview_timestep must be positive".into(),
            ));
        }
        if self.speed_scale <= 0.0 {
            return Err(ConfigError::Invalid("speed_scale must be positive".into()));
        }
        if self.ground_tag.is_empty() {
            return Err(ConfigError::Invalid("ground_tag must not be empty".into()));
        }
        if self.reset_delay_secs < 0.0 {
            return Err(ConfigError::Invalid(
                "reset_delay_secs must not be negative".into(),
            ));
        }
        if self.follow_speed <= 0.0 {
            return Err(ConfigError::Invalid("follow_speed must be positive".into()));
        }
        if self.ball_radius <= 0.0 {
            return Err(ConfigError::Invalid("ball_radius must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SlingConfig::default().validate().is_ok());
    }

    #[test]
    fn parses_partial_override() {
        let config: SlingConfig =
            toml::from_str("sensitivity = 0.2\nmax_stretch = 8.0\nground_tag = \"Floor\"")
                .expect("should parse");
        assert_eq!(config.sensitivity, 0.2);
        assert_eq!(config.max_stretch, 8.0);
        assert_eq!(config.ground_tag, "Floor");
        // Untouched fields keep their defaults.
        assert_eq!(config.preview_samples, 5);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<SlingConfig, _> = toml::from_str("no_such_knob = 1.0");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            "sensitivity = -0.1",
            "max_stretch = 0.0",
            "preview_samples = 1",
            "preview_timestep = 0.0",
            "speed_scale = -1.0",
            "ground_tag = \"\"",
            "reset_delay_secs = -1.0",
            "follow_speed = 0.0",
            "ball_radius = 0.0",
        ];
        for text in bad {
            let config: SlingConfig = toml::from_str(text).expect("should parse");
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "expected {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = SlingConfig::load("no-such-slingball-config.toml").expect("defaults");
        assert_eq!(config.max_stretch, SlingConfig::default().max_stretch);
    }
}
