//! Configuration system
//!
//! [`Config`] gives any serde type TOML/RON file loading; [`CollisionConfig`]
//! holds the tunables shared by the pipeline and the resolver.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value parsed but is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How the narrow phase places the reported contact point.
///
/// Both modes are approximations; neither is a true contact manifold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactEstimate {
    /// Midpoint of the centers, slid along the contact normal to the middle of
    /// the overlap interval on that axis
    #[default]
    OverlapMidpoint,
    /// Plain average of the two box centers
    CenterAverage,
}

/// Tunables for the collision pipeline and resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Candidate SAT axes with squared length at or below this are skipped
    pub axis_epsilon: f32,
    /// Ray direction components below this count as parallel to a slab
    pub parallel_epsilon: f32,
    /// Contact point placement
    pub contact_estimate: ContactEstimate,
    /// Mass used when the scene supplies none
    pub default_mass: f32,
    /// Default resolver strength in [0, 1]
    pub separation_strength: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            axis_epsilon: 1e-6,
            parallel_epsilon: 1e-6,
            contact_estimate: ContactEstimate::default(),
            default_mass: 1.0,
            separation_strength: 1.0,
        }
    }
}

impl Config for CollisionConfig {}

impl CollisionConfig {
    /// Set the contact point estimate
    pub fn with_contact_estimate(mut self, estimate: ContactEstimate) -> Self {
        self.contact_estimate = estimate;
        self
    }

    /// Set the default separation strength
    pub fn with_separation_strength(mut self, strength: f32) -> Self {
        self.separation_strength = strength;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be finite and positive, got {value}")))
            }
        };

        positive("axis_epsilon", self.axis_epsilon)?;
        positive("parallel_epsilon", self.parallel_epsilon)?;
        positive("default_mass", self.default_mass)?;

        if !(0.0..=1.0).contains(&self.separation_strength) {
            return Err(ConfigError::Invalid(format!(
                "separation_strength must be in [0, 1], got {}",
                self.separation_strength
            )));
        }

        Ok(())
    }
}
