//! `FillingConfig` and the `config.txt` key/value format it round-trips through.
//!
//! Format: one `key value` pair per line, whitespace separated. Unknown keys,
//! unknown method names, and unparsable numbers are reported as
//! [`ConfigError`] rather than silently defaulted — input errors are never
//! swallowed (see the crate's error-handling design).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Seed-selection strategy for [`crate::FillingConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillingMethod {
    ConsecutivePerimeter,
    RandomPerimeter,
    ConsecutiveRadial,
    RandomRadial,
}

impl FillingMethod {
    const fn as_str(self) -> &'static str {
        match self {
            FillingMethod::ConsecutivePerimeter => "ConsecutivePerimeter",
            FillingMethod::RandomPerimeter => "RandomPerimeter",
            FillingMethod::ConsecutiveRadial => "ConsecutiveRadial",
            FillingMethod::RandomRadial => "RandomRadial",
        }
    }
}

impl fmt::Display for FillingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillingMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ConsecutivePerimeter" => Ok(FillingMethod::ConsecutivePerimeter),
            "RandomPerimeter" => Ok(FillingMethod::RandomPerimeter),
            "ConsecutiveRadial" => Ok(FillingMethod::ConsecutiveRadial),
            "RandomRadial" => Ok(FillingMethod::RandomRadial),
            other => Err(ConfigError::UnknownMethod(other.to_string())),
        }
    }
}

/// Errors raised while parsing or validating a `config.txt` file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    #[error("unknown filling method `{0}`")]
    UnknownMethod(String),
    #[error("malformed line in config file: `{0}`")]
    MalformedLine(String),
    #[error("invalid integer for `{key}`: `{value}`")]
    InvalidInt { key: &'static str, value: String },
    #[error("invalid float for `{key}`: `{value}`")]
    InvalidFloat { key: &'static str, value: String },
    #[error("io error reading config file")]
    Io(#[from] std::io::Error),
}

/// Tunable parameters of a single fill attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillingConfig {
    pub method: FillingMethod,
    pub collision_radius: u32,
    pub repulsion: f64,
    pub step_length: u32,
    pub print_radius: u32,
    pub starting_point_separation: u32,
    pub seed: u32,
}

impl FillingConfig {
    pub fn new(
        method: FillingMethod,
        collision_radius: u32,
        repulsion: f64,
        step_length: u32,
        print_radius: u32,
        starting_point_separation: u32,
        seed: u32,
    ) -> Self {
        Self {
            method,
            collision_radius,
            repulsion,
            step_length,
            print_radius,
            starting_point_separation,
            seed,
        }
    }

    /// Parse a `config.txt`-formatted string (whitespace-separated `key value` lines).
    pub fn from_str_config(contents: &str) -> Result<Self, ConfigError> {
        let mut method = None;
        let mut collision_radius = None;
        let mut repulsion = None;
        let mut step_length = None;
        let mut print_radius = None;
        let mut starting_point_separation = None;
        let mut seed = None;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let key = parts
                .next()
                .ok_or_else(|| ConfigError::MalformedLine(line.to_string()))?;
            let value = parts
                .next()
                .ok_or_else(|| ConfigError::MalformedLine(line.to_string()))?;

            match key {
                "InitialFillingMethod" => method = Some(value.parse::<FillingMethod>()?),
                "CollisionRadius" => collision_radius = Some(parse_u32("CollisionRadius", value)?),
                "Repulsion" => repulsion = Some(parse_f64("Repulsion", value)?),
                "StepLength" => step_length = Some(parse_u32("StepLength", value)?),
                "PrintRadius" => print_radius = Some(parse_u32("PrintRadius", value)?),
                "StartingPointSeparation" => {
                    starting_point_separation = Some(parse_u32("StartingPointSeparation", value)?)
                }
                "Seed" => seed = Some(parse_u32("Seed", value)?),
                other => return Err(ConfigError::UnknownKey(other.to_string())),
            }
        }

        Ok(FillingConfig {
            method: method.unwrap_or(FillingMethod::ConsecutiveRadial),
            collision_radius: collision_radius.unwrap_or(1),
            repulsion: repulsion.unwrap_or(0.7),
            step_length: step_length.unwrap_or(1),
            print_radius: print_radius.unwrap_or(1),
            starting_point_separation: starting_point_separation.unwrap_or(1),
            seed: seed.unwrap_or(0),
        })
    }

    /// Render in the same `key value` format [`FillingConfig::from_str_config`] accepts.
    pub fn to_config_string(&self) -> String {
        format!(
            "InitialFillingMethod {}\nCollisionRadius {}\nRepulsion {}\nStepLength {}\nPrintRadius {}\nStartingPointSeparation {}\nSeed {}\n",
            self.method,
            self.collision_radius,
            self.repulsion,
            self.step_length,
            self.print_radius,
            self.starting_point_separation,
            self.seed,
        )
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded filling config");
        Self::from_str_config(&contents)
    }

    /// Returns a copy with `collision_radius` replaced.
    pub fn with_collision_radius(&self, collision_radius: u32) -> Self {
        Self { collision_radius, ..*self }
    }

    /// Returns a copy with `repulsion` replaced.
    pub fn with_repulsion(&self, repulsion: f64) -> Self {
        Self { repulsion, ..*self }
    }

    /// Returns a copy with `starting_point_separation` replaced.
    pub fn with_starting_point_separation(&self, starting_point_separation: u32) -> Self {
        Self {
            starting_point_separation,
            ..*self
        }
    }

    /// Returns a copy with `seed` replaced.
    pub fn with_seed(&self, seed: u32) -> Self {
        Self { seed, ..*self }
    }
}

fn parse_u32(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidInt {
        key,
        value: value.to_string(),
    })
}

fn parse_f64(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidFloat {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FillingConfig {
        FillingConfig::new(FillingMethod::ConsecutiveRadial, 2, 0.7, 3, 1, 3, 42)
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let config = sample();
        let text = config.to_config_string();
        let reparsed = FillingConfig::from_str_config(&text).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = FillingConfig::from_str_config("NotAKey 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(k) if k == "NotAKey"));
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = FillingConfig::from_str_config("InitialFillingMethod Sideways\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMethod(m) if m == "Sideways"));
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let err = FillingConfig::from_str_config("CollisionRadius abc\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInt { key: "CollisionRadius", .. }));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = FillingConfig::from_str_config("Seed 7\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.method, FillingMethod::ConsecutiveRadial);
        assert_eq!(config.print_radius, 1);
    }

    #[test]
    fn load_from_missing_file_is_an_io_error() {
        let err = FillingConfig::load_from(Path::new("__does_not_exist__.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn load_from_reads_a_config_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, sample().to_config_string()).unwrap();

        let loaded = FillingConfig::load_from(&path).unwrap();
        assert_eq!(loaded, sample());
    }
}
