// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server configuration

use mock_stream_core::{DEFAULT_CHUNK_MAX_LEN, Pacing, StreamProfile};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

/// Environment variable naming a YAML configuration file
pub const CONFIG_ENV_VAR: &str = "MOCK_STREAM_CONFIG";

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {message}")]
    Invalid { message: String },

    #[error("Failed to read configuration file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ListenConfig,
    pub chat: ChatConfig,
    pub lorem: LoremConfig,
    pub generation: GenerationConfig,
    /// Precomputed responses served before the catalog is consulted
    pub collections: Vec<CollectionRecord>,
}

/// Listener and HTTP-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub bind_addr: SocketAddr,

    /// Allow any origin; otherwise only the local development origins
    pub enable_cors: bool,

    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3001)),
            enable_cors: false,
            max_body_size: 1024 * 1024,
        }
    }
}

/// `/api/chat` stream settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub profile: StreamProfile,
    pub chunk_max_len: usize,
    pub pacing: Pacing,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            profile: StreamProfile::default(),
            chunk_max_len: DEFAULT_CHUNK_MAX_LEN,
            pacing: Pacing {
                initial_delay_ms: 0,
                chunk_delay_ms: 30,
            },
        }
    }
}

/// `/api/lorem` stream settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoremConfig {
    pub profile: StreamProfile,
    pub pacing: Pacing,
}

impl Default for LoremConfig {
    fn default() -> Self {
        Self {
            profile: StreamProfile::Plain,
            pacing: Pacing {
                initial_delay_ms: 0,
                chunk_delay_ms: 10,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Fixed seed for template and filler selection. Every request draws a
    /// fresh seed when absent.
    pub seed: Option<u64>,
}

/// A canned prompt/response pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub prompt: String,
    pub response: String,
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path`, or from the file named by [`CONFIG_ENV_VAR`], or
    /// fall back to defaults. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR);
        let path = path.or(from_env.as_deref().map(Path::new));

        let config = match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading configuration file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_body_size == 0 {
            return Err(invalid("server.max_body_size must be greater than 0"));
        }
        if self.chat.chunk_max_len == 0 {
            return Err(invalid("chat.chunk_max_len must be greater than 0"));
        }
        for (section, profile) in [("chat", &self.chat.profile), ("lorem", &self.lorem.profile)] {
            if let StreamProfile::Namespaced { namespace } = profile {
                if namespace.trim().is_empty() {
                    return Err(invalid(&format!(
                        "{section}.profile.namespace must not be empty"
                    )));
                }
            }
        }
        if let Some(index) = self.collections.iter().position(|r| r.prompt.trim().is_empty()) {
            return Err(invalid(&format!(
                "collections[{index}].prompt must not be empty"
            )));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.lorem.profile, StreamProfile::Plain);
        assert_eq!(config.chat.chunk_max_len, 60);
        assert!(config.generation.seed.is_none());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server:
  bind_addr: "0.0.0.0:8080"
chat:
  profile:
    kind: namespaced
    namespace: acme
  pacing:
    chunk_delay_ms: 5
generation:
  seed: 42
collections:
  - prompt: "ping"
    response: "pong"
"#
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.server.max_body_size, 1024 * 1024);
        assert_eq!(
            config.chat.profile,
            StreamProfile::Namespaced {
                namespace: "acme".to_string()
            }
        );
        assert_eq!(config.chat.pacing.chunk_delay_ms, 5);
        assert_eq!(config.chat.pacing.initial_delay_ms, 0);
        assert_eq!(config.chat.chunk_max_len, 60);
        assert_eq!(config.generation.seed, Some(42));
        assert_eq!(config.collections.len(), 1);
        assert_eq!(config.lorem, LoremConfig::default());
    }

    #[test]
    fn yaml_roundtrip() {
        let config = ServerConfig {
            collections: vec![CollectionRecord {
                prompt: "a".to_string(),
                response: "b".to_string(),
            }],
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: ServerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_with_explicit_path_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chat:\n  chunk_max_len: 0").unwrap();
        let err = ServerConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");
    }

    #[test]
    fn rejects_empty_namespace_and_blank_collection_prompt() {
        let mut config = ServerConfig::default();
        config.chat.profile = StreamProfile::Namespaced {
            namespace: " ".to_string(),
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            collections: vec![CollectionRecord {
                prompt: "  ".to_string(),
                response: "x".to_string(),
            }],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("collections[0]"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ServerConfig::from_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
