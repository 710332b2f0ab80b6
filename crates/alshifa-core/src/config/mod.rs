//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Al-Shifa configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub agents: AgentsConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Patient used by the scheduling agent when the request names none
    pub default_patient_id: String,
    /// The only role allowed through the revenue gate
    pub finance_role: String,
    /// Run-out projections below this many days raise a warning
    pub runout_warning_days: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    /// JSON snapshot replacing the built-in clinic fixtures
    pub fixture_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "127.0.0.1:8000".to_string(),
                allowed_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ],
            },
            agents: AgentsConfig {
                default_patient_id: "PATIENT_89201".to_string(),
                finance_role: "doctor".to_string(),
                runout_warning_days: 7,
            },
            graph: GraphConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_addr))
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("ALSHIFA_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("alshifa")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or return defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// Failures carry [`Error::ConfigError`] so callers can downcast for a hint.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Err(e) = self.server.socket_addr() {
            return Err(Error::ConfigError(format!("server.bind_addr: {:#}", e)).into());
        }
        let problem = if self.agents.default_patient_id.trim().is_empty() {
            Some("agents.default_patient_id must not be empty")
        } else if self.agents.finance_role.trim().is_empty() {
            Some("agents.finance_role must not be empty")
        } else if self.agents.runout_warning_days == 0 {
            Some("agents.runout_warning_days must be at least 1")
        } else {
            None
        };
        match problem {
            Some(problem) => Err(Error::ConfigError(problem.to_string()).into()),
            None => Ok(()),
        }
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "server.bind_addr" => Ok(self.server.bind_addr.clone()),
            "server.allowed_origins" => Ok(self.server.allowed_origins.join(", ")),
            "agents.default_patient_id" => Ok(self.agents.default_patient_id.clone()),
            "agents.finance_role" => Ok(self.agents.finance_role.clone()),
            "agents.runout_warning_days" => Ok(self.agents.runout_warning_days.to_string()),
            "graph.fixture_path" => Ok(self
                .graph
                .fixture_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in clinic fixture)".to_string())),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `alshifa config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "server.bind_addr" => {
                value
                    .parse::<SocketAddr>()
                    .with_context(|| format!("Invalid bind address: {}", value))?;
                self.server.bind_addr = value.to_string();
            }
            "server.allowed_origins" => {
                self.server.allowed_origins = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            "agents.default_patient_id" => {
                if value.trim().is_empty() {
                    return Err(anyhow!("Default patient id must not be empty"));
                }
                self.agents.default_patient_id = value.to_string();
            }
            "agents.finance_role" => {
                if value.trim().is_empty() {
                    return Err(anyhow!("Finance role must not be empty"));
                }
                self.agents.finance_role = value.to_string();
            }
            "agents.runout_warning_days" => {
                let days: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid runout_warning_days value: {}", value))?;
                if days == 0 {
                    return Err(anyhow!("Run-out warning window must be at least one day"));
                }
                self.agents.runout_warning_days = days;
            }
            "graph.fixture_path" => {
                self.graph.fixture_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `alshifa config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "server.bind_addr",
            "server.allowed_origins",
            "agents.default_patient_id",
            "agents.finance_role",
            "agents.runout_warning_days",
            "graph.fixture_path",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}
