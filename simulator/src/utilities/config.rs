use std::fs;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("could not parse {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub status_panel: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig { status_panel: true }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub random_request_limit: u8,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig { random_request_limit: 12 }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    pub display: DisplayConfig,
    pub input: InputConfig,
}

const CONFIG_FILE_PATH: &str = "config.json";
const FALLBACK_CONFIG_FILE_PATH: &str = "_config.json";

impl SimulatorConfig {
    /// Reads `config.json` (or `--config PATH`), falls back to `_config.json`
    /// and then to built-in defaults, and applies command line overrides.
    pub fn get(args: &[String]) -> Self {
        let env_args = parse_env_args(args);
        let mut config = match &env_args.config_path {
            Some(path) => read_config_file(path).unwrap_or_else(|e| {
                println!("{}, using default settings...", e);
                SimulatorConfig::default()
            }),
            None => read_config_file(CONFIG_FILE_PATH)
                .or_else(|_| {
                    println!("No configuration file provided, using default settings...");
                    read_config_file(FALLBACK_CONFIG_FILE_PATH)
                })
                .unwrap_or_default(),
        };
        if let Some(status_panel) = env_args.status_panel {
            config.display.status_panel = status_panel;
        }
        config
    }

    pub fn parse(path: &str, contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source: source,
        })
    }
}

fn read_config_file(path: &str) -> Result<SimulatorConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source: source,
    })?;
    SimulatorConfig::parse(path, &contents)
}

#[derive(Debug, Default, PartialEq)]
pub struct EnvArgs {
    pub config_path: Option<String>,
    pub status_panel: Option<bool>,
}

/// `args` excludes the program name.
pub fn parse_env_args(args: &[String]) -> EnvArgs {
    let mut env_args = EnvArgs::default();

    for arg_pair in args.chunks(2) {
        let value = match arg_pair.get(1) {
            Some(value) => value.as_str(),
            None => {
                println!("argument {} has no value, skipping...", arg_pair[0]);
                continue;
            }
        };
        match arg_pair[0].as_str() {
            "--config" => env_args.config_path = Some(value.to_string()),
            "--panel" => {
                env_args.status_panel = match value {
                    "on" => Some(true),
                    "off" => Some(false),
                    _ => {
                        println!("panel setting {} is not on/off, skipping...", value);
                        env_args.status_panel
                    }
                };
            }
            _ => println!("illegal argument {}, skipping...", arg_pair[0]),
        }
    }
    env_args
}
