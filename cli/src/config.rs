// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use praxis_core::Config;

const PRAXIS_CONFIG_ENV: &str = "PRAXIS_CONFIG";

/// Loads the engine config, applying the CLI timezone override.
///
/// Search order: `--config`, `$PRAXIS_CONFIG`, then
/// `<config dir>/praxis/config.toml`. A missing default file yields the
/// built-in defaults rather than an error.
pub fn parse_config(
    path: Option<PathBuf>,
    timezone: Option<String>,
) -> Result<Config, Box<dyn Error>> {
    let path = match path {
        Some(path) => Some(path),
        None => match std::env::var(PRAXIS_CONFIG_ENV) {
            Ok(env_path) => Some(PathBuf::from(env_path)),
            Err(_) => default_config_path().filter(|p| p.exists()),
        },
    };

    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read config file at {}: {e}", path.display()))?;
            toml::from_str(&content)
                .map_err(|e| format!("Failed to parse config file at {}: {e}", path.display()))?
        }
        None => {
            tracing::debug!("no config file found, using defaults");
            Config::default()
        }
    };

    if timezone.is_some() {
        config.timezone = timezone;
    }
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("praxis/config.toml"))
}
