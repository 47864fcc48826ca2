mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SearchConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: SearchConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;
    Ok(config)
}

/// Load config from default locations or return the default config.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<SearchConfig> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./search.toml",
        "~/.config/catalogue-search/config.toml",
        "/etc/catalogue-search/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(SearchConfig::default())
}

/// Validate configuration.
fn validate_config(config: &SearchConfig) -> Result<()> {
    if config.locale.is_empty() {
        anyhow::bail!("Locale cannot be empty");
    }
    if config.request_timeout_secs == 0 {
        anyhow::bail!("Request timeout cannot be 0");
    }

    for (name, provider) in [
        ("screen", &config.screen),
        ("games", &config.games),
        ("books", &config.books),
        ("places", &config.places),
    ] {
        if provider.enabled && provider.api_key.is_empty() {
            anyhow::bail!("Provider '{}' is enabled but has no API key", name);
        }
    }

    Ok(())
}
