use super::UnlockrConfig;
use anyhow::{Context, Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use serde_json::Value;
use std::path::Path;

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub const PROJECT_CONFIG_STEM: &str = "unlockr";
const ENV_PREFIX: &str = "UNLOCKR_";

impl UnlockrConfig {
    /// Load with an explicit config file and command-line overrides.
    ///
    /// `null` entries in `overrides` are ignored, so optional flags can be
    /// passed through without masking lower layers.
    pub fn load_with(custom_config: Option<&str>, overrides: Option<Value>) -> Result<Self> {
        let figment = Self::figment(custom_config, overrides)?;
        figment.extract().context("Failed to parse configuration")
    }

    /// The merged provider chain, lowest priority first.
    pub fn figment(custom_config: Option<&str>, overrides: Option<Value>) -> Result<Figment> {
        tracing::trace!("CONFIG LOAD: Starting");
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        if let Some(custom_path) = custom_config {
            // Explicit file replaces the user/project lookup
            let path = Path::new(custom_path);
            if !path.is_file() {
                bail!("Config file not found: {}", custom_path);
            }
            figment = merge_file(figment, path);
        } else {
            let user_config = Self::user_config_path();
            figment = figment
                .merge(Toml::file(&user_config))
                .merge(Toml::file(format!("{PROJECT_CONFIG_STEM}.toml")))
                .merge(Json::file(format!("{PROJECT_CONFIG_STEM}.json")))
                .merge(Yaml::file(format!("{PROJECT_CONFIG_STEM}.yaml")))
                .merge(Yaml::file(format!("{PROJECT_CONFIG_STEM}.yml")));
        }

        // Environment variables override files, CLI flags override everything
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(overrides) = overrides.map(prune_nulls) {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides {}", overrides);
            figment = figment.merge(Serialized::defaults(overrides));
        }

        Ok(figment)
    }

    /// Render the merged configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/unlockr/config.toml"),
            Err(_) => "~/.config/unlockr/config.toml".to_string(),
        }
    }
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => figment.merge(Json::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

/// Drop `null` values (recursively) so absent CLI flags don't override anything.
fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect(),
        ),
        other => other,
    }
}
