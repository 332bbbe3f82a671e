use crate::error::{KycError, Result};
use crate::types::config::KycConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "kyc.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".kyc/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/kyc-progress/config.toml";

/// Loads and validates the layered config. `None` means no config file was
/// found and the built-in catalog applies.
pub fn load_config(root: &Path) -> Result<Option<KycConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<KycConfig>> {
    let repo_path = root.join(DEFAULT_CONFIG_FILE);
    let global_path = global_path.filter(|path| path.exists());
    if !repo_path.exists() && global_path.is_none() {
        tracing::debug!(root = %root.display(), "no config files found");
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &repo_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: KycConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| KycError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    tracing::info!(
        catalog_version = cfg.catalog.version,
        goals = cfg.catalog.goals.len(),
        "loaded config"
    );
    Ok(Some(cfg))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    tracing::debug!(path = %path.display(), "merging config layer");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| KycError::ConfigParse(format!("{}: {}", path.display(), e)))
}

// Tables merge key by key; anything else, arrays included, is replaced.
fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
