use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::ChatterboxConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "chatterbox.toml",
    "chatterbox.yaml",
    "chatterbox.yml",
    "chatterbox.json",
];

/// Override for the config directory, set via `set_config_dir()`.
static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

fn override_slot() -> MutexGuard<'static, Option<PathBuf>> {
    CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Restrict config discovery to `path`. The working directory and the
/// user-global directory are no longer searched.
pub fn set_config_dir(path: PathBuf) {
    *override_slot() = Some(path);
}

/// Clear the config directory override, restoring default discovery.
pub fn clear_config_dir() {
    *override_slot() = None;
}

fn config_dir_override() -> Option<PathBuf> {
    override_slot().clone()
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<ChatterboxConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./chatterbox.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/chatterbox/chatterbox.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `ChatterboxConfig::default()` when nothing is found or the
/// file fails to parse.
pub fn discover_and_load() -> ChatterboxConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return ChatterboxConfig::default();
    };

    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            ChatterboxConfig::default()
        },
    }
}

fn first_existing(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return first_existing(&dir);
    }

    first_existing(Path::new(".")).or_else(|| user_config_dir().and_then(|d| first_existing(&d)))
}

fn user_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().join(".config").join("chatterbox"))
}

/// Returns the config directory: override, or `~/.config/chatterbox/`.
pub fn config_dir() -> Option<PathBuf> {
    config_dir_override().or_else(user_config_dir)
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<ChatterboxConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
