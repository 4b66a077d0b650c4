//! Thin wrapper around [`cerno_core::config::CernoConfig`]'s TOML-plus-env
//! loader: the CLI owns only the question of which path to load from.

use std::path::{Path, PathBuf};

use cerno_core::config::CernoConfig;
use cerno_core::error::Result;

/// Config file name searched for in the current directory and, failing
/// that, the user's config directory.
pub const CONFIG_FILENAME: &str = "cerno.toml";

/// Load configuration from an explicit `path`, or else the first of
/// `./cerno.toml` and `<config dir>/cerno/cerno.toml` that exists, falling
/// back to defaults overlaid with environment variables.
pub fn load(path: Option<&Path>) -> Result<CernoConfig> {
    if let Some(path) = path {
        return CernoConfig::load_from_path(path);
    }

    let cwd_candidate = PathBuf::from(CONFIG_FILENAME);
    if cwd_candidate.is_file() {
        return CernoConfig::load_from_path(&cwd_candidate);
    }

    if let Some(user_candidate) = dirs::config_dir().map(|dir| dir.join("cerno").join(CONFIG_FILENAME)) {
        if user_candidate.is_file() {
            return CernoConfig::load_from_path(&user_candidate);
        }
    }

    CernoConfig::load_from_path(&cwd_candidate)
}
