//! Romanized Nepali typing engine.
//!
//! Ties together the keymap (`nep_core`) and the live input binder
//! (`nep_session`), and adds configuration loading, trace setup, and a
//! browser host for `wasm32` builds.

#[cfg(all(feature = "browser", target_arch = "wasm32"))]
pub mod browser;
pub mod trace_init;

use std::fs;
use std::path::Path;
use std::rc::Rc;

pub use nep_core;
pub use nep_core::{transliterate, Keymap};
pub use nep_session;
pub use nep_session::{Binder, HostDocument};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn read_config(path: &Path) -> Result<String, EngineError> {
    fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Install a custom keymap from a TOML file. Fails once the keymap has
/// been used.
pub fn load_keymap_config(path: impl AsRef<Path>) -> Result<(), EngineError> {
    let content = read_config(path.as_ref())?;
    Keymap::init_custom(content).map_err(|e| EngineError::InvalidData(e.to_string()))
}

/// Install custom settings from a TOML file. Fails once settings have been
/// read.
pub fn load_settings_config(path: impl AsRef<Path>) -> Result<(), EngineError> {
    let content = read_config(path.as_ref())?;
    nep_core::settings::init_custom(content).map_err(|e| EngineError::InvalidData(e.to_string()))
}

/// Bind every qualifying surface of `host` now and as it appears later.
pub fn attach(host: &dyn HostDocument) -> Rc<Binder> {
    let binder = Binder::with_global_keymap();
    let bound = binder.activate(host);
    tracing::debug!(bound, "binder attached");
    binder
}
