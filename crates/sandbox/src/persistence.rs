//! Project files on disk.
//!
//! The file is the engine's JSON project (`{ "rulesets": .., "sprites": .. }`).
//! Saves go to a sibling temp file first and are renamed into place, so an
//! interrupted save never leaves a truncated project behind.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chaos_engine::Engine;

/// Replace the engine's forest with the project at `path`. Returns the number
/// of rulesets loaded. On error the engine is unchanged.
pub fn load_project(engine: &mut Engine, path: &Path) -> Result<usize> {
    let text = fs::read_to_string(path).with_context(|| format!("reading project {}", path.display()))?;
    engine
        .import_json(&text)
        .with_context(|| format!("importing project {}", path.display()))?;
    let rulesets = engine.blocks().roots().count();
    tracing::info!("Loaded {} ruleset(s) from {}", rulesets, path.display());
    Ok(rulesets)
}

pub fn save_project(engine: &Engine, path: &Path) -> Result<()> {
    let json = engine.export_json().context("serializing project")?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming {} to {}", tmp.display(), path.display()))?;

    tracing::info!("Saved {} block(s) to {}", engine.blocks().len(), path.display());
    Ok(())
}
