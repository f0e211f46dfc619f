use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::engine::FilterSelector;
use crate::render::MapVariant;
use crate::state::AppState;

const CACHE_DIR: &str = "shotmap_terminal";
const CACHE_FILE: &str = "session.json";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SessionFile {
    version: u32,
    sources: HashMap<String, SessionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionEntry {
    selector: FilterSelector,
    variant: MapVariant,
    #[serde(default)]
    saved_at: u64,
}

/// Restore the last selection made against the same data source.
pub fn load_into_state(state: &mut AppState) {
    if let Some(path) = cache_path() {
        load_from_path(&path, state);
    }
}

pub fn save_from_state(state: &AppState) {
    if let Some(path) = cache_path() {
        save_to_path(&path, state);
    }
}

pub fn load_from_path(path: &Path, state: &mut AppState) {
    let Some(cache) = load_session_file(path) else {
        return;
    };
    if cache.version != CACHE_VERSION {
        return;
    }
    let Some(entry) = cache.sources.get(&state.source_label) else {
        return;
    };
    state.set_variant(entry.variant);
    state.restore_selection(entry.selector.clone());
    state.push_log(format!("[INFO] Restored selection: {}", state.selector.heading()));
}

pub fn save_to_path(path: &Path, state: &AppState) {
    let Some(dir) = path.parent() else {
        return;
    };
    let _ = fs::create_dir_all(dir);

    let mut cache = load_session_file(path)
        .filter(|c| c.version == CACHE_VERSION)
        .unwrap_or_default();
    cache.version = CACHE_VERSION;
    cache.sources.insert(
        state.source_label.clone(),
        SessionEntry {
            selector: state.selector.clone(),
            variant: state.variant,
            saved_at: system_time_to_secs(SystemTime::now()).unwrap_or_default(),
        },
    );

    if let Ok(json) = serde_json::to_string(&cache) {
        let tmp = path.with_extension("json.tmp");
        if fs::write(&tmp, json).is_ok() {
            let _ = fs::rename(&tmp, path);
        }
    }
}

fn load_session_file(path: &Path) -> Option<SessionFile> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str::<SessionFile>(&raw).ok()
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR).join(CACHE_FILE))
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
