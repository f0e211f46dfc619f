use std::env;
use std::path::PathBuf;

use crate::loader::{InvalidRowPolicy, NormalizeOptions};
use crate::render::{MapVariant, RenderConfig};

pub const DEFAULT_CSV: &str = "Euro2024_shots.csv";
pub const DEFAULT_DEMO_SEED: u64 = 2024;

/// Runtime settings, read from the process environment (and `.env` files the
/// binaries load first).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub csv_path: PathBuf,
    pub variant: MapVariant,
    pub scale_override: Option<f64>,
    pub exclude_penalties_override: Option<bool>,
    pub invalid_rows: InvalidRowPolicy,
    pub demo: bool,
    pub demo_seed: u64,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV),
            variant: MapVariant::default(),
            scale_override: None,
            exclude_penalties_override: None,
            invalid_rows: InvalidRowPolicy::default(),
            demo: false,
            demo_seed: DEFAULT_DEMO_SEED,
            export_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());
        let defaults = Self::default();
        Self {
            csv_path: get("SHOTMAP_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.csv_path),
            variant: get("SHOTMAP_VARIANT")
                .and_then(|val| MapVariant::parse(&val))
                .unwrap_or(defaults.variant),
            scale_override: get("SHOTMAP_SCALE")
                .and_then(|val| val.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0),
            exclude_penalties_override: get("SHOTMAP_EXCLUDE_PENALTIES")
                .and_then(|val| parse_bool(&val)),
            invalid_rows: get("SHOTMAP_INVALID_ROWS")
                .and_then(|val| parse_policy(&val))
                .unwrap_or(defaults.invalid_rows),
            demo: get("SHOTMAP_DEMO")
                .and_then(|val| parse_bool(&val))
                .unwrap_or(defaults.demo),
            demo_seed: get("SHOTMAP_DEMO_SEED")
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(defaults.demo_seed),
            export_dir: get("SHOTMAP_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
        }
    }

    pub fn render_config(&self, variant: MapVariant) -> RenderConfig {
        let mut cfg = RenderConfig::for_variant(variant);
        if let Some(scale) = self.scale_override {
            cfg.scale_factor = scale;
        }
        cfg
    }

    pub fn excludes_penalties(&self, variant: MapVariant) -> bool {
        self.exclude_penalties_override
            .unwrap_or_else(|| variant.excludes_penalties())
    }

    /// Load options for the raw file. Penalties are kept so the UI can switch
    /// variants without re-reading; exclusion happens per variant afterwards.
    pub fn load_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            exclude_penalties: false,
            invalid_rows: self.invalid_rows,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_policy(raw: &str) -> Option<InvalidRowPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "abort" => Some(InvalidRowPolicy::Abort),
        "reject" | "skip" => Some(InvalidRowPolicy::Reject),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn cfg_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_env_uses_defaults() {
        assert_eq!(cfg_from(&[]), AppConfig::default());
    }

    #[test]
    fn blank_and_bad_values_fall_back() {
        let cfg = cfg_from(&[
            ("SHOTMAP_CSV", "  "),
            ("SHOTMAP_VARIANT", "radar"),
            ("SHOTMAP_SCALE", "-4"),
            ("SHOTMAP_INVALID_ROWS", "maybe"),
        ]);
        assert_eq!(cfg.csv_path, PathBuf::from(DEFAULT_CSV));
        assert_eq!(cfg.variant, MapVariant::Plain);
        assert_eq!(cfg.scale_override, None);
        assert_eq!(cfg.invalid_rows, InvalidRowPolicy::Abort);
    }

    #[test]
    fn overrides_apply_per_variant() {
        let cfg = cfg_from(&[
            ("SHOTMAP_VARIANT", "annotated"),
            ("SHOTMAP_SCALE", "450"),
            ("SHOTMAP_EXCLUDE_PENALTIES", "no"),
            ("SHOTMAP_INVALID_ROWS", "reject"),
        ]);
        assert_eq!(cfg.variant, MapVariant::Annotated);
        assert_eq!(cfg.render_config(MapVariant::Plain).scale_factor, 450.0);
        assert!(!cfg.excludes_penalties(MapVariant::Annotated));
        assert_eq!(cfg.load_options().invalid_rows, InvalidRowPolicy::Reject);
    }
}
