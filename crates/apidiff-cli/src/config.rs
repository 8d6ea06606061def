//! Loads the string-to-string configuration mapping from an optional TOML
//! file.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use apidiff_core::{Configuration, Locale};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
}

/// Reads `path` (if given) as TOML with a single top-level `[values]` table,
/// flattening it into the key/value mapping every component reads its own
/// namespace out of. A missing file path yields an empty mapping, never an
/// error — a missing key must behave identically to a key that's absent
/// from an empty mapping.
pub fn load(path: Option<&Path>, locale: &str) -> Result<Configuration> {
    let values = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading configuration file {}", path.display()))?;
            let parsed: ConfigFile = toml::from_str(&contents)
                .with_context(|| format!("parsing configuration file {}", path.display()))?;
            parsed.values
        }
        None => BTreeMap::new(),
    };

    Ok(Configuration::new(Locale::new(locale), values))
}
