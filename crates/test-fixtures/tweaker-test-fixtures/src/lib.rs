use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    tweaks: HashMap<String, String>,
    #[serde(default)]
    invalid: HashMap<String, InvalidEntry>,
}

/// A fixture that must fail to load, with a short note on why.
#[derive(Debug, Deserialize)]
struct InvalidEntry {
    path: String,
    #[serde(default)]
    reason: Option<String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Well-formed tweak files.
pub mod tweaks {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.tweaks.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.tweaks, "tweak", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.tweaks, "tweak", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.tweaks, "tweak", name)?;
        Ok(resolve_path(rel))
    }
}

/// Tweak files that a loader is expected to reject.
pub mod invalid {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.invalid.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.invalid, "invalid tweak", name)?;
        read_to_string(&entry.path)
    }

    pub fn reason(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.invalid, "invalid tweak", name)?;
        Ok(entry.reason.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_entry_resolves() {
        for key in tweaks::keys() {
            let text = tweaks::json(&key).expect("tweak fixture readable");
            let _: serde_json::Value = serde_json::from_str(&text).expect("tweak fixture is JSON");
        }
        for key in invalid::keys() {
            invalid::json(&key).expect("invalid fixture readable");
        }
    }

    #[test]
    fn unknown_fixture_is_an_error() {
        assert!(tweaks::json("does-not-exist").is_err());
    }
}
