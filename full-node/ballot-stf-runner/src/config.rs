use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use ballot_state::config::Config as StorageConfig;

/// Node configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunnerConfig<G> {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Genesis configuration of the module.
    pub genesis: G,
}

fn read_to_string(path: &Path) -> anyhow::Result<String> {
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(contents)
}

/// Reads a TOML file into `R`.
pub fn from_toml_path<P: AsRef<Path>, R: DeserializeOwned>(path: P) -> anyhow::Result<R> {
    let path = path.as_ref();
    let contents = read_to_string(path)?;
    let result: R = toml::from_str(&contents)
        .with_context(|| format!("Invalid TOML in {}", path.display()))?;
    Ok(result)
}

/// Reads a JSON file into `R`. Used for transaction batches.
pub fn from_json_path<P: AsRef<Path>, R: DeserializeOwned>(path: P) -> anyhow::Result<R> {
    let path = path.as_ref();
    let contents = read_to_string(path)?;
    let result: R = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(result)
}
