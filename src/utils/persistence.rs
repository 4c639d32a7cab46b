//! JSON files: saved genomes, training reports, and the ~/.flappy-neat/
//! data directory.

use crate::core::error::{Error, Result};
use crate::core::{DATA_DIR_NAME, LOG_FILE_NAME};
use crate::neat::Genome;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// ~/.flappy-neat/, created if needed.
pub fn data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(DATA_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn default_log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(LOG_FILE_NAME))
}

/// Write `data` as pretty-printed JSON, creating parent directories.
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn save_genome(path: &Path, genome: &Genome) -> Result<()> {
    save_json(path, genome)?;
    log::info!("saved genome {} to {}", genome.key, path.display());
    Ok(())
}

/// Load a genome saved by `save_genome`. It must have at least one node.
pub fn load_genome(path: &Path) -> Result<Genome> {
    let genome: Genome = load_json(path)?;
    if genome.nodes.is_empty() {
        return Err(Error::ConfigInvalid(format!(
            "{} holds a genome with no nodes",
            path.display()
        )));
    }
    Ok(genome)
}
