//! The agents file: a JSON array of registered agents.

use std::path::Path;
use tessera_core::Agent;
use tessera_error::{JsonError, StorageError, StorageErrorKind, TesseraResult};
use tracing::{debug, instrument};

#[track_caller]
fn file_io(path: &Path, e: std::io::Error) -> StorageError {
    StorageError::new(StorageErrorKind::FileIo {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read an agents file.
///
/// A missing file is an empty directory.
///
/// # Errors
///
/// Returns a storage error when the file cannot be read and a JSON error when
/// its content is not an agent array.
#[instrument]
pub fn load_agents(path: &Path) -> TesseraResult<Vec<Agent>> {
    if !path.exists() {
        debug!("Agents file not found, starting empty");
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| file_io(path, e))?;
    let agents: Vec<Agent> = serde_json::from_str(&content).map_err(|e| {
        JsonError::new(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    debug!(count = agents.len(), "Loaded agents");
    Ok(agents)
}

/// Write `agents` to `path` as pretty JSON.
#[instrument(skip(agents), fields(count = agents.len()))]
pub fn save_agents(path: &Path, agents: &[Agent]) -> TesseraResult<()> {
    let json = serde_json::to_string_pretty(agents)
        .map_err(|e| JsonError::new(format!("Failed to serialize agents: {}", e)))?;
    std::fs::write(path, json).map_err(|e| file_io(path, e))?;
    Ok(())
}
