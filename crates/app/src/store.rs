//! JSON snapshot persistence for the CLI host.

use std::{fs, io::ErrorKind, path::Path};

use engine::{Engine, LedgerSnapshot};

use crate::error::Result;

/// Loads the ledger at `path`; a missing file is an empty ledger.
pub fn load(path: &Path) -> Result<Engine> {
    let snapshot = match fs::read_to_string(path) {
        Ok(raw) => {
            tracing::debug!("loading ledger from {}", path.display());
            serde_json::from_str::<LedgerSnapshot>(&raw)?
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!("no ledger at {}, starting empty", path.display());
            LedgerSnapshot::default()
        }
        Err(err) => return Err(err.into()),
    };
    Ok(Engine::builder().snapshot(snapshot).build()?)
}

/// Writes the ledger next to `path` and renames it into place, so readers
/// never observe a half-written file.
pub fn save(path: &Path, engine: &Engine, pretty: bool) -> Result<()> {
    let snapshot = engine.snapshot();
    let raw = if pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(
        "saved ledger to {} ({} events)",
        path.display(),
        snapshot.events.len()
    );
    Ok(())
}
