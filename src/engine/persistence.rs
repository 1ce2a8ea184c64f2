use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

use crate::error::PersistError;
use crate::model::encounter::EncounterId;
use crate::model::encounter_data::EncounterData;

/// Durable storage for encounters. Called after every persisting mutation
/// with the encounter's current serialized form.
pub trait PersistenceSink {
    fn save(&self, id: &EncounterId, data: &EncounterData) -> Result<(), PersistError>;
}

/// Discards every save.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl PersistenceSink for NoopSink {
    fn save(&self, _id: &EncounterId, _data: &EncounterData) -> Result<(), PersistError> {
        Ok(())
    }
}

/// Keeps every saved record in memory, oldest first.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(EncounterId, EncounterData)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().map(|saved| saved.len()).unwrap_or(0)
    }

    pub fn last(&self) -> Option<(EncounterId, EncounterData)> {
        self.saved.lock().ok().and_then(|saved| saved.last().cloned())
    }
}

impl PersistenceSink for MemorySink {
    fn save(&self, id: &EncounterId, data: &EncounterData) -> Result<(), PersistError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| PersistError::Rejected("memory sink poisoned".into()))?;
        saved.push((id.clone(), data.clone()));
        Ok(())
    }
}

/// Writes the record as pretty JSON to a single file, replacing it on
/// every save.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceSink for JsonFileSink {
    fn save(&self, id: &EncounterId, data: &EncounterData) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(data)?;
        write_text_atomic(&self.path, &json).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            encounter_id = %id,
            path = %self.path.display(),
            bytes = json.len(),
            "encounter_written"
        );
        Ok(())
    }
}

pub(crate) fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, text)?;
    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("encounter.json");
    // Unique per write so concurrent writers never share a temp file.
    let tmp_name = format!("{file_name}.{}.tmp", Uuid::new_v4().simple());
    match path.parent() {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}
