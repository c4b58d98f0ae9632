//! JSON persistence for the task store.
//!
//! The durable shape is the task collection plus the presentation
//! preferences; search, sort and filter criteria are session state and are
//! never written out. Load falls back to an empty store on a missing or
//! corrupt file, save goes through a temp file and rename.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fields::ViewMode;
use crate::task::Task;

/// Persisted snapshot of the store.
///
/// The serde defaults keep older files readable when the presentation
/// fields are absent.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreFile {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub sidebar_open: bool,
}

impl StoreFile {
    /// Load from a JSON file, starting empty if the file is missing or
    /// unreadable. A corrupt store should not take the CLI down with it.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return StoreFile::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("Error parsing store, starting fresh: {e}");
                    StoreFile::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading store, starting fresh: {e}");
                StoreFile::default()
            }
        }
    }

    /// Save to a JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self).unwrap();
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}
