use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::Result;

use super::KeyValueStore;

const TMP_SUFFIX: &str = "tmp";
const SLOT_EXTENSION: &str = "json";
const APP_DIR: &str = "ledger_core";

/// File-backed slot storage: one file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(default_base_dir);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), SLOT_EXTENSION))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "slot".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (FileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = FileStore::new(Some(temp.path().to_path_buf())).expect("file store");
        (store, temp)
    }

    #[test]
    fn roundtrips_slots_on_disk() {
        let (store, _guard) = store_with_temp_dir();
        store.set("og.ledger.v1", "[1,2,3]").expect("set slot");
        assert_eq!(
            store.get("og.ledger.v1").expect("get slot").as_deref(),
            Some("[1,2,3]")
        );
        store.remove("og.ledger.v1").expect("remove slot");
        assert_eq!(store.get("og.ledger.v1").expect("get slot"), None);
    }

    #[test]
    fn distinct_keys_map_to_distinct_files() {
        let (store, _guard) = store_with_temp_dir();
        store.set("og.ledger.v1", "[]").unwrap();
        store.set("og.ledger.v1.backup", "{broken").unwrap();
        assert_eq!(store.get("og.ledger.v1").unwrap().as_deref(), Some("[]"));
        assert_eq!(
            store.get("og.ledger.v1.backup").unwrap().as_deref(),
            Some("{broken")
        );
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (store, _guard) = store_with_temp_dir();
        assert_eq!(store.get("og.settings.v1").unwrap(), None);
    }
}
