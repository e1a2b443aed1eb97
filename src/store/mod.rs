//! Key-value persistence seam.
//!
//! Every persisted slot (entry list, settings, theme, session user) is a
//! JSON-encoded string stored under a well-known key. The trait keeps the
//! domain logic independent of where the slots actually live.

mod file_store;
mod memory;

pub use file_store::FileStore;
pub use memory::MemoryStore;

use crate::errors::Result;

/// Well-known slot keys.
pub mod keys {
    pub const LEDGER: &str = "og.ledger.v1";
    pub const LEDGER_BACKUP: &str = "og.ledger.v1.backup";
    pub const SETTINGS: &str = "og.settings.v1";
    pub const THEME: &str = "og.theme";
    pub const CURRENT_USER: &str = "og.current_user";
}

/// String-slot storage with whole-value replacement semantics.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
