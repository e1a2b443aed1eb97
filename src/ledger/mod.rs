//! Ledger domain models and the persisted entry store.

pub mod entry;
pub mod store;

pub use entry::{parse_entry_date, Entry, EntryDraft, EntryKind, EntryPatch};
pub use store::LedgerStore;
