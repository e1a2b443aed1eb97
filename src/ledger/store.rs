use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::Result;
use crate::month::MonthKey;
use crate::store::{keys, KeyValueStore};

use super::{Entry, EntryDraft, EntryKind, EntryPatch};

/// Owns the persisted entry list. Every mutation validates first, then
/// rewrites the whole slot; there is no incremental log.
pub struct LedgerStore {
    store: Arc<dyn KeyValueStore>,
    slot: String,
    backup_slot: String,
    entries: Vec<Entry>,
    recovered: bool,
}

impl LedgerStore {
    /// Loads the ledger from its default slot. `reference` dates the demo
    /// entries seeded on a first run.
    pub fn open(store: Arc<dyn KeyValueStore>, reference: NaiveDate) -> Result<Self> {
        Self::open_slot(store, keys::LEDGER, keys::LEDGER_BACKUP, reference)
    }

    pub fn open_slot(
        store: Arc<dyn KeyValueStore>,
        slot: &str,
        backup_slot: &str,
        reference: NaiveDate,
    ) -> Result<Self> {
        let mut ledger = Self {
            store,
            slot: slot.to_string(),
            backup_slot: backup_slot.to_string(),
            entries: Vec::new(),
            recovered: false,
        };
        ledger.load(reference)?;
        Ok(ledger)
    }

    fn load(&mut self, reference: NaiveDate) -> Result<()> {
        let raw = self.store.get(&self.slot)?;
        match raw.as_deref() {
            None => {
                self.entries = demo_entries(MonthKey::from_date(reference));
                debug!(count = self.entries.len(), "seeded demo ledger");
                self.save()?;
            }
            Some(raw_value) => match serde_json::from_str::<Vec<Entry>>(raw_value) {
                Ok(entries) => {
                    if entries.is_empty() {
                        self.entries = demo_entries(MonthKey::from_date(reference));
                        debug!(count = self.entries.len(), "seeded demo ledger");
                        self.save()?;
                    } else {
                        self.entries = entries;
                    }
                }
                Err(err) => {
                    warn!(%err, slot = %self.slot, "corrupted ledger slot, resetting");
                    self.store.set(&self.backup_slot, raw_value)?;
                    self.entries = Vec::new();
                    self.recovered = true;
                    self.save()?;
                }
            },
        }
        Ok(())
    }

    /// Serializes the full entry list back to its slot.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.store.set(&self.slot, &json)
    }

    /// Whether this session reset the slot after finding corrupted data.
    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validates and inserts a new entry at the front of the list.
    pub fn add(&mut self, draft: EntryDraft) -> Result<Entry> {
        draft.validate()?;
        let entry = draft.into_entry();
        self.entries.insert(0, entry.clone());
        self.save()?;
        Ok(entry)
    }

    /// Inserts an already-built entry, used when replicating recurrences.
    pub(crate) fn insert_front(&mut self, entry: Entry) {
        self.entries.insert(0, entry);
    }

    /// Replaces the fields of the entry with `id`. Unknown ids are a silent
    /// no-op; a patch that fails validation leaves the list untouched.
    pub fn update(&mut self, id: Uuid, patch: EntryPatch) -> Result<Option<Entry>> {
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return Ok(None);
        };
        let updated = patch.apply_to(&self.entries[index]);
        updated.validate()?;
        self.entries[index] = updated.clone();
        self.save()?;
        Ok(Some(updated))
    }

    /// Removes the entry with `id`. Unknown ids are a silent no-op.
    pub fn remove(&mut self, id: Uuid) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        if self.entries.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

/// Fixed first-run data so the ledger is never empty, dated in the
/// reference month.
fn demo_entries(month: MonthKey) -> Vec<Entry> {
    let seed = [
        (3, "Opening balance", "housing", EntryKind::Income, 3000.0),
        (20, "Cashback", "income", EntryKind::Income, 67.63),
        (19, "Meal refund", "food", EntryKind::Income, 300.0),
        (1, "Groceries", "food", EntryKind::Expense, 500.0),
    ];
    seed.into_iter()
        .map(|(day, description, category, kind, amount)| {
            EntryDraft::new(month.day_clamped(day), description, category, kind, amount)
                .into_entry()
        })
        .collect()
}
