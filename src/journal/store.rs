//! In-memory storage for families and their journal entries

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Family, JournalEntry};

/// Process-local registry of families and their journals.
///
/// The maps exclusively own the stored values; reads hand out clones.
/// Entries are kept per family in insertion order.
pub struct FamilyStore {
    families: Arc<RwLock<HashMap<Uuid, Family>>>,
    entries: Arc<RwLock<HashMap<Uuid, Vec<JournalEntry>>>>,
}

impl FamilyStore {
    pub fn new() -> Self {
        Self {
            families: Arc::new(RwLock::new(HashMap::new())),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a new family and seed its empty journal.
    ///
    /// The journal is seeded first so that a visible family always has an
    /// entry list.
    pub async fn create_family(
        &self,
        name: impl Into<String>,
        parent_name: impl Into<String>,
        teen_name: impl Into<String>,
    ) -> Family {
        let family = Family::new(name, parent_name, teen_name);

        self.entries.write().await.insert(family.id, Vec::new());
        self.families.write().await.insert(family.id, family.clone());

        family
    }

    /// Fetch a family by id
    pub async fn family(&self, family_id: Uuid) -> Option<Family> {
        self.families.read().await.get(&family_id).cloned()
    }

    /// Append a journal entry for an existing family
    pub async fn add_entry(&self, entry: JournalEntry) -> Result<()> {
        if !self.families.read().await.contains_key(&entry.family_id) {
            return Err(AppError::FamilyNotFound(entry.family_id));
        }

        self.entries
            .write()
            .await
            .entry(entry.family_id)
            .or_default()
            .push(entry);

        Ok(())
    }

    /// All journal entries for a family, oldest first
    pub async fn entries_for(&self, family_id: Uuid) -> Result<Vec<JournalEntry>> {
        if !self.families.read().await.contains_key(&family_id) {
            return Err(AppError::FamilyNotFound(family_id));
        }

        Ok(self
            .entries
            .read()
            .await
            .get(&family_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl Default for FamilyStore {
    fn default() -> Self {
        Self::new()
    }
}
