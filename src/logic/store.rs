// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Record persistence seen by the dashboard. The production API client lives
//! elsewhere; this module defines the seam and an in-memory implementation.

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow, bail};
use uuid::Uuid;

use crate::models::{FieldValue, Values};

/// Record collections the dashboard edits through dialogs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Collection {
    #[default]
    Users,
    Escalations,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Users, Collection::Escalations];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Escalations => "escalations",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Escalations => "Escalations",
        }
    }
}

/// Stored record: id plus the saved form values.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub id: Uuid,
    pub values: Values,
}

/// Persistence used by the save pipeline.
pub trait RecordStore: Send + Sync {
    /// Create (`id == None`) or replace a record; returns its id.
    fn save(&self, collection: Collection, id: Option<Uuid>, values: &Values) -> Result<Uuid>;

    /// Records of a collection in insertion order.
    fn list(&self, collection: Collection) -> Result<Vec<Record>>;
}

/// Thread-safe in-memory store.
///
/// Rejects users whose email is already used by another user record.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<Collection, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn save(&self, collection: Collection, id: Option<Uuid>, values: &Values) -> Result<Uuid> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow!("Record store lock poisoned"))?;
        let bucket = records.entry(collection).or_default();

        if collection == Collection::Users
            && let Some(email) = values.get("email").and_then(FieldValue::as_str)
        {
            let taken = bucket.iter().any(|r| {
                Some(r.id) != id
                    && r.values
                        .get("email")
                        .and_then(FieldValue::as_str)
                        .is_some_and(|e| e.eq_ignore_ascii_case(email))
            });
            if taken {
                bail!("A user with email {email} already exists");
            }
        }

        match id {
            Some(id) => {
                let record = bucket
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| anyhow!("No {} record with id {id}", collection.as_str()))?;
                record.values = values.clone();
                Ok(id)
            }
            None => {
                let id = Uuid::new_v4();
                bucket.push(Record {
                    id,
                    values: values.clone(),
                });
                Ok(id)
            }
        }
    }

    fn list(&self, collection: Collection) -> Result<Vec<Record>> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow!("Record store lock poisoned"))?;
        Ok(records.get(&collection).cloned().unwrap_or_default())
    }
}
