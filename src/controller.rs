use thiserror::Error;

use crate::form::{self, FormInput, ValidationError};
use crate::store::{StoreError, StoreGateway, StudentRecord};

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct Inserted {
    pub id: String,
    pub roster: Vec<StudentRecord>,
}

#[derive(Debug)]
pub struct Updated {
    /// False when the selected identifier no longer matches any record
    /// (stale selection); the store reported zero matched documents.
    pub matched: bool,
    pub roster: Vec<StudentRecord>,
}

#[derive(Debug)]
pub enum DeleteOutcome {
    /// The user answered "no" at the confirmation prompt. Nothing was
    /// touched and no store call was made.
    Declined,
    Deleted {
        removed: bool,
        roster: Vec<StudentRecord>,
    },
}

/// Translates field text and button intent into validated store calls.
///
/// Each intent takes the current field values and, in edit mode, the
/// selected record identifier. Every successful mutation re-reads the full
/// collection so the shell can rebuild its list wholesale.
pub struct FormController {
    store: Box<dyn StoreGateway>,
}

impl FormController {
    pub fn new(store: Box<dyn StoreGateway>) -> Self {
        Self { store }
    }

    pub fn insert(&mut self, input: &FormInput) -> Result<Inserted, FormError> {
        let record = form::validate(input)?;
        let id = self
            .store
            .insert(&record.name, record.age, &record.course)?;
        Ok(Inserted {
            id,
            roster: self.store.list_all()?,
        })
    }

    pub fn update(&mut self, id: &str, input: &FormInput) -> Result<Updated, FormError> {
        let record = form::validate(input)?;
        let matched = self
            .store
            .update(id, &record.name, record.age, &record.course)?;
        Ok(Updated {
            matched,
            roster: self.store.list_all()?,
        })
    }

    pub fn delete(&mut self, id: &str, confirmed: bool) -> Result<DeleteOutcome, FormError> {
        if !confirmed {
            return Ok(DeleteOutcome::Declined);
        }
        let removed = self.store.delete(id)?;
        Ok(DeleteOutcome::Deleted {
            removed,
            roster: self.store.list_all()?,
        })
    }

    /// Full-collection read backing the list view, newest-first.
    pub fn roster(&self) -> Result<Vec<StudentRecord>, FormError> {
        Ok(self.store.list_all()?)
    }

    /// Row-selection prefill. The shell overwrites the form fields with the
    /// returned values, silently discarding unsaved edits.
    pub fn lookup(&self, id: &str) -> Result<Option<StudentRecord>, FormError> {
        Ok(self.store.find(id)?)
    }
}
