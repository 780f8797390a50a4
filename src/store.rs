use anyhow::Context;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::sync::{Client, Collection};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed endpoint of the backing store. Not configurable; the desktop app
/// talks to a local MongoDB instance and nothing else.
pub const STORE_URI: &str = "mongodb://localhost:27017";

const DB_NAME: &str = "student_db";
const COLLECTION_NAME: &str = "students";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub age: i64,
    pub course: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),
    #[error("malformed record id: {0}")]
    BadId(String),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Single-document operations against the student collection.
///
/// The presentation layer only ever sees this trait, so tests substitute
/// [`MemoryStore`] for the real connection. Update and delete report whether
/// a record actually matched; callers decide what a stale id means.
pub trait StoreGateway {
    fn insert(&mut self, name: &str, age: i64, course: &str) -> Result<String, StoreError>;
    fn find(&self, id: &str) -> Result<Option<StudentRecord>, StoreError>;
    fn list_all(&self) -> Result<Vec<StudentRecord>, StoreError>;
    fn update(&mut self, id: &str, name: &str, age: i64, course: &str) -> Result<bool, StoreError>;
    fn delete(&mut self, id: &str) -> Result<bool, StoreError>;
}

fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::BadId(id.to_string()))
}

pub struct MongoStore {
    students: Collection<StudentRecord>,
}

impl MongoStore {
    /// Opens the one process-wide connection. The driver connects lazily, so
    /// force a round-trip here; an unreachable store must fail startup, not
    /// the first button press.
    pub fn connect() -> anyhow::Result<Self> {
        let client = Client::with_uri_str(STORE_URI)
            .with_context(|| format!("opening client for {STORE_URI}"))?;
        let db = client.database(DB_NAME);
        db.run_command(doc! { "ping": 1 })
            .run()
            .with_context(|| format!("student store unreachable at {STORE_URI}"))?;
        Ok(Self {
            students: db.collection(COLLECTION_NAME),
        })
    }
}

impl StoreGateway for MongoStore {
    fn insert(&mut self, name: &str, age: i64, course: &str) -> Result<String, StoreError> {
        let record = StudentRecord {
            id: ObjectId::new(),
            name: name.to_string(),
            age,
            course: course.to_string(),
        };
        self.students.insert_one(&record).run()?;
        Ok(record.id.to_hex())
    }

    fn find(&self, id: &str) -> Result<Option<StudentRecord>, StoreError> {
        let oid = parse_id(id)?;
        Ok(self.students.find_one(doc! { "_id": oid }).run()?)
    }

    fn list_all(&self) -> Result<Vec<StudentRecord>, StoreError> {
        // ObjectIds are timestamp-prefixed, so `_id` descending approximates
        // newest-first. The whole collection is loaded; see the design notes.
        let cursor = self
            .students
            .find(doc! {})
            .sort(doc! { "_id": -1 })
            .run()?;
        let mut records = Vec::new();
        for record in cursor {
            records.push(record?);
        }
        Ok(records)
    }

    fn update(&mut self, id: &str, name: &str, age: i64, course: &str) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;
        let result = self
            .students
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "name": name, "age": age, "course": course } },
            )
            .run()?;
        Ok(result.matched_count > 0)
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;
        let result = self.students.delete_one(doc! { "_id": oid }).run()?;
        Ok(result.deleted_count > 0)
    }
}

/// In-process stand-in for the collection, used by the test suite.
///
/// Rows are kept in insertion order; `list_all` reverses, matching the
/// production newest-first sort. `set_reject_writes` makes every mutation
/// fail so persistence-error paths can be exercised; reads stay intact.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<StudentRecord>,
    reject_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.reject_writes {
            return Err(StoreError::Rejected(
                "memory store is rejecting writes".to_string(),
            ));
        }
        Ok(())
    }
}

impl StoreGateway for MemoryStore {
    fn insert(&mut self, name: &str, age: i64, course: &str) -> Result<String, StoreError> {
        self.check_writable()?;
        let record = StudentRecord {
            id: ObjectId::new(),
            name: name.to_string(),
            age,
            course: course.to_string(),
        };
        let id = record.id.to_hex();
        self.rows.push(record);
        Ok(id)
    }

    fn find(&self, id: &str) -> Result<Option<StudentRecord>, StoreError> {
        let oid = parse_id(id)?;
        Ok(self.rows.iter().find(|r| r.id == oid).cloned())
    }

    fn list_all(&self) -> Result<Vec<StudentRecord>, StoreError> {
        Ok(self.rows.iter().rev().cloned().collect())
    }

    fn update(&mut self, id: &str, name: &str, age: i64, course: &str) -> Result<bool, StoreError> {
        self.check_writable()?;
        let oid = parse_id(id)?;
        match self.rows.iter_mut().find(|r| r.id == oid) {
            Some(row) => {
                row.name = name.to_string();
                row.age = age;
                row.course = course.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        self.check_writable()?;
        let oid = parse_id(id)?;
        let before = self.rows.len();
        self.rows.retain(|r| r.id != oid);
        Ok(self.rows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let id = store.insert("Alice", 21, "CS").expect("insert");
        assert_eq!(id.len(), 24);

        let found = store.find(&id).expect("find").expect("record present");
        assert_eq!(found.name, "Alice");
        assert_eq!(found.age, 21);
        assert_eq!(found.course, "CS");

        assert!(store.update(&id, "Alice", 22, "CS").expect("update"));
        assert_eq!(store.find(&id).unwrap().unwrap().age, 22);

        assert!(store.delete(&id).expect("delete"));
        assert!(store.find(&id).expect("find after delete").is_none());
        // Second delete of the same id matches nothing.
        assert!(!store.delete(&id).expect("second delete"));
    }

    #[test]
    fn list_all_is_newest_first() {
        let mut store = MemoryStore::new();
        let a = store.insert("A", 1, "X").unwrap();
        let b = store.insert("B", 2, "Y").unwrap();
        let c = store.insert("C", 3, "Z").unwrap();

        let ids: Vec<String> = store
            .list_all()
            .unwrap()
            .iter()
            .map(|r| r.id.to_hex())
            .collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[test]
    fn malformed_id_is_bad_id_not_missing() {
        let store = MemoryStore::new();
        match store.find("not-a-hex-id") {
            Err(StoreError::BadId(s)) => assert_eq!(s, "not-a-hex-id"),
            other => panic!("expected BadId, got {other:?}"),
        }
    }

    #[test]
    fn rejecting_store_still_reads() {
        let mut store = MemoryStore::new();
        let id = store.insert("Alice", 21, "CS").unwrap();
        store.set_reject_writes(true);

        assert!(matches!(
            store.insert("Bob", 30, "Math"),
            Err(StoreError::Rejected(_))
        ));
        assert!(matches!(
            store.update(&id, "Alice", 22, "CS"),
            Err(StoreError::Rejected(_))
        ));
        assert!(matches!(store.delete(&id), Err(StoreError::Rejected(_))));

        // Reads are unaffected and the row is unchanged.
        assert_eq!(store.list_all().unwrap().len(), 1);
        assert_eq!(store.find(&id).unwrap().unwrap().age, 21);
    }
}
