use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::course::CourseId;

pub mod backend;

pub use backend::{FileStorage, MemoryStorage, Storage};

/// Immutable view of one department's completed courses. Mutations replace
/// the snapshot instead of editing it.
pub type Snapshot = Arc<BTreeSet<CourseId>>;

const KEY_PREFIX: &str = "completed-courses::";

pub fn storage_key(department: &str) -> String {
    format!("{KEY_PREFIX}{department}")
}

/// Per-department completed-course sets, persisted on every change.
///
/// Storage failures never reach the caller: unreadable or corrupt data loads
/// as an empty set and failed writes keep the in-memory state.
#[derive(Debug)]
pub struct CompletionStore<S: Storage> {
    storage: S,
    department: Option<String>,
    completed: Snapshot,
}

impl<S: Storage> CompletionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            department: None,
            completed: Snapshot::default(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the persisted set for `department` without activating it.
    pub fn load(&self, department: &str) -> BTreeSet<CourseId> {
        let key = storage_key(department);
        let raw = match self.storage.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(err) => {
                tracing::warn!(%department, error = %err, "could not read completed courses");
                return BTreeSet::new();
            }
        };
        match serde_json::from_str::<Vec<CourseId>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(err) => {
                tracing::warn!(%department, error = %err, "ignoring corrupt completed courses");
                BTreeSet::new()
            }
        }
    }

    /// Makes `department` the active one and reloads its set from storage.
    pub fn activate(&mut self, department: &str) -> Snapshot {
        self.completed = Arc::new(self.load(department));
        self.department = Some(department.to_string());
        self.completed.clone()
    }

    pub fn completed(&self) -> Snapshot {
        self.completed.clone()
    }

    pub fn toggle(&mut self, department: &str, course: &CourseId) -> Snapshot {
        let mut next = self.current(department);
        if !next.remove(course) {
            next.insert(course.clone());
        }
        self.commit(department, next)
    }

    pub fn clear_all(&mut self, department: &str) -> Snapshot {
        self.commit(department, BTreeSet::new())
    }

    fn current(&self, department: &str) -> BTreeSet<CourseId> {
        if self.department.as_deref() == Some(department) {
            self.completed.as_ref().clone()
        } else {
            self.load(department)
        }
    }

    fn commit(&mut self, department: &str, next: BTreeSet<CourseId>) -> Snapshot {
        self.persist(department, &next);
        let snapshot = Arc::new(next);
        if self.department.as_deref() == Some(department) {
            self.completed = snapshot.clone();
        }
        snapshot
    }

    fn persist(&mut self, department: &str, completed: &BTreeSet<CourseId>) {
        let ids: Vec<&CourseId> = completed.iter().collect();
        let value = match serde_json::to_string(&ids) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%department, error = %err, "could not encode completed courses");
                return;
            }
        };
        if let Err(err) = self.storage.set(&storage_key(department), &value) {
            tracing::warn!(%department, error = %err, "could not save completed courses");
        }
    }
}
