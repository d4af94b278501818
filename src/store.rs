//! In-memory user table.
//!
//! Records live in a `BTreeMap` keyed by id. Ids come from a counter that
//! only moves forward, so key order is insertion order and a deleted id is
//! never handed out again.
//!
//! Each method takes the lock exactly once. A single call is atomic; a
//! sequence of calls is not.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::debug;

/// A stored user record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub age: i64,
    pub team: String,
}

/// Fields for a record that does not exist yet.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub age: i64,
    pub team: String,
}

/// A partial update. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub team: Option<String>,
}

impl UserPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    pub fn age(age: i64) -> Self {
        Self { age: Some(age), ..Self::default() }
    }

    pub fn team(team: impl Into<String>) -> Self {
        Self { team: Some(team.into()), ..Self::default() }
    }
}

/// A user field that [`UserStore::filter_by`] can match on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UserField {
    Id,
    Name,
    Age,
    Team,
}

impl UserField {
    fn matches(self, user: &User, value: &str) -> bool {
        match self {
            Self::Id => user.id.to_string() == value,
            Self::Name => user.name == value,
            Self::Age => user.age.to_string() == value,
            Self::Team => user.team == value,
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Age => "age",
            Self::Team => "team",
        })
    }
}

#[derive(Default)]
struct Table {
    rows: BTreeMap<u64, User>,
    last_id: u64,
}

/// The process-wide user table. Starts empty; share it as `Arc<UserStore>`.
#[derive(Default)]
pub struct UserStore {
    table: Mutex<Table>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written row, so a
    // poisoned table is still consistent.
    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts a record under a fresh id and returns it.
    pub fn create(&self, new: NewUser) -> User {
        let mut table = self.table();
        table.last_id += 1;
        let user = User { id: table.last_id, name: new.name, age: new.age, team: new.team };
        table.rows.insert(user.id, user.clone());
        debug!(id = user.id, "user created");
        user
    }

    /// All records, oldest first.
    pub fn all(&self) -> Vec<User> {
        self.table().rows.values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<User> {
        self.table().rows.get(&id).cloned()
    }

    /// Merges `patch` into record `id`. Returns the updated record, or `None`
    /// if there is no such record.
    pub fn update(&self, id: u64, patch: UserPatch) -> Option<User> {
        let mut table = self.table();
        let user = table.rows.get_mut(&id)?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(age) = patch.age {
            user.age = age;
        }
        if let Some(team) = patch.team {
            user.team = team;
        }
        debug!(id, "user updated");
        Some(user.clone())
    }

    /// Removes record `id`. Returns whether anything was removed.
    pub fn delete(&self, id: u64) -> bool {
        let removed = self.table().rows.remove(&id).is_some();
        if removed {
            debug!(id, "user deleted");
        }
        removed
    }

    /// Linear scan for records whose `field` equals `value` as a string.
    pub fn filter_by(&self, field: UserField, value: &str) -> Vec<User> {
        self.table()
            .rows
            .values()
            .filter(|user| field.matches(user, value))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
