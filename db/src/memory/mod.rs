//! in-process backend used by tests and by `backend: memory` deployments;
//! nothing survives a restart

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

mod comment;
mod friend;
mod post;
mod token;
mod user;

pub use comment::MemoryComment;
pub use friend::MemoryFriendRequest;
pub use post::MemoryPost;
pub use token::MemoryToken;
pub use user::MemoryUser;

/// rows keyed by id, remembering insertion order
pub(crate) struct Table<T> {
    rows: DashMap<String, (u64, T)>,
    seq: AtomicU64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }
}

impl<T> Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("rows", &self.rows.len())
            .finish()
    }
}

impl<T: Clone> Table<T> {
    pub fn insert(&self, id: impl Into<String>, value: T) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.rows.insert(id.into(), (seq, value));
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.rows.get(id).map(|row| row.value().1.clone())
    }

    /// mutate in place and return the new value
    pub fn update(&self, id: &str, f: impl FnOnce(&mut T)) -> Option<T> {
        self.rows.get_mut(id).map(|mut row| {
            let value = &mut row.value_mut().1;
            f(value);
            value.clone()
        })
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        self.rows.remove(id).map(|(_, (_, value))| value)
    }

    /// matching rows in insertion order
    pub fn find(&self, filter: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<(u64, T)> = self
            .rows
            .iter()
            .filter(|row| filter(&row.value().1))
            .map(|row| row.value().clone())
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, value)| value).collect()
    }

    /// matching rows, most recently inserted first
    pub fn find_newest(&self, filter: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows = self.find(filter);
        rows.reverse();
        rows
    }

    /// drop matching rows, returns how many were removed
    pub fn remove_where(&self, filter: impl Fn(&T) -> bool) -> u64 {
        let mut removed = 0;
        self.rows.retain(|_, (_, value)| {
            if filter(&*value) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}

pub(crate) fn toggle(list: &mut Vec<String>, id: &str, present: bool) {
    list.retain(|item| item != id);
    if present {
        list.push(id.to_string());
    }
}
