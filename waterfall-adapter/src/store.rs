use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::{Error, Result};

#[cfg(feature = "std")]
type EntryMap = HashMap<String, String>;
#[cfg(not(feature = "std"))]
type EntryMap = BTreeMap<String, String>;

/// A session-scoped string → string store holding scroll-restore records.
///
/// This mirrors what a browser's session storage offers; hosts can back it with whatever they
/// have. Reads are infallible (a missing record is `None`), writes may fail.
pub trait ScrollStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// An in-memory [`ScrollStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryScrollStore {
    entries: EntryMap,
}

impl MemoryScrollStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

impl ScrollStore for MemoryScrollStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(String::from(key), value);
        Ok(())
    }
}

impl<S: ScrollStore + ?Sized> ScrollStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Lets several controllers (e.g. a list and a modal) share one session store.
impl<S: ScrollStore + ?Sized> ScrollStore for Rc<RefCell<S>> {
    fn get(&self, key: &str) -> Option<String> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.borrow_mut().set(key, value)
    }
}

/// Parses a persisted scroll offset.
///
/// Surrounding whitespace is ignored and an empty record means `0`. Anything that is not a
/// finite number is an error.
pub fn parse_scroll_offset(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidScrollRecord {
            raw: String::from(raw),
        }),
    }
}

/// Formats an offset the way it is persisted (`120`, not `120.0`).
pub fn format_scroll_offset(offset: f64) -> String {
    format!("{offset}")
}

/// Reads the offset stored under `key`. Missing or unreadable records read as `0`.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn read_scroll_offset<S: ScrollStore + ?Sized>(store: &S, key: &str) -> f64 {
    let Some(raw) = store.get(key) else {
        return 0.0;
    };
    match parse_scroll_offset(&raw) {
        Ok(v) => v,
        Err(err) => {
            vdebug!(key, error = %err, "ignoring scroll record");
            0.0
        }
    }
}

/// Builds a restore key from a scope and the parts identifying the view,
/// e.g. `restore_key("scroll", &[query, category])` → `scroll:<query>:<category>`.
pub fn restore_key(scope: &str, parts: &[&str]) -> String {
    let mut key = String::from(scope);
    for part in parts {
        key.push(':');
        key.push_str(part);
    }
    key
}
