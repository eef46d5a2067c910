//! String interner for symbols and string literals.
//!
//! Strings are leaked on first intern and never deallocated, so lookups can
//! hand out `&'static str`. Interning happens on the front end and when the
//! evaluator registers primitives; lookups happen whenever a value or error
//! needs to show a symbol.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Names interned by every `StringInterner` at construction, in this order.
///
/// The evaluator recognizes special forms by comparing against these
/// constants instead of re-interning on every call.
pub mod well_known {
    use super::Name;

    pub const IF: Name = Name::from_raw(1);
    pub const DEFINE: Name = Name::from_raw(2);
    pub const LAMBDA: Name = Name::from_raw(3);

    pub(super) const TEXT: [&str; 4] = ["", "if", "define", "lambda"];
}

#[derive(Default)]
struct InternTable {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Interner mapping strings to compact `Name`s.
///
/// # Thread Safety
/// Uses a `RwLock` so a shared interner can be read from several places at
/// once (the driver holds one while rendering diagnostics for a running
/// interpreter).
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string and special form names
    /// pre-interned (see [`well_known`]).
    pub fn new() -> Self {
        let interner = StringInterner {
            table: RwLock::new(InternTable::default()),
        };
        for text in well_known::TEXT {
            interner.intern(text);
        }
        interner
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: check if already interned
        if let Some(&name) = self.table.read().map.get(s) {
            return name;
        }

        let mut table = self.table.write();

        // Double-check after acquiring write lock
        if let Some(&name) = table.map.get(s) {
            return name;
        }

        let raw = u32::try_from(table.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded {} strings", u32::MAX));
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let name = Name::from_raw(raw);
        table.strings.push(leaked);
        table.map.insert(leaked, name);
        name
    }

    /// Look up the string for a Name.
    ///
    /// Names from a different interner resolve to the empty string rather
    /// than panicking.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, including the pre-interned ones.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Check if nothing beyond the pre-interned names has been added.
    pub fn is_empty(&self) -> bool {
        self.len() <= well_known::TEXT.len()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared interner handed to every phase that outlives the caller: the
/// parser output, the interpreter, and the driver's diagnostic renderer.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
