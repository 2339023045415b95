//! Process identity - the logical key for a connected client

use std::fmt;
use std::hash::{Hash, Hasher};

/// The (name, numeric id) pair naming a client process.
///
/// Equality and hashing consider only `(name, id)`: the `ready` flag is
/// handshake progress, not part of the key. `ready` flips to true exactly
/// once, when both fields arrive in the same handshake payload; after that
/// the identity is only used for lookups.
#[derive(Debug, Default, Clone)]
pub struct ProcessIdentity {
    name: String,
    id: i64,
    ready: bool,
}

impl ProcessIdentity {
    /// Identity with both fields known, usable as a lookup key
    pub fn new(name: impl Into<String>, id: i64) -> Self {
        ProcessIdentity {
            name: name.into(),
            id,
            ready: true,
        }
    }

    /// Process name, empty until the first handshake payload carried one
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric process id, 0 until the handshake completed
    pub fn id(&self) -> i64 {
        self.id
    }

    /// True once both name and id were supplied together
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Record a name seen without an id; the identity stays incomplete.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Complete the identity with both fields.
    pub fn complete(&mut self, name: impl Into<String>, id: i64) {
        debug_assert!(!self.ready, "identity completed twice");
        self.name = name.into();
        self.id = id;
        self.ready = true;
    }
}

impl PartialEq for ProcessIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.id == other.id
    }
}

impl Eq for ProcessIdentity {}

impl Hash for ProcessIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}
