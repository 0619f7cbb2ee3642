//! Store capability surface.

use std::fmt;

/// Which store operations are available.
///
/// A store must expose all four to be wrapped; see `validate_store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCapabilities {
    /// Fetch one document by id.
    pub get: bool,
    /// Insert or update one document.
    pub put: bool,
    /// List documents, optionally by keys.
    pub all_docs: bool,
    /// Write many documents.
    pub bulk_docs: bool,
}

impl StoreCapabilities {
    pub const ALL: Self = Self {
        get: true,
        put: true,
        all_docs: true,
        bulk_docs: true,
    };

    /// Read-only surface (`get` + `all_docs`).
    pub const READ_ONLY: Self = Self {
        get: true,
        put: false,
        all_docs: true,
        bulk_docs: false,
    };

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Names of the operations that are not available.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.get, "get"),
            (self.put, "put"),
            (self.all_docs, "all_docs"),
            (self.bulk_docs, "bulk_docs"),
        ]
        .into_iter()
        .filter(|(present, _)| !present)
        .map(|(_, name)| name)
        .collect()
    }
}

impl Default for StoreCapabilities {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for StoreCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing = self.missing();
        if missing.is_empty() {
            f.write_str("complete")
        } else {
            write!(f, "missing {}", missing.join(", "))
        }
    }
}
