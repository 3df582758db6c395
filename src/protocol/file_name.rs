//! File names as they travel on the wire
// (c) 2025 Ross Younger

use std::fmt::Display;

/// A remote file name.
///
/// The protocol treats names as opaque bytes: they are sent back to the server exactly as
/// they were listed, with no terminator. Display is lossy UTF-8.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct FileName(Vec<u8>);

impl FileName {
    /// The raw bytes of the name
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is this the empty name?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for FileName {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<&str> for FileName {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        String::from_utf8_lossy(&self.0).fmt(f)
    }
}

impl std::fmt::Debug for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}
