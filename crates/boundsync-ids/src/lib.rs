//! Shared identifiers for tracked windows and window groups.
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

use std::fmt;

/// Application-level identity of a window.
///
/// A window is addressed by the uuid of the application that owns it and a
/// name that is unique within that application. Trackers, group records and
/// notification payloads all refer to windows through this pair rather than
/// through native handles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowIdentity {
    /// Uuid of the owning application.
    uuid: String,
    /// Window name, unique within the owning application.
    name: String,
}

impl WindowIdentity {
    /// Construct an identity from an application uuid and a window name.
    #[must_use]
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
        }
    }

    /// Uuid of the owning application.
    #[must_use]
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Window name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for WindowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.uuid, self.name)
    }
}

impl<U: Into<String>, N: Into<String>> From<(U, N)> for WindowIdentity {
    fn from(value: (U, N)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// Identifier of a window group.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(String);

impl GroupId {
    /// Construct a group identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host-assigned numeric id of a native window object.
///
/// This is the id the animation subsystem and the deferred-move relay use to
/// address a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u32);

impl WindowId {
    /// Wrap a raw host id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform window handle (an `HWND` on Win32 targets).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(isize);

impl NativeHandle {
    /// Wrap a raw platform handle value.
    #[must_use]
    pub const fn new(raw: isize) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
