//! UUID-based identifiers
//!
//! Phantom-typed so a session id can never be passed where an activation id
//! is expected. The marker trait is sealed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

mod private {
    pub trait Sealed {}
}

/// Marker trait for type-safe ID differentiation.
pub trait IdMarker: private::Sealed + 'static {}

/// Marker for one controller lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionMarker;

/// Marker for one start→stop run of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivationMarker;

impl private::Sealed for SessionMarker {}
impl private::Sealed for ActivationMarker {}

impl IdMarker for SessionMarker {}
impl IdMarker for ActivationMarker {}

/// UUID v4 identifier tagged with a marker type.
///
/// ```compile_fail
/// # use wascan_domain::value_objects::{ActivationId, SessionId};
/// let session_id = SessionId::new();
/// let activation_id: ActivationId = session_id;
/// ```
pub struct Id<T: IdMarker> {
    value: Uuid,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// Create new random identifier
    #[must_use]
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Parse from the hyphenated string form
    ///
    /// # Errors
    ///
    /// Returns `uuid::Error` if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self::from_uuid)
    }

    /// Underlying UUID
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.value
    }
}

// Manual impls: derives would demand the bounds on `T` itself.
impl<T: IdMarker> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: IdMarker> Copy for Id<T> {}

impl<T: IdMarker> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: IdMarker> Eq for Id<T> {}

impl<T: IdMarker> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: IdMarker> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IdMarker> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown")
            .trim_end_matches("Marker");
        write!(f, "{type_name}Id({})", self.value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}

/// Identifier of a scan session controller
pub type SessionId = Id<SessionMarker>;

/// Identifier of one activation (start event → stop event)
pub type ActivationId = Id<ActivationMarker>;
