//! Catalog of error codes reported through detect events and init failures
//!
//! The catalog is fixed at compile time. Each code has a variant name (the key
//! JavaScript callers see from `error_codes()`) and a wire identifier such as
//! `ERR_NOT_DETECTED` (the value carried in a failed detection).

use crate::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Named error identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, thiserror::Error)]
pub enum ErrorCode {
    /// Host has no window object
    #[error("ERR_NO_WINDOW")]
    WindowNotFound,

    /// Host has no document
    #[error("ERR_NO_DOCUMENT")]
    DocumentNotFound,

    /// File selection capability is missing
    #[error("ERR_NO_FILE_ACCESS")]
    NoFileAccess,

    /// The file dialog was dismissed or returned no file
    #[error("ERR_NO_FILE_SELECTED")]
    NoFileSelected,

    /// Selected file is not an image
    #[error("ERR_INVALID_MIME")]
    InvalidMime,

    /// Image bytes could not be decoded
    #[error("ERR_UNSUPPORTED_FORMAT")]
    UnsupportedFormat,

    /// Target surface is missing or is not a video element
    #[error("ERR_INVALID_VIDEO_ELEMENT_ID")]
    InvalidVideoElementId,

    /// Media APIs or camera unavailable
    #[error("ERR_NO_MEDIA")]
    NoMedia,

    /// Camera permission denied
    #[error("ERR_NO_PERMISSION")]
    NoPermission,

    /// No symbol found
    #[error("ERR_NOT_DETECTED")]
    NotDetected,

    /// Operation called before its initialization step
    #[error("ERR_NOT_INITIALIZED")]
    NotInitialized,

    /// Unexpected host or runtime failure
    #[error("ERR_INTERNAL")]
    Internal,
}

impl ErrorCode {
    /// Every code, in catalog order
    pub const ALL: [ErrorCode; 12] = [
        ErrorCode::WindowNotFound,
        ErrorCode::DocumentNotFound,
        ErrorCode::NoFileAccess,
        ErrorCode::NoFileSelected,
        ErrorCode::InvalidMime,
        ErrorCode::UnsupportedFormat,
        ErrorCode::InvalidVideoElementId,
        ErrorCode::NoMedia,
        ErrorCode::NoPermission,
        ErrorCode::NotDetected,
        ErrorCode::NotInitialized,
        ErrorCode::Internal,
    ];

    /// Variant name used as the catalog key
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::WindowNotFound => "WindowNotFound",
            ErrorCode::DocumentNotFound => "DocumentNotFound",
            ErrorCode::NoFileAccess => "NoFileAccess",
            ErrorCode::NoFileSelected => "NoFileSelected",
            ErrorCode::InvalidMime => "InvalidMime",
            ErrorCode::UnsupportedFormat => "UnsupportedFormat",
            ErrorCode::InvalidVideoElementId => "InvalidVideoElementId",
            ErrorCode::NoMedia => "NoMedia",
            ErrorCode::NoPermission => "NoPermission",
            ErrorCode::NotDetected => "NotDetected",
            ErrorCode::NotInitialized => "NotInitialized",
            ErrorCode::Internal => "Internal",
        }
    }

    /// Wire identifier (`ERR_*`)
    pub fn identifier(&self) -> &'static str {
        match self {
            ErrorCode::WindowNotFound => "ERR_NO_WINDOW",
            ErrorCode::DocumentNotFound => "ERR_NO_DOCUMENT",
            ErrorCode::NoFileAccess => "ERR_NO_FILE_ACCESS",
            ErrorCode::NoFileSelected => "ERR_NO_FILE_SELECTED",
            ErrorCode::InvalidMime => "ERR_INVALID_MIME",
            ErrorCode::UnsupportedFormat => "ERR_UNSUPPORTED_FORMAT",
            ErrorCode::InvalidVideoElementId => "ERR_INVALID_VIDEO_ELEMENT_ID",
            ErrorCode::NoMedia => "ERR_NO_MEDIA",
            ErrorCode::NoPermission => "ERR_NO_PERMISSION",
            ErrorCode::NotDetected => "ERR_NOT_DETECTED",
            ErrorCode::NotInitialized => "ERR_NOT_INITIALIZED",
            ErrorCode::Internal => "ERR_INTERNAL",
        }
    }

    /// Look up a code by its wire identifier
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.identifier() == identifier)
    }

    /// Name → identifier map, the shape returned by `error_codes()`
    pub fn catalog() -> BTreeMap<&'static str, &'static str> {
        Self::ALL
            .into_iter()
            .map(|code| (code.name(), code.identifier()))
            .collect()
    }
}

impl FromStr for ErrorCode {
    type Err = DomainError;

    /// Accepts either the wire identifier or the variant name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s)
            .or_else(|| Self::ALL.into_iter().find(|code| code.name() == s))
            .ok_or_else(|| DomainError::UnknownErrorCode(s.to_string()))
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.identifier())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_identifier() {
        for code in ErrorCode::ALL {
            assert_eq!(code.to_string(), code.identifier());
        }
    }

    #[test]
    fn test_catalog_is_complete_and_unique() {
        let catalog = ErrorCode::catalog();
        assert_eq!(catalog.len(), ErrorCode::ALL.len());

        let mut identifiers: Vec<_> = catalog.values().collect();
        identifiers.sort();
        identifiers.dedup();
        assert_eq!(identifiers.len(), ErrorCode::ALL.len());
    }

    #[test]
    fn test_catalog_is_stable_across_calls() {
        let first = ErrorCode::catalog();
        assert!(!first.is_empty());
        assert_eq!(first, ErrorCode::catalog());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&ErrorCode::catalog()).unwrap()
        );
        assert_eq!(first.get("NotDetected"), Some(&"ERR_NOT_DETECTED"));
    }

    #[test]
    fn test_parse_by_name_or_identifier() {
        assert_eq!("ERR_NO_PERMISSION".parse::<ErrorCode>().unwrap(), ErrorCode::NoPermission);
        assert_eq!("NoPermission".parse::<ErrorCode>().unwrap(), ErrorCode::NoPermission);
        assert!("ERR_BOGUS".parse::<ErrorCode>().is_err());
    }
}
