use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Barcode symbologies a decoder can be asked to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    /// UPC-A retail barcode
    #[default]
    UpcA,
    /// EAN-13 retail barcode
    Ean13,
    /// Code 128 general purpose barcode
    Code128,
}

impl Symbology {
    /// All supported symbologies
    pub const ALL: [Symbology; 3] = [Symbology::UpcA, Symbology::Ean13, Symbology::Code128];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbology::UpcA => "upc_a",
            Symbology::Ean13 => "ean_13",
            Symbology::Code128 => "code_128",
        }
    }
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbology {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|symbology| symbology.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownSymbology(s.to_string()))
    }
}
