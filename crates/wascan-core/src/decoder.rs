//! Barcode decoding backed by rxing

use crate::ports::SymbolDecoder;
use rxing::{
    BinaryBitmap, Luma8LuminanceSource, Reader,
    common::HybridBinarizer,
    oned::{Code128Reader, EAN13Reader, UPCAReader},
};
use wascan_domain::{ErrorCode, LumaFrame, Symbology};

/// Decodes one-dimensional symbols with rxing
///
/// Symbologies are tried in the configured order; the first hit wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RxingDecoder {
    symbologies: Vec<Symbology>,
}

impl Default for RxingDecoder {
    fn default() -> Self {
        Self::new(vec![Symbology::default()])
    }
}

impl RxingDecoder {
    /// Decoder for the given symbologies. An empty list falls back to UPC-A.
    pub fn new(symbologies: Vec<Symbology>) -> Self {
        let symbologies = if symbologies.is_empty() {
            vec![Symbology::default()]
        } else {
            symbologies
        };
        Self { symbologies }
    }

    /// Symbologies tried, in order
    pub fn symbologies(&self) -> &[Symbology] {
        &self.symbologies
    }

    fn decode_one(symbology: Symbology, frame: &LumaFrame) -> Option<String> {
        let source =
            Luma8LuminanceSource::new(frame.pixels().to_vec(), frame.width(), frame.height());
        let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));

        let decoded = match symbology {
            Symbology::UpcA => UPCAReader::default().decode(&mut bitmap),
            Symbology::Ean13 => EAN13Reader::default().decode(&mut bitmap),
            Symbology::Code128 => Code128Reader::default().decode(&mut bitmap),
        };
        decoded.ok().map(|result| result.getText().to_string())
    }
}

impl SymbolDecoder for RxingDecoder {
    fn decode(&self, frame: &LumaFrame) -> Result<String, ErrorCode> {
        self.symbologies
            .iter()
            .find_map(|symbology| Self::decode_one(*symbology, frame))
            .ok_or(ErrorCode::NotDetected)
    }
}
