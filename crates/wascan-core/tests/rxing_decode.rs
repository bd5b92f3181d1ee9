//! End-to-end decode of a rendered UPC-A symbol

#![cfg(feature = "rxing")]

use wascan_core::{ErrorCode, LumaFrame, RxingDecoder, SymbolDecoder, Symbology};

const L_CODES: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011", "0110001", "0101111", "0111011",
    "0110111", "0001011",
];

/// Module pattern (1 = bar) for a 12-digit UPC-A value
fn upca_modules(digits: &str) -> String {
    let digits: Vec<usize> = digits
        .chars()
        .map(|c| c.to_digit(10).unwrap() as usize)
        .collect();
    assert_eq!(digits.len(), 12);

    let mut modules = String::from("101");
    for digit in &digits[..6] {
        modules.push_str(L_CODES[*digit]);
    }
    modules.push_str("01010");
    for digit in &digits[6..] {
        // Right-hand codes are the complement of left-hand odd parity
        modules.extend(L_CODES[*digit].chars().map(|c| if c == '1' { '0' } else { '1' }));
    }
    modules.push_str("101");
    modules
}

fn render(digits: &str, scale: u32, height: u32) -> LumaFrame {
    let quiet = "0".repeat(12);
    let row: Vec<u8> = format!("{quiet}{}{quiet}", upca_modules(digits))
        .chars()
        .flat_map(|m| std::iter::repeat_n(if m == '1' { 0u8 } else { 255u8 }, scale as usize))
        .collect();
    let width = row.len() as u32;
    let pixels = row.iter().copied().cycle().take((width * height) as usize).collect();
    LumaFrame::new(width, height, pixels, 0).unwrap()
}

#[test]
fn test_decodes_rendered_upca() {
    let frame = render("036000291452", 3, 60);
    assert_eq!(
        RxingDecoder::default().decode(&frame),
        Ok("036000291452".to_string())
    );
}

#[test]
fn test_wrong_symbology_misses() {
    let frame = render("036000291452", 3, 60);
    let decoder = RxingDecoder::new(vec![Symbology::Code128]);
    assert_eq!(decoder.decode(&frame), Err(ErrorCode::NotDetected));
}
