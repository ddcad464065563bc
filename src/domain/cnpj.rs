//! CNPJ (company registry number) normalization.

const CNPJ_LEN: usize = 14;

/// Keeps only the digits of `raw`, left-pads with zeros to 14 and cuts anything
/// longer. Returns `None` when there is no digit at all.
pub fn normalize_cnpj(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    if digits.len() >= CNPJ_LEN {
        Some(digits[..CNPJ_LEN].to_string())
    } else {
        Some(format!("{:0>width$}", digits, width = CNPJ_LEN))
    }
}
