//! IMEI checksum and TAC extraction

/// Digits in a full IMEI
pub const IMEI_LENGTH: usize = 15;

/// Digits in a Type Allocation Code
pub const TAC_LENGTH: usize = 8;

/// Keep only ASCII digits
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Luhn check of a 15-digit IMEI
///
/// Non-digits are ignored. Digits at odd positions (0-based, from the left)
/// are doubled, with 9 subtracted when the result exceeds 9; the IMEI is
/// valid when the sum of all 15 digits is a multiple of 10.
pub fn validate_imei(raw: &str) -> bool {
    let cleaned = digits(raw);
    if cleaned.len() != IMEI_LENGTH {
        return false;
    }

    let sum: u32 = cleaned
        .bytes()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, n)| {
            if i % 2 == 1 {
                let doubled = n * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                n
            }
        })
        .sum();

    sum % 10 == 0
}

/// First 8 digits of the input; shorter when fewer digits were entered
pub fn extract_tac(raw: &str) -> String {
    digits(raw).chars().take(TAC_LENGTH).collect()
}
