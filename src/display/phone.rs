const PHONE_DIGITS: usize = 10;

/// Digits of `input`, truncated to a 10-digit US number.
pub fn phone_digits(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

/// Formats as-you-type: "312" -> "(312", "31255" -> "(312) 55",
/// "3125551234" -> "(312) 555-1234". Extra digits are dropped.
pub fn format_phone(input: &str) -> String {
    let digits = phone_digits(input);
    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({}", digits),
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

pub fn is_complete_phone(input: &str) -> bool {
    phone_digits(input).len() == PHONE_DIGITS
}
