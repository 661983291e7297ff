use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PhoneVerdict {
    pub valid: bool,
    pub formatted_phone: Option<String>,
    pub message: String,
}

/// Parses a raw string as a US telephone number and normalizes it to the
/// national format `(555) 123-4567`. Accepts an optional leading `1` or
/// `+1` country code; requires ten remaining digits with an area code
/// starting 2-9.
pub fn validate_phone(raw: &str) -> PhoneVerdict {
    let digits: Vec<u8> = raw
        .bytes()
        .filter(|b| b.is_ascii_digit())
        .map(|b| b - b'0')
        .collect();

    let national: &[u8] = match digits.len() {
        10 => &digits,
        11 if digits[0] == 1 => &digits[1..],
        _ => {
            return invalid();
        }
    };

    if national[0] < 2 {
        return invalid();
    }

    let fmt = |slice: &[u8]| -> String { slice.iter().map(|d| (d + b'0') as char).collect() };
    let formatted = format!(
        "({}) {}-{}",
        fmt(&national[..3]),
        fmt(&national[3..6]),
        fmt(&national[6..])
    );

    PhoneVerdict {
        valid: true,
        message: format!("I have your phone number as {formatted}."),
        formatted_phone: Some(formatted),
    }
}

fn invalid() -> PhoneVerdict {
    PhoneVerdict {
        valid: false,
        formatted_phone: None,
        message: "That doesn't appear to be a valid US phone number. Please provide a 10-digit number."
            .to_string(),
    }
}
