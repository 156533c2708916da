use thiserror::Error;

/// Monetary amounts are integer cents, two implied fraction digits.
/// 1000.00 in account currency = 100_000 cents.
pub type Cents = i64;

/// Render cents as a decimal string: 123456 -> "1234.56", -5 -> "-0.05".
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal amount string into cents.
///
/// Accepts whole amounts ("250"), one or two fraction digits ("250.5",
/// "250.50") and an optional leading minus. Anything beyond two fraction
/// digits is rejected rather than silently dropped: sub-cent input to a
/// ledger is an operator mistake, not a rounding opportunity. Amounts that
/// do not fit the cents range are rejected too.
pub fn parse_cents(input: &str) -> Result<Cents, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units_str, fraction_str) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };
    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(ParseAmountError::InvalidDigits(input.to_string()));
    }
    // Only bare digits past the optional minus; i64's own parser would
    // take a second sign here.
    if !units_str.bytes().all(|b| b.is_ascii_digit())
        || !fraction_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ParseAmountError::InvalidDigits(input.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseAmountError::OutOfRange(input.to_string()))?
    };

    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        1 => {
            fraction_str
                .parse::<i64>()
                .map_err(|_| ParseAmountError::InvalidDigits(input.to_string()))?
                * 10
        }
        2 => fraction_str
            .parse()
            .map_err(|_| ParseAmountError::InvalidDigits(input.to_string()))?,
        _ => return Err(ParseAmountError::TooManyDecimals(input.to_string())),
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(|| ParseAmountError::OutOfRange(input.to_string()))?;
    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Amount is not a decimal number: {0:?}")]
    InvalidDigits(String),
    #[error("Amount has more than two fraction digits: {0:?}")]
    TooManyDecimals(String),
    #[error("Amount is out of range: {0:?}")]
    OutOfRange(String),
}
