//! Whole-dollar amount helpers: parsing user input, formatting with
//! thousands separators, and the deposit split derived from the price.

/// Initial deposit as a fraction of the purchase price (0.25 %).
pub const INITIAL_DEPOSIT_RATE: f64 = 0.0025;

/// Whole-dollar value of `input`, ignoring `$`, separators and anything after
/// a decimal point. `None` when there are no digits.
pub fn parse_amount(input: &str) -> Option<u64> {
    let whole = input.split('.').next().unwrap_or_default();
    digit_value(whole)
}

/// Value of the ASCII digits in `input`, saturating at `u64::MAX`.
fn digit_value(input: &str) -> Option<u64> {
    let mut digits = input.chars().filter_map(|c| c.to_digit(10)).peekable();
    digits.peek()?;
    Some(digits.fold(0u64, |acc, d| {
        acc.saturating_mul(10).saturating_add(u64::from(d))
    }))
}

/// `true` when `input` holds a non-zero amount. `"$0"` and `""` are unfilled.
pub fn is_filled_amount(input: &str) -> bool {
    parse_amount(input).is_some_and(|n| n > 0)
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Normalize free-form price input for display: digits only, grouped.
pub fn format_currency(input: &str) -> String {
    digit_value(input).map(group_thousands).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositSplit {
    pub initial: u64,
    pub balance: u64,
}

/// Split a price into the initial deposit and the balance that tops it up to
/// `balance_percent` of the price.
pub fn deposit_split(price: u64, balance_percent: u32) -> DepositSplit {
    let price = price as f64;
    let initial = (price * INITIAL_DEPOSIT_RATE).round();
    let balance = (price * f64::from(balance_percent) / 100.0 - initial).round();
    DepositSplit {
        initial: initial as u64,
        balance: balance.max(0.0) as u64,
    }
}
