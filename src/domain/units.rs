//! Unit conversion: wei <-> ether

use alloy::primitives::U256;

/// Decimals of the native currency
pub const ETHER_DECIMALS: usize = 18;

/// Decimal places shown for balances
pub const DISPLAY_DECIMALS: usize = 2;

/// Convert a user-entered ether amount to wei.
///
/// Digits beyond the 18th decimal place are dropped since they have no wei
/// representation.
pub fn amount_to_wei(amount: f64) -> Result<U256, String> {
    if !amount.is_finite() {
        return Err(format!("Invalid amount: {}", amount));
    }
    if amount < 0.0 {
        return Err(format!("Amount must not be negative: {}", amount));
    }
    if amount == 0.0 {
        return Ok(U256::ZERO);
    }
    // f64 Display never uses exponent notation
    parse_ether(&amount.to_string())
}

/// Parse a decimal ether string ("1.5", "0.01", "3") into wei
pub fn parse_ether(value: &str) -> Result<U256, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Empty amount".to_string());
    }

    let (integer_part, decimal_part) = match value.split_once('.') {
        Some((int, dec)) => (int, dec),
        None => (value, ""),
    };
    if !integer_part.chars().all(|c| c.is_ascii_digit())
        || !decimal_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(format!("Invalid number: {}", value));
    }

    let integer = if integer_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(integer_part, 10)
            .map_err(|_| format!("Invalid integer: {}", integer_part))?
    };

    let decimal_digits: String = decimal_part.chars().take(ETHER_DECIMALS).collect();
    let padded = format!("{:0<width$}", decimal_digits, width = ETHER_DECIMALS);
    let decimal = U256::from_str_radix(&padded, 10)
        .map_err(|_| format!("Invalid decimal: {}", decimal_part))?;

    integer
        .checked_mul(wei_per_ether())
        .and_then(|v| v.checked_add(decimal))
        .ok_or_else(|| "Overflow".to_string())
}

/// Balance display string: ether rounded half-up to `places` decimals
pub fn format_balance(wei: U256, places: usize) -> String {
    let places = places.min(ETHER_DECIMALS);
    let scale = U256::from(10u64).pow(U256::from(ETHER_DECIMALS - places));
    let rounded = wei.saturating_add(scale / U256::from(2u64)) / scale;

    if places == 0 {
        return rounded.to_string();
    }
    let divisor = U256::from(10u64).pow(U256::from(places));
    let whole = rounded / divisor;
    let frac = rounded % divisor;
    format!("{}.{:0>width$}", whole, frac.to_string(), width = places)
}

fn wei_per_ether() -> U256 {
    U256::from(1_000_000_000_000_000_000u64)
}
