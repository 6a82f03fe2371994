pub mod calculate;
pub mod split;

pub use calculate::{calculate, Distribution, Distributions, Error};
pub use split::SymbolSplit;

// Using named types doesn't provide any compiler help, but it helps a lot with
// readability.
// Consider the distributions HashMap:
// (1) HashMap<String, Distribution>
// (2) HashMap<Symbol, Distribution>
// Implementation (2) is self-explanatory.
pub type Symbol = String;

// Money, rates and quantities are all decimals. Binary floats would drift
// as soon as we start rounding to the penny.
pub type Amount = rust_decimal::Decimal;

/// USD amounts are quoted to the penny.
pub const PENNY_PLACES: u32 = 2;

// A decimal holds at most 28 fractional digits.
const MAX_SCALE: i64 = 28;

/// Parse a decimal, accepting scientific notation as a fallback
/// (e.g. `1.5E-5`). Digits past what a decimal can hold are rounded away.
pub fn parse_amount(raw: &str) -> Result<Amount, rust_decimal::Error> {
    use std::str::FromStr;

    reject_separators(raw)?;
    Amount::from_str(raw).or_else(|err| Amount::from_scientific(raw).map_err(|_| err))
}

/// Same as `parse_amount`, but a value that can't be held without rounding is
/// an error.
pub fn parse_exact_amount(raw: &str) -> Result<Amount, rust_decimal::Error> {
    reject_separators(raw)?;

    let Some((mantissa, exponent)) = raw.split_once(['e', 'E']) else {
        return Amount::from_str_exact(trim_fraction_zeros(raw));
    };

    let mantissa = Amount::from_str_exact(trim_fraction_zeros(mantissa))?;
    let exponent: i64 = exponent.parse().map_err(|_| {
        rust_decimal::Error::ErrorString(format!("Invalid decimal: bad exponent in {:?}", raw))
    })?;
    if i64::from(mantissa.normalize().scale()) - exponent > MAX_SCALE {
        return Err(rust_decimal::Error::Underflow);
    }

    Amount::from_scientific(raw)
}

// Whitespace and digit separators make for a malformed number.
fn reject_separators(raw: &str) -> Result<(), rust_decimal::Error> {
    if raw.chars().any(|c| c == '_' || c.is_whitespace()) {
        return Err(rust_decimal::Error::ErrorString(format!(
            "Invalid decimal: unexpected character in {:?}",
            raw
        )));
    }

    Ok(())
}

// Trailing zeros after the point don't add precision: "10.000" is "10".
fn trim_fraction_zeros(raw: &str) -> &str {
    if !raw.contains('.') {
        return raw;
    }

    let trimmed = raw.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}

#[test]
fn test_parse_amount() {
    use rust_decimal_macros::dec;

    for (raw, want) in vec![
        ("100", dec!(100)),
        ("10.05", dec!(10.05)),
        ("0.000016", dec!(0.000016)),
        ("-3", dec!(-3)),
        ("1e2", dec!(100)),
        ("1.5E-5", dec!(0.000015)),
    ] {
        assert_eq!(want, parse_amount(raw).unwrap(), "{}", raw);
    }

    for raw in vec!["", "abc", "1.2.3", "$10", " 100 ", "100\n", "1_000", "1 000"] {
        assert!(parse_amount(raw).is_err(), "{:?}", raw);
    }
}

#[test]
fn test_parse_exact_amount() {
    use rust_decimal_macros::dec;

    for (raw, want) in vec![
        ("100", dec!(100)),
        ("100.10", dec!(100.1)),
        ("10.000", dec!(10)),
        ("10.00000000000000000000000000000000", dec!(10)),
        ("0.0000000000000000000000000001", dec!(0.0000000000000000000000000001)),
        ("1e3", dec!(1000)),
        ("2.50E1", dec!(25)),
        ("1.5e-5", dec!(0.000015)),
    ] {
        assert_eq!(want, parse_exact_amount(raw).unwrap(), "{}", raw);
    }

    for raw in vec![
        "10.0000000000000000000000000000005",
        "0.00000000000000000000000000001",
        "1e-29",
        "1.5e-28",
        "1_000",
        " 100",
        "abc",
        "1e",
    ] {
        assert!(parse_exact_amount(raw).is_err(), "{:?}", raw);
    }
}
