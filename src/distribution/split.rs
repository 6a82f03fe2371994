use super::{Amount, Symbol};

use rust_decimal_macros::dec;

/// Share of the balance allocated to the first symbol.
pub const PRIMARY_SPLIT: Amount = dec!(0.70);

/// Share of the balance allocated to the second symbol.
pub const SECONDARY_SPLIT: Amount = dec!(0.30);

/// A symbol and the fraction of the balance it should receive.
///
/// The order of a list of splits is the order of the command-line arguments,
/// and it's what drives the order of the output.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSplit {
    pub symbol: Symbol,
    pub fraction: Amount,
}

impl SymbolSplit {
    pub fn new(symbol: impl Into<Symbol>, fraction: Amount) -> Self {
        Self {
            symbol: symbol.into(),
            fraction,
        }
    }

    // This could be reworked to accept any number of symbols, as long as
    // their fractions add up to 1.
    pub fn seventy_thirty(primary: impl Into<Symbol>, secondary: impl Into<Symbol>) -> Vec<Self> {
        vec![
            Self::new(primary, PRIMARY_SPLIT),
            Self::new(secondary, SECONDARY_SPLIT),
        ]
    }
}

#[test]
fn test_seventy_thirty_keeps_argument_order() {
    let splits = SymbolSplit::seventy_thirty("ETH", "BTC");

    assert_eq!(
        vec![
            SymbolSplit::new("ETH", dec!(0.7)),
            SymbolSplit::new("BTC", dec!(0.3)),
        ],
        splits
    );
    assert_eq!(dec!(1), PRIMARY_SPLIT + SECONDARY_SPLIT);
}
