use crate::distribution::{parse_amount, parse_exact_amount, Amount, SymbolSplit, PENNY_PLACES};

use rust_decimal::RoundingStrategy;
use thiserror::Error;

pub const USAGE: &str = "Usage: coinz <AMOUNT_USD> <symbol_1> <symbol_2>";

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error("incorrect number of arguments: expected 3, got {got}")]
    ArgumentCount { got: usize },

    #[error("failed to parse balance '{value}': {reason}")]
    BalanceParse { value: String, reason: String },

    #[error("balance of {balance} is too low to trade")]
    BalanceTooLow { balance: Amount },

    #[error("subpenny quoting is illegal https://www.sec.gov/divisions/marketreg/subpenny612faq.htm '{value}'")]
    SubpennyPrecision { value: String },
}

/// What the user asked for: a balance to split, and how to split it.
#[derive(Debug, PartialEq)]
pub struct Order {
    pub balance: Amount,
    pub splits: Vec<SymbolSplit>,
}

// The expected format is: coinz 100 BTC ETH
// Arguments are validated before anything touches the network.
impl TryFrom<&[String]> for Order {
    type Error = Error;

    fn try_from(args: &[String]) -> Result<Self, Self::Error> {
        // Balance, then the two symbols.
        let [balance, primary, secondary] = args else {
            return Err(Error::ArgumentCount { got: args.len() });
        };

        Ok(Self {
            balance: parse_balance(balance)?,
            splits: SymbolSplit::seventy_thirty(primary.as_str(), secondary.as_str()),
        })
    }
}

// A balance must be strictly positive, and quoted to the penny at most.
// It's parsed exactly: rounding away extra digits would hide subpenny amounts.
fn parse_balance(raw: &str) -> Result<Amount, Error> {
    let balance = match parse_exact_amount(raw) {
        Ok(balance) => balance,
        // If it only parses once rounded, it has more decimals than we can
        // hold.
        Err(err) => match parse_amount(raw) {
            Ok(rounded) if raw.starts_with('-') => {
                return Err(Error::BalanceTooLow {
                    balance: rounded.normalize(),
                })
            }
            Ok(_) => {
                return Err(Error::SubpennyPrecision {
                    value: raw.to_string(),
                })
            }
            Err(_) => {
                return Err(Error::BalanceParse {
                    value: raw.to_string(),
                    reason: err.to_string(),
                })
            }
        },
    };

    if balance <= Amount::ZERO {
        return Err(Error::BalanceTooLow {
            balance: balance.normalize(),
        });
    }

    let rounded =
        balance.round_dp_with_strategy(PENNY_PLACES, RoundingStrategy::MidpointNearestEven);
    if balance != rounded {
        return Err(Error::SubpennyPrecision {
            value: raw.to_string(),
        });
    }

    Ok(balance)
}
