use super::{parse_amount, split::SymbolSplit, Amount, Symbol, PENNY_PLACES};

use rust_decimal::RoundingStrategy;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    /// The quote service has no rate for this symbol.
    #[error("unable to find rate for symbol {symbol:?}")]
    SymbolNotFound { symbol: Symbol },

    /// The quote service returned a rate that isn't a decimal.
    #[error("failed to parse '{symbol}' rate of '{rate}': {reason}")]
    RateParse {
        symbol: Symbol,
        rate: String,
        reason: String,
    },

    /// The quantity doesn't fit in a decimal.
    #[error("quantity of {symbol} overflows")]
    Overflow { symbol: Symbol },
}

/// How much USD goes to a symbol, and how much of that symbol it buys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    /// USD allocated, rounded to the penny (half to even).
    pub funds: Amount,

    /// `funds * rate`, not rounded: fractions of an asset are fine.
    pub qty: Amount,
}

// Keyed by symbol, so it can't be used to know in which order to print.
// Iterate over the splits for that.
pub type Distributions = HashMap<Symbol, Distribution>;

/// Calculate the distribution of the balance for every split.
///
/// The first failing split aborts the whole calculation.
/// If a symbol appears twice, the last split wins.
pub fn calculate(
    rates: &HashMap<Symbol, String>,
    balance: Amount,
    splits: &[SymbolSplit],
) -> Result<Distributions, Error> {
    let mut distributions = Distributions::with_capacity(splits.len());

    for split in splits {
        let rate = rate_for(rates, &split.symbol)?;
        let distribution = Distribution::new(rate, balance, split)?;

        tracing::debug!(
            symbol = %split.symbol,
            %rate,
            funds = %distribution.funds,
            qty = %distribution.qty,
            "calculated distribution"
        );
        distributions.insert(split.symbol.clone(), distribution);
    }

    Ok(distributions)
}

impl Distribution {
    pub fn new(rate: Amount, balance: Amount, split: &SymbolSplit) -> Result<Self, Error> {
        let overflow = || Error::Overflow {
            symbol: split.symbol.clone(),
        };

        let funds = balance
            .checked_mul(split.fraction)
            .ok_or_else(overflow)?
            .round_dp_with_strategy(PENNY_PLACES, RoundingStrategy::MidpointNearestEven);
        let qty = funds.checked_mul(rate).ok_or_else(overflow)?;

        Ok(Self { funds, qty })
    }
}

/// Sum of the funds of every distribution.
pub fn total_funds(distributions: &Distributions) -> Amount {
    distributions.values().map(|d| d.funds).sum()
}

// Look up the rate of a symbol, and make sure it's a valid decimal.
fn rate_for(rates: &HashMap<Symbol, String>, symbol: &str) -> Result<Amount, Error> {
    let raw = rates.get(symbol).ok_or_else(|| Error::SymbolNotFound {
        symbol: symbol.to_string(),
    })?;

    parse_amount(raw).map_err(|err| Error::RateParse {
        symbol: symbol.to_string(),
        rate: raw.clone(),
        reason: err.to_string(),
    })
}
