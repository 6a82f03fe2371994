use crate::distribution::{
    calculate::total_funds, Amount, Distribution, Distributions, SymbolSplit,
};

use serde::Serialize;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write output: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// `$70.00 => 0.0014 BTC`, one line per symbol.
    #[default]
    Text,

    /// `symbol,funds,quantity` records.
    Csv,
}

#[derive(Serialize)]
struct DistributionRecord<'a> {
    symbol: &'a str,

    funds: String,

    #[serde(rename = "quantity")]
    qty: String,
}

impl<'a> DistributionRecord<'a> {
    fn new(symbol: &'a str, distribution: &Distribution) -> Self {
        Self {
            symbol,
            funds: format_funds(distribution.funds),
            qty: format_qty(distribution.qty),
        }
    }
}

// Funds are always shown to the penny.
fn format_funds(funds: Amount) -> String {
    format!("{:.2}", funds)
}

// Quantities keep their full precision, minus the trailing zeros.
fn format_qty(qty: Amount) -> String {
    qty.normalize().to_string()
}

/// The warning to show when rounding each split to the penny doesn't add up
/// to the balance.
pub fn uneven_split_warning(balance: Amount, distributions: &Distributions) -> Option<String> {
    if total_funds(distributions) == balance {
        return None;
    }

    Some(format!(
        "Warning: balance '{}' can not be equally split",
        balance.normalize()
    ))
}

/// One line per split, in the order of the splits.
///
/// The distributions are a map, so they're only used for lookups: iterating
/// over them would give a random order.
pub fn distribution_lines(distributions: &Distributions, splits: &[SymbolSplit]) -> Vec<String> {
    splits
        .iter()
        .filter_map(|split| {
            distributions.get(&split.symbol).map(|distribution| {
                format!(
                    "${} => {} {}",
                    format_funds(distribution.funds),
                    format_qty(distribution.qty),
                    split.symbol
                )
            })
        })
        .collect()
}

// Writes the distributions to the given stream.
// Everything is rendered before writing, so an error never leaves half a
// report behind.
pub fn write(
    mut output_stream: impl Write,
    format: Format,
    balance: Amount,
    distributions: &Distributions,
    splits: &[SymbolSplit],
) -> Result<(), Error> {
    let warning = uneven_split_warning(balance, distributions);

    match format {
        Format::Text => {
            let mut report = String::new();
            for line in warning
                .into_iter()
                .chain(distribution_lines(distributions, splits))
            {
                report.push_str(&line);
                report.push('\n');
            }
            output_stream.write_all(report.as_bytes())?;
        }
        Format::Csv => {
            // Keep the CSV clean: the warning goes to the logs instead.
            if let Some(warning) = warning {
                tracing::warn!("{}", warning);
            }

            let mut writer = csv::Writer::from_writer(Vec::new());
            for split in splits {
                if let Some(distribution) = distributions.get(&split.symbol) {
                    writer.serialize(DistributionRecord::new(&split.symbol, distribution))?;
                }
            }
            let report = writer.into_inner().map_err(|err| err.into_error())?;
            output_stream.write_all(&report)?;
        }
    }

    output_stream.flush()?;
    Ok(())
}
