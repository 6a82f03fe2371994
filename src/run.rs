use crate::{
    distribution,
    input::Order,
    output::{self, Format},
    quote::RateSource,
    Error,
};

/// Validate the arguments, fetch the rates, split the balance and write the
/// result.
///
/// The arguments are checked before the rates are requested, so a bad
/// invocation never reaches the network. Nothing is written unless every step
/// succeeded.
pub fn run(
    args: &[String],
    source: &impl RateSource,
    format: Format,
    output_stream: impl std::io::Write,
) -> Result<(), Error> {
    let order = Order::try_from(args)?;
    tracing::debug!(balance = %order.balance, splits = ?order.splits, "validated order");

    let table = source.fetch_rates()?;
    tracing::debug!(currency = %table.currency, rates = table.rates.len(), "fetched rates");

    let distributions = distribution::calculate(&table.rates, order.balance, &order.splits)?;

    output::write(
        output_stream,
        format,
        order.balance,
        &distributions,
        &order.splits,
    )?;

    Ok(())
}
