use clap::Parser;
use coinz::{
    cli::{Args, Config},
    input,
    quote::QuoteClient,
    run::run,
    Error,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Expected usage: coinz 100 BTC ETH
fn main() {
    let args = Args::parse();

    // Logs go to stderr: stdout is for the distributions.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = start(&args.args, &Config::from(&args)) {
        if err.needs_usage() {
            println!("{}", input::USAGE);
        }
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

fn start(args: &[String], config: &Config) -> Result<(), Error> {
    let source = QuoteClient::new(config.endpoint.as_str(), config.timeout)?;
    let stdout = std::io::stdout();

    run(args, &source, config.format, stdout.lock())
}
