use crate::{
    output::Format,
    quote::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT},
};

use clap::Parser;
use std::time::Duration;

/// Splits a USD balance 70/30 between two crypto assets, at the current
/// exchange rates.
#[derive(Parser, Debug)]
#[command(name = "coinz", version, about, long_about = None)]
pub struct Args {
    /// <AMOUNT_USD> <symbol_1> <symbol_2>, e.g. `100 BTC ETH`
    #[arg(value_name = "ARGS", allow_negative_numbers = true)]
    pub args: Vec<String>,

    /// Exchange rates endpoint. `currency=USD` is added to the query.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Give up on the exchange rates request after this many seconds
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Log filter to use when `RUST_LOG` isn't set.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "coinz=debug"
        } else {
            "coinz=warn"
        }
    }
}

/// Settings for a run, once the command line has been parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub endpoint: String,
    pub timeout: Duration,
    pub format: Format,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            format: Format::Text,
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            endpoint: args.endpoint.clone(),
            timeout: Duration::from_secs(args.timeout),
            format: args.format,
        }
    }
}

#[cfg(test)]
mod cli_tests {
    use super::{Args, Config};
    use crate::output::Format;

    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["coinz", "100", "BTC", "ETH"]).unwrap();

        assert_eq!(vec!["100", "BTC", "ETH"], args.args);
        assert_eq!(Config::default(), Config::from(&args));
        assert_eq!("coinz=warn", args.log_filter());
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "coinz",
            "--endpoint",
            "http://127.0.0.1:8080/rates",
            "--timeout",
            "3",
            "--format",
            "csv",
            "-v",
            "100",
            "BTC",
            "ETH",
        ])
        .unwrap();

        assert_eq!(
            Config {
                endpoint: "http://127.0.0.1:8080/rates".to_string(),
                timeout: Duration::from_secs(3),
                format: Format::Csv,
            },
            Config::from(&args)
        );
        assert_eq!("coinz=debug", args.log_filter());
    }

    #[test]
    // Argument count is checked later, so that we can print our own usage.
    fn test_any_number_of_positionals() {
        for raw in vec![
            vec!["coinz"],
            vec!["coinz", "100"],
            vec!["coinz", "100", "BTC", "ETH", "SOL"],
        ] {
            let args = Args::try_parse_from(raw.clone()).unwrap();
            assert_eq!(raw.len() - 1, args.args.len());
        }
    }

    #[test]
    // A negative balance is a balance, not a flag.
    fn test_negative_balance_is_positional() {
        let args = Args::try_parse_from(["coinz", "-5", "BTC", "ETH"]).unwrap();
        assert_eq!(vec!["-5", "BTC", "ETH"], args.args);
    }

    #[test]
    fn test_invalid_timeout() {
        for timeout in vec!["0", "-1", "soon"] {
            assert!(Args::try_parse_from(["coinz", "--timeout", timeout, "1", "A", "B"]).is_err());
        }
    }
}
