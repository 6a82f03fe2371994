use crate::{distribution, input, output, quote};

use thiserror::Error;

/// Anything that can go wrong during a run.
///
/// Every stage keeps its own error type, with the offending value. They are
/// propagated as they are, and only reported by `main`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] input::Error),

    #[error(transparent)]
    Quote(#[from] quote::Error),

    #[error(transparent)]
    Distribution(#[from] distribution::Error),

    #[error(transparent)]
    Output(#[from] output::Error),
}

impl Error {
    /// Whether the user should be shown how to call the program.
    pub fn needs_usage(&self) -> bool {
        matches!(self, Self::Input(input::Error::ArgumentCount { .. }))
    }
}

#[test]
fn test_needs_usage() {
    assert!(Error::from(input::Error::ArgumentCount { got: 2 }).needs_usage());
    assert!(!Error::from(input::Error::SubpennyPrecision {
        value: "10.005".to_string()
    })
    .needs_usage());
    assert!(!Error::from(quote::Error::MissingRates).needs_usage());
}

#[test]
// Wrapping doesn't change the message.
fn test_error_message_is_transparent() {
    let err = Error::from(distribution::Error::SymbolNotFound {
        symbol: "XYZ".to_string(),
    });
    assert_eq!("unable to find rate for symbol \"XYZ\"", err.to_string());
}
