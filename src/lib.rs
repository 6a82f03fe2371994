pub mod cli;
pub mod distribution;
pub mod error;
pub mod input;
pub mod output;
pub mod quote;
pub mod run;

pub use error::Error;
