mod error;
pub mod mirror;

pub use error::Error;
