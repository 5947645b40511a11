#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod random;
pub mod reward;
pub mod scoring;
pub mod time;

pub use error::Error;
pub use random::RandomSource;
pub use time::Clock;
