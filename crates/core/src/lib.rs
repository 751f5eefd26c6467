#![forbid(unsafe_code)]

pub mod dataset;
pub mod format;
pub mod model;
pub mod time;

pub use time::Clock;
