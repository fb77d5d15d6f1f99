pub mod cityjson;
pub mod convert;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod source;
pub mod topology;

pub use error::{CityliftError, Result};
