pub mod modification;
pub mod query;
pub mod shaping;
