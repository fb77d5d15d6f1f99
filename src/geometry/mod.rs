pub mod footprint;
pub mod ring;

pub use footprint::Footprint;
pub use ring::{Orientation, Ring};
