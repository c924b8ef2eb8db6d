pub mod availability;
pub mod normalize;
