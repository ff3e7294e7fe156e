pub mod normalize;
pub mod tables;
pub mod version;
