pub mod compose;
pub mod quirks;
pub mod types;
