pub mod angle;
pub mod error;
