pub mod codec;
pub mod error;
pub mod map_operation;
