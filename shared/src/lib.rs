pub mod attribute;
pub mod core;
pub mod envelope;
pub mod error;
pub mod transform;
