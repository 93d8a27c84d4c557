pub mod geo;
pub mod snapshot;
pub mod source;
