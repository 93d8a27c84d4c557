pub mod geo;
pub mod location;
pub mod parse;
pub mod recorder;
pub mod session;
