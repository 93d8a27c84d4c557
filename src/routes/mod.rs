pub mod health;
pub mod sources;
pub mod track;
