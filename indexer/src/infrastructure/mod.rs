pub mod chain;
pub mod persistence;
