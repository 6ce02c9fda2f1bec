pub mod cors;
pub mod token;
