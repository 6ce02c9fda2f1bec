pub mod flow;
pub mod producer;
pub mod sample;

pub use producer::{Producer, Producers, SharedProducer};
