pub mod config;
pub mod discover;
pub mod display;
pub mod errors;
pub mod parse;
pub mod sampler;
pub mod session;
pub mod stats;
pub mod types;
