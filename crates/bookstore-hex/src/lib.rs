//! bookstore-hex: bookstore service bootstrap (config + wiring + inbound HTTP)

pub mod bootstrap;
pub mod config;
pub mod errors;

pub mod inbound; // HTTP adapter (router assembly + handlers)
