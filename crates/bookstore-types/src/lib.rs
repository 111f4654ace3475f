//! bookstore-types: shared domain (connection lifecycle) and ports

pub mod domain;
pub mod ports;
