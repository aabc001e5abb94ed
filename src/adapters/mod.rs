//! Adapters: concrete implementations of the ports.

pub mod email;
pub mod http;
pub mod postgres;
pub mod storage;
