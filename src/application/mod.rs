//! Application layer: command handlers orchestrating domain logic over ports.

pub mod handlers;
