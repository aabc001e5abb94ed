//! amcdesk - Annual maintenance contract service backend.
//!
//! This crate implements the payment-event reconciliation and document
//! issuance pipeline: webhook verification, exactly-once subscription
//! activation, and invoice/contract generation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
