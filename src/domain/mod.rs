//! Domain layer: entities and pure business logic.
//!
//! Nothing in this module performs I/O. Persistence and transport concerns
//! live in `adapters`, behind the interfaces declared in `ports`.

pub mod audit;
pub mod company;
pub mod documents;
pub mod invoice;
pub mod money;
pub mod order;
pub mod payment;
pub mod webhook;
