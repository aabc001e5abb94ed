//! Fixed-layout paginated document generation.
//!
//! Both renderers are pure functions of order, invoice, and issuer data:
//! re-invoking them for a manual regeneration has no side effects beyond
//! returning fresh bytes. Layout is character-based with a fixed page size,
//! so output is byte-exact across renderers and platforms.

mod contract_doc;
mod invoice_doc;
pub mod layout;

pub use contract_doc::render_contract;
pub use invoice_doc::render_invoice;
