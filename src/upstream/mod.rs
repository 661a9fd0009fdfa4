//! Access to the OFD-Ya fiscal data API.
//!
//! [`OfdClient`] wraps the three endpoints used here: register listing,
//! document listing and cheque link lookup. The pure reshaping steps,
//! [`flatten_registers`] and [`normalize_document`], are exported separately.

mod client;
mod documents;
mod links;
mod registers;
pub mod schema;

// Re-export public API
pub use client::OfdClient;
pub use documents::normalize_document;
pub use registers::flatten_registers;
