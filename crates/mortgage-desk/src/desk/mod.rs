//! Service facade and HTTP routes shared by the CLI and the API server.

pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use router::desk_router;
pub use service::{ClientSubmission, DeskError, DeskService, Quote, QuoteInput};
