pub mod reporting;
pub mod tickets;

pub use reporting::{dashboard, directory};
pub use tickets::{generate_code, lookup, purchase, verify, VerificationOutcome};
