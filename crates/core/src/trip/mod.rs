//! Trip snapshot types and snapshot validation.
//!
//! A [`TripSnapshot`] is the immutable, wholesale view of one trip that the
//! request layer reads in a single consistent query before any calculation.

pub mod error;
pub mod types;
pub mod validation;

pub use error::SnapshotError;
pub use types::{
    Expense, Participant, PaymentStatus, RecordedPayment, ShareType, Split, TripSnapshot,
};
pub use validation::SnapshotValidator;
