//! Core scoring rules. Keep this crate free of IO and platform concerns.

pub mod events;
pub mod ledger;
pub mod reconcile;
pub mod settle;
pub mod winner;

pub use events::*;
pub use ledger::*;
pub use reconcile::*;
pub use settle::*;
pub use winner::*;
