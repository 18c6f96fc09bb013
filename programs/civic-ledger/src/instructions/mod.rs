pub mod lifecycle;
pub mod petition;
pub mod roles;
pub mod templates;
pub mod voting;

pub use lifecycle::*;
pub use petition::*;
pub use roles::*;
pub use templates::*;
pub use voting::*;

use chrono::{DateTime, Utc};

use crate::state::{Actor, LedgerEntry};

/// Who is calling and when. Handlers never read the clock themselves.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub actor: &'a Actor,
    pub now: DateTime<Utc>,
}

impl<'a> Context<'a> {
    pub fn new(actor: &'a Actor, now: DateTime<Utc>) -> Self {
        Self { actor, now }
    }
}

/// A freshly created record together with the ledger entry recording it.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt<T> {
    pub record: T,
    pub ledger_entry: LedgerEntry,
}
