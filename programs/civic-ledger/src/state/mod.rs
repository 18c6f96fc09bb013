pub mod actor;
pub mod event;
pub mod ledger_entry;
pub mod participation;
pub mod petition;
pub mod template;
pub mod voting_event;

pub use actor::*;
pub use event::*;
pub use ledger_entry::*;
pub use participation::*;
pub use petition::*;
pub use template::*;
pub use voting_event::*;
