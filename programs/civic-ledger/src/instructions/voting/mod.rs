pub mod cast_vote;
pub mod create_voting_event;

pub use cast_vote::*;
pub use create_voting_event::*;
