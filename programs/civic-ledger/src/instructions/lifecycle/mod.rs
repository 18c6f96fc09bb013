pub mod change_status;
pub mod delete_event;
pub mod finalize_event;

pub use change_status::*;
pub use delete_event::*;
pub use finalize_event::*;
