pub mod create_petition;
pub mod sign_petition;

pub use create_petition::*;
pub use sign_petition::*;
