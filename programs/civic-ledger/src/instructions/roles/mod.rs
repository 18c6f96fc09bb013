pub mod manage_roles;

pub use manage_roles::*;
