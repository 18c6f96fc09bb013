pub mod io;
pub mod parsers;
pub mod send_utils;

pub use io::*;
pub use parsers::*;
pub use send_utils::*;
