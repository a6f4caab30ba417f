pub mod cursor;
pub mod text_log;

pub use cursor::*;
pub use text_log::*;
