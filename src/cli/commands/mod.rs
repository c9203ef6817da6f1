mod command_result;
pub mod init;
pub mod translate;

pub use command_result::*;
