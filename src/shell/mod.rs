//! Line-oriented presentation shell over a [`crate::session::QuerySession`]

pub mod command;
pub mod repl;

pub use command::{open_query, ShellCommand};
pub use repl::InteractiveRepl;
