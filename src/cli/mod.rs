// CLI module
// Public interface for command-line interface

mod commands;
mod conversation;
mod input;
mod repl;

pub use commands::{format_resources, help_text, Command};
pub use conversation::Conversation;
pub use input::InputHandler;
pub use repl::Repl;
