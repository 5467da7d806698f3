//! HTTP handlers for the module catalogue, module records and chat.

pub mod chat;
pub mod modules;
pub mod records;
pub use chat::*;
pub use modules::*;
pub use records::*;
