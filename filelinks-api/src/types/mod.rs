//! API Request and Response Types

mod file_link;
pub use file_link::*;

mod links;
pub use links::*;
