// Quillshell Models
// Data structures for the client shell

mod document;
mod search;
mod theme;

pub use document::*;
pub use search::*;
pub use theme::*;
