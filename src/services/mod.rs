// Quillshell Services
// Controllers and the seams they depend on

mod events;
mod preference_store;
mod search_controller;
mod search_index;
mod theme_controller;
mod viewport;

pub use events::*;
pub use preference_store::*;
pub use search_controller::*;
pub use search_index::*;
pub use theme_controller::*;
pub use viewport::*;
