// Quillshell - Client Shell Core
// Interactive state for the static blog front end: theme preference,
// search overlay, and the responsive presentation policy they share.

pub mod models;
pub mod services;
