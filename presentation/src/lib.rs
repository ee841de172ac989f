pub mod cli;
pub mod clipboard;
pub mod prompt_editor;
pub mod render;
