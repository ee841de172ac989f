pub mod config;
pub mod ollama_client;
pub mod story_files;
