// copechat - Conversational mental-health support assistant
// Library exports

pub mod assistant; // Per-message pipeline
pub mod cli;
pub mod config;
pub mod crisis;
pub mod data; // Static reference data
pub mod errors;
pub mod matching;
pub mod prompt;
pub mod providers; // Chat-completion API
pub mod reply;
pub mod resources;
pub mod server; // HTTP service mode
