// The game without a terminal: the binary, the integration tests and any other
// front end drive it through these modules. Rendering and key mapping stay in main.rs.
pub mod announcer;
pub mod app_dirs;
pub mod config;
pub mod content;
pub mod engine;
pub mod glitch;
pub mod logging;
pub mod queue;
pub mod runtime;
pub mod session;
pub mod typing_policy;
