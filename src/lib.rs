pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod image_input;
pub mod input;
pub mod logging;
pub mod relay;
pub mod report;
pub mod session;
