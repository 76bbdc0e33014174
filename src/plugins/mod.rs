pub mod core;
pub mod config;
pub mod input;
pub mod debug_ui;
pub mod marker_sync;
pub mod combat;
pub mod overlay;
