pub mod config_loader;
pub mod preview;
pub mod snapshot;
