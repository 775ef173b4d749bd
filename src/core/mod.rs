//! Core game module - states, events, data loading and fundamental systems.
//!
//! This module provides the foundation that all other game systems build upon.

mod data;
mod error;
mod events;
mod plugin;
mod states;

pub use data::{load_ron_file, parse_ron, ron_files_in};
pub use error::DataLoadError;
pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
