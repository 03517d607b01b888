/// State management module
///
/// This module handles all application state, including:
/// - The compression workflow state machine (panel.rs)
/// - Shared data structures (data.rs)
/// - Compression settings loaded from disk (settings.rs)

pub mod data;
pub mod panel;
pub mod settings;
