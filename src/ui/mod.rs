//! # UI Module
//!
//! This module provides the terminal user interface for Vitae.
//!
//! ## Components
//!
//! - [`App`] - Application state machine (phase, selection, filter, spinner)
//! - [`mod@render`] - Rendering functions for drawing the TUI
//! - [`mod@theme`] - Color themes
//!
//! ## Views
//!
//! One view per phase, plus a terminal "quitting" view:
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    Header                        │
//! ├─────────────────────────────────────────────────┤
//! │  Listing: filterable variant list               │
//! │  Building: spinner + variant name               │
//! │  Completed: success panel or failure log        │
//! ├─────────────────────────────────────────────────┤
//! │                 Footer (key hints)               │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod render;
pub mod theme;

pub use app::{App, Phase, TaskMsg};
pub use render::render;
