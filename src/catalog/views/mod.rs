//! # Views Module
//!
//! Rendering of controller state for the shell.

pub mod text_renderer;

pub use text_renderer::TextRenderer;
