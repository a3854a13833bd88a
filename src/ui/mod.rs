//! Terminal UI module using ratatui.
//!
//! - `render`: frame rendering and layout for the login and home views
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod input;
pub mod render;
pub mod styles;
