// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Visualization tools for sentinel output.

/// Color definitions and palettes.
pub mod color;
/// Overlay element selection.
pub mod overlay;

#[cfg(feature = "visualize")]
pub mod viewer;

pub use color::Color;
pub use overlay::Overlay;

#[cfg(feature = "visualize")]
pub use viewer::Viewer;
