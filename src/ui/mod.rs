//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw` - Frame layout and panels
//! - `theme.rs` - Color themes and presets
//! - `layout.rs` - List paging
//! - `entry_row.rs` - Pool row widget

mod draw;
pub mod entry_row;
pub mod layout;
pub mod theme;

// Re-export main draw function
pub use draw::draw;

pub use theme::Theme;
