//! Screen-space types shared by the viewport manager, input trackers and the
//! parameter panel.
//!
//! Canonical space:
//! - logical pixels (DPI-independent)
//! - origin top-left, +X right, +Y down

mod rect;
mod viewport;

pub use rect::Rect;
pub use viewport::Viewport;
