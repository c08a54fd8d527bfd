//! Image composition: adaptive text layout, contrast-aware colors, and
//! watermark placement.
//!
//! The module is split into:
//! - **Layout**: pure functions for scheme selection, wrap, and geometry
//!   (unit testable without assets)
//! - **Render**: [`Composer`] — font/watermark loading and pixel work

pub mod layout;
pub mod render;

pub use layout::{Scheme, watermark_layout, wrap_greedy};
pub use render::{AssetComposer, ComposeError, Composer, mean_luminance};
