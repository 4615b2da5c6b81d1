//! Circular tournament bracket renderer.
//!
//! A bracket document renders as concentric rings of annular wedges: the
//! outermost ring holds the full field, each ring inward halves the slot
//! count, and the center disc carries the champion. Team placement follows
//! fixed seed tables so a team advances along a straight radial path.

pub mod geometry;
pub mod hittest;
pub mod images;
pub mod renderer;
pub mod seeds;
pub mod surface;

pub use renderer::{Bracket, Settings};
pub use surface::{DrawSurface, SkiaSurface};
