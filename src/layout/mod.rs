//! Deterministic layout/compositing engine.
//!
//! Everything in here is pure and synchronous: no I/O, no shared
//! mutable state beyond the font cache, safe to call concurrently
//! across requests.

pub mod background;
pub mod compose;
pub mod fonts;
pub mod text;

pub use compose::{compose, PosterFormat};
