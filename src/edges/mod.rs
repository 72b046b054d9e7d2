//! Edge extraction for line finding and contrast search.
//!
//! - Sobel gradients with replicated borders.
//! - Direction-aligned non-maximum suppression that keeps one pixel per step.
//! - Canny hysteresis producing a binary [`EdgeMap`].

pub mod canny;
pub mod grad;
pub mod nms;

pub use canny::{canny, CannyParams, EdgeMap};
pub use grad::{sobel_gradients, Grad};
pub use nms::suppress_non_maxima;
