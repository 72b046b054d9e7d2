//! Rasters, rotation and file I/O.
//!
//! [`ImageRgb8`] is the pipeline's input and output type; [`ImageF32`] holds
//! grayscale in 8-bit units for edge detection. Both, and the binary
//! [`EdgeMap`](crate::edges::EdgeMap), are row-addressable through
//! [`ImageView`].

pub mod f32;
pub mod io;
pub mod rgb;
pub mod rotate;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::rgb::{ImageRgb8, Rgb};
pub use self::rotate::rotate_bicubic;
pub use self::traits::{ImageView, ImageViewMut, Rows};
