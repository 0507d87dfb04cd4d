//! # Style Module
//!
//! Style descriptors handed to the inference adapter and the cache that loads
//! them from an image folder.

pub mod cache;
pub mod descriptor;

pub use cache::{DEFAULT_STYLE_FOLDER, DEFAULT_STYLE_SIZE, StyleImage, StyleImageCache};
pub use descriptor::{OwnedStyle, StyleDescriptor, StyleSource};
