//! Annotation types shared by the converter and the split builder.
//!
//! Pixel-space boxes come out of the VOC reader as [`BBoxXYXY<Pixel>`] and go
//! into YOLO label files as [`BBoxCxCyWh<Normalized>`]. The marker types keep
//! the two from being mixed up.
//!
//! # Example
//!
//! ```
//! use voc2yolo::ir::{BBoxXYXY, ImageSize, Pixel};
//!
//! let bbox = BBoxXYXY::<Pixel>::from_voc_order(30.0, 90.0, 30.0, 90.0);
//! let norm = bbox.to_normalized_cxcywh(ImageSize::new(300, 300));
//! assert!((norm.cx - 0.2).abs() < 1e-12);
//! ```

mod bbox;
mod class_registry;
pub mod io_voc_xml;
pub mod io_yolo;
mod model;
mod space;

pub use bbox::{normalize, BBoxCxCyWh, BBoxXYXY};
pub use class_registry::{ClassRegistry, DEFAULT_CLASSES};
pub use model::{ImageSize, VocAnnotation, VocObject};
pub use space::{Normalized, Pixel};
