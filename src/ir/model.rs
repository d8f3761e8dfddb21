//! Parsed annotation model.
//!
//! These types hold what the VOC reader extracts from one XML file before any
//! class filtering or normalization happens.

use super::bbox::BBoxXYXY;
use super::space::Pixel;

/// Image dimensions from the `<size>` node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are non-zero.
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One annotation file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VocAnnotation {
    /// `None` when the XML has no `<size>` node; such images produce no labels.
    pub size: Option<ImageSize>,

    /// Objects in document order.
    pub objects: Vec<VocObject>,
}

/// One `<object>` entry.
///
/// `bndbox` is only read for objects that pass the class/difficult filter, so
/// it is `None` for filtered objects even when the XML carries a box.
#[derive(Clone, Debug, PartialEq)]
pub struct VocObject {
    /// Raw `<name>` text, untrimmed.
    pub name: String,
    /// `None` for unregistered classes, whose flag is never parsed.
    pub difficult: Option<i64>,
    pub bndbox: Option<BBoxXYXY<Pixel>>,
}

impl VocObject {
    /// The VOC "difficult" flag is set.
    pub fn is_difficult(&self) -> bool {
        self.difficult == Some(1)
    }
}
