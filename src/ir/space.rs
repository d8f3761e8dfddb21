//! Coordinate space markers.
//!
//! Boxes carry one of these as a type parameter so a pixel-space box can never
//! be written out as if it were already normalized.

/// Absolute pixel positions, origin at the top-left corner of the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pixel;

/// Positions expressed as fractions of the image width/height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Normalized;
