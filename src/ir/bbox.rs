//! Bounding box types and the pixel-to-YOLO normalization.

use std::marker::PhantomData;

use super::model::ImageSize;
use super::{Normalized, Pixel};

/// An axis-aligned bounding box in corner form.
///
/// The constructor does not enforce `min <= max`; callers decide what to do
/// with inverted boxes (see [`BBoxXYXY::is_ordered`]).
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    /// Creates a box from explicit corners.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            _space: PhantomData,
        }
    }

    /// Creates a box from corners in VOC `<bndbox>` reading order.
    #[inline]
    pub fn from_voc_order(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self::from_xyxy(xmin, ymin, xmax, ymax)
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    /// May be negative if the box is inverted.
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// May be negative if the box is inverted.
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Returns true if all corners are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        [self.xmin, self.ymin, self.xmax, self.ymax]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Returns true if `xmin <= xmax` and `ymin <= ymax`.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.xmin)
            .field("ymin", &self.ymin)
            .field("xmax", &self.xmax)
            .field("ymax", &self.ymax)
            .finish()
    }
}

impl BBoxXYXY<Pixel> {
    /// Converts to the YOLO center/size form relative to `size`.
    pub fn to_normalized_cxcywh(&self, size: ImageSize) -> BBoxCxCyWh<Normalized> {
        let (x, y, w, h) = normalize(
            size.width,
            size.height,
            self.xmin,
            self.xmax,
            self.ymin,
            self.ymax,
        );
        BBoxCxCyWh::new(x, y, w, h)
    }
}

/// A box in center/size form, the shape YOLO label lines use.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxCxCyWh<TSpace> {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxCxCyWh<TSpace> {
    #[inline]
    pub fn new(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            cx,
            cy,
            w,
            h,
            _space: PhantomData,
        }
    }

    /// Returns `(cx, cy, w, h)`.
    #[inline]
    pub fn to_tuple(&self) -> (f64, f64, f64, f64) {
        (self.cx, self.cy, self.w, self.h)
    }
}

impl<TSpace> std::fmt::Debug for BBoxCxCyWh<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxCxCyWh")
            .field("cx", &self.cx)
            .field("cy", &self.cy)
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

/// Normalizes a pixel box to image-relative `(x_center, y_center, width, height)`.
///
/// `width` and `height` must be positive; callers reject zero sizes before
/// getting here.
pub fn normalize(
    width: u32,
    height: u32,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
) -> (f64, f64, f64, f64) {
    let width = f64::from(width);
    let height = f64::from(height);

    let x_center = (xmin + xmax) / 2.0;
    let y_center = (ymin + ymax) / 2.0;
    let box_w = xmax - xmin;
    let box_h = ymax - ymin;

    (
        x_center / width,
        y_center / height,
        box_w / width,
        box_h / height,
    )
}
