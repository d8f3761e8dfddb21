//! Hooks for watching a conversion as it happens.
//!
//! The converter and split builder report every decision they make to a
//! [`ConversionObserver`]. The default [`TracingObserver`] turns these into
//! `tracing` events; tests use [`RecordingObserver`] and assert on the events.

use std::path::Path;

use tracing::{debug, info, warn};

use super::report::SplitReport;
use crate::ir::{BBoxXYXY, Pixel};

/// Why an object produced no label line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Class name is not in the registry.
    UnknownClass,
    /// The object is flagged `difficult`.
    Difficult,
}

/// Receives conversion events. Every method defaults to doing nothing.
pub trait ConversionObserver {
    /// An object passed the filters and will be written.
    fn object_retained(&mut self, _image_id: &str, _class_name: &str, _bbox: &BBoxXYXY<Pixel>) {}

    fn object_skipped(&mut self, _image_id: &str, _class_name: &str, _reason: SkipReason) {}

    /// The annotation has no `<size>` node; its label file stays empty.
    fn size_missing(&mut self, _image_id: &str) {}

    fn split_started(&mut self, _split: &str, _manifest_path: &Path) {}

    fn split_finished(&mut self, _report: &SplitReport) {}

    /// Only called when splits are isolated from each other's failures.
    fn split_failed(&mut self, _split: &str, _error: &crate::Voc2YoloError) {}
}

impl<O: ConversionObserver + ?Sized> ConversionObserver for &mut O {
    fn object_retained(&mut self, image_id: &str, class_name: &str, bbox: &BBoxXYXY<Pixel>) {
        (**self).object_retained(image_id, class_name, bbox)
    }

    fn object_skipped(&mut self, image_id: &str, class_name: &str, reason: SkipReason) {
        (**self).object_skipped(image_id, class_name, reason)
    }

    fn size_missing(&mut self, image_id: &str) {
        (**self).size_missing(image_id)
    }

    fn split_started(&mut self, split: &str, manifest_path: &Path) {
        (**self).split_started(split, manifest_path)
    }

    fn split_finished(&mut self, report: &SplitReport) {
        (**self).split_finished(report)
    }

    fn split_failed(&mut self, split: &str, error: &crate::Voc2YoloError) {
        (**self).split_failed(split, error)
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl ConversionObserver for NullObserver {}

/// Emits events through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ConversionObserver for TracingObserver {
    fn object_retained(&mut self, image_id: &str, class_name: &str, bbox: &BBoxXYXY<Pixel>) {
        info!(
            image_id,
            class = class_name,
            xmin = bbox.xmin(),
            xmax = bbox.xmax(),
            ymin = bbox.ymin(),
            ymax = bbox.ymax(),
            "retained object"
        );
    }

    fn object_skipped(&mut self, image_id: &str, class_name: &str, reason: SkipReason) {
        debug!(image_id, class = class_name, ?reason, "skipped object");
    }

    fn size_missing(&mut self, image_id: &str) {
        debug!(image_id, "annotation has no <size>; writing empty label file");
    }

    fn split_started(&mut self, split: &str, manifest_path: &Path) {
        info!(split, manifest = %manifest_path.display(), "building split");
    }

    fn split_finished(&mut self, report: &SplitReport) {
        info!(
            split = %report.split,
            images = report.counts.images,
            labels = report.counts.records,
            "split done"
        );
    }

    fn split_failed(&mut self, split: &str, error: &crate::Voc2YoloError) {
        warn!(split, %error, "split failed; continuing with the next one");
    }
}

/// One recorded event.
#[derive(Clone, Debug, PartialEq)]
pub enum ObservedEvent {
    Retained {
        image_id: String,
        class_name: String,
        bbox: BBoxXYXY<Pixel>,
    },
    Skipped {
        image_id: String,
        class_name: String,
        reason: SkipReason,
    },
    SizeMissing {
        image_id: String,
    },
    SplitStarted {
        split: String,
    },
    SplitFinished {
        split: String,
        images: usize,
    },
    SplitFailed {
        split: String,
        message: String,
    },
}

/// Keeps every event in memory, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<ObservedEvent>,
}

impl RecordingObserver {
    /// Image id and class of every retained object.
    pub fn retained(&self) -> Vec<(&str, &str)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ObservedEvent::Retained {
                    image_id,
                    class_name,
                    ..
                } => Some((image_id.as_str(), class_name.as_str())),
                _ => None,
            })
            .collect()
    }
}

impl ConversionObserver for RecordingObserver {
    fn object_retained(&mut self, image_id: &str, class_name: &str, bbox: &BBoxXYXY<Pixel>) {
        self.events.push(ObservedEvent::Retained {
            image_id: image_id.to_string(),
            class_name: class_name.to_string(),
            bbox: *bbox,
        });
    }

    fn object_skipped(&mut self, image_id: &str, class_name: &str, reason: SkipReason) {
        self.events.push(ObservedEvent::Skipped {
            image_id: image_id.to_string(),
            class_name: class_name.to_string(),
            reason,
        });
    }

    fn size_missing(&mut self, image_id: &str) {
        self.events.push(ObservedEvent::SizeMissing {
            image_id: image_id.to_string(),
        });
    }

    fn split_started(&mut self, split: &str, _manifest_path: &Path) {
        self.events.push(ObservedEvent::SplitStarted {
            split: split.to_string(),
        });
    }

    fn split_finished(&mut self, report: &SplitReport) {
        self.events.push(ObservedEvent::SplitFinished {
            split: report.split.clone(),
            images: report.counts.images,
        });
    }

    fn split_failed(&mut self, split: &str, error: &crate::Voc2YoloError) {
        self.events.push(ObservedEvent::SplitFailed {
            split: split.to_string(),
            message: error.to_string(),
        });
    }
}
