//! Split manifests.
//!
//! For every split, the builder reads the split's identifier list, writes one
//! image path per identifier to the split manifest and converts that image's
//! annotation. Order is preserved end to end: manifest line `n` belongs to the
//! `n`-th identifier of the source list.

use std::fs::{self, File};
use std::io::{BufWriter, Write};

use crate::config::{ConvertConfig, DatasetLayout};
use crate::conversion::{AnnotationConverter, ConversionObserver, RunReport, SplitFailure, SplitReport};
use crate::error::Voc2YoloError;
use crate::ir::ClassRegistry;

/// How a failing split affects the ones after it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitFailurePolicy {
    /// Stop at the first failing split. Outputs of earlier splits stay on disk.
    #[default]
    Abort,
    /// Record the failure and carry on with the remaining splits.
    Isolate,
}

/// Identifiers in a split source, in order.
///
/// Identifiers are separated by any whitespace, so both one-per-line and
/// space-separated lists work.
pub fn image_ids(contents: &str) -> impl Iterator<Item = &str> {
    contents.split_whitespace()
}

/// Builds split manifests and drives the annotation converter.
pub struct SplitManifestBuilder<'a, O> {
    converter: AnnotationConverter<'a, O>,
}

impl<'a, O: ConversionObserver> SplitManifestBuilder<'a, O> {
    pub fn new(converter: AnnotationConverter<'a, O>) -> Self {
        Self { converter }
    }

    pub fn with_observer(layout: &'a DatasetLayout, classes: &'a ClassRegistry, observer: O) -> Self {
        Self::new(AnnotationConverter::with_observer(layout, classes, observer))
    }

    pub fn converter(&self) -> &AnnotationConverter<'a, O> {
        &self.converter
    }

    pub fn into_observer(self) -> O {
        self.converter.into_observer()
    }

    /// Writes the manifest of `split` and converts every image in it.
    ///
    /// The split source list must exist. The first conversion error aborts the
    /// split; manifest lines and label files written before it remain.
    pub fn build_split(&mut self, split: &str) -> Result<SplitReport, Voc2YoloError> {
        let layout = self.converter.layout();

        let labels_dir = layout.labels_dir();
        fs::create_dir_all(&labels_dir).map_err(Voc2YoloError::io(&labels_dir))?;

        let source_path = layout.image_set_path(split);
        let contents = fs::read_to_string(&source_path).map_err(Voc2YoloError::io(&source_path))?;

        let manifest_path = layout.manifest_path(split);
        let file = File::create(&manifest_path).map_err(Voc2YoloError::io(&manifest_path))?;
        let mut manifest = BufWriter::new(file);

        self.converter
            .observer_mut()
            .split_started(split, &manifest_path);
        let mut report = SplitReport::new(split, manifest_path.clone());

        for image_id in image_ids(&contents) {
            writeln!(manifest, "{}", layout.image_path(image_id).to_string_lossy())
                .map_err(Voc2YoloError::io(&manifest_path))?;
            let summary = self.converter.convert_annotation(image_id)?;
            report.counts.add(&summary);
        }

        manifest.flush().map_err(Voc2YoloError::io(&manifest_path))?;

        self.converter.observer_mut().split_finished(&report);
        Ok(report)
    }

    /// Builds every split in order.
    ///
    /// With [`SplitFailurePolicy::Abort`] the first error is returned as-is.
    /// With [`SplitFailurePolicy::Isolate`] failures are collected in the
    /// report; use [`RunReport::into_result`] to turn them into an error.
    pub fn build_all<S: AsRef<str>>(
        &mut self,
        splits: &[S],
        policy: SplitFailurePolicy,
    ) -> Result<RunReport, Voc2YoloError> {
        let mut run = RunReport::default();

        for split in splits {
            let split = split.as_ref();
            match self.build_split(split) {
                Ok(report) => run.splits.push(report),
                Err(err) => match policy {
                    SplitFailurePolicy::Abort => return Err(err),
                    SplitFailurePolicy::Isolate => {
                        self.converter.observer_mut().split_failed(split, &err);
                        run.failures.push(SplitFailure {
                            split: split.to_string(),
                            message: err.to_string(),
                        });
                    }
                },
            }
        }

        Ok(run)
    }
}

/// Runs every configured split of `config`, reporting to `observer`.
pub fn convert_dataset<O: ConversionObserver>(
    config: &ConvertConfig,
    policy: SplitFailurePolicy,
    observer: O,
) -> Result<RunReport, Voc2YoloError> {
    let mut builder = SplitManifestBuilder::with_observer(&config.layout, &config.classes, observer);
    builder.build_all(&config.splits, policy)
}
