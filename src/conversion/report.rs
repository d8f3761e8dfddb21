//! Conversion report types.
//!
//! Counts are collected per label file, folded per split, and then per run so
//! the CLI can show what happened without re-reading the outputs.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Voc2YoloError;

/// What converting one annotation produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabelFileSummary {
    pub image_id: String,
    pub label_path: PathBuf,
    /// False when the annotation had no `<size>` node.
    pub size_present: bool,
    pub records_written: usize,
    pub skipped_unknown_class: usize,
    pub skipped_difficult: usize,
}

impl LabelFileSummary {
    pub fn new(image_id: impl Into<String>, label_path: PathBuf) -> Self {
        Self {
            image_id: image_id.into(),
            label_path,
            size_present: false,
            records_written: 0,
            skipped_unknown_class: 0,
            skipped_difficult: 0,
        }
    }
}

/// Aggregated label counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub images: usize,
    pub images_without_size: usize,
    pub records: usize,
    pub skipped_unknown_class: usize,
    pub skipped_difficult: usize,
}

impl LabelCounts {
    pub fn add(&mut self, summary: &LabelFileSummary) {
        self.images += 1;
        if !summary.size_present {
            self.images_without_size += 1;
        }
        self.records += summary.records_written;
        self.skipped_unknown_class += summary.skipped_unknown_class;
        self.skipped_difficult += summary.skipped_difficult;
    }

    pub fn merge(&mut self, other: &LabelCounts) {
        self.images += other.images;
        self.images_without_size += other.images_without_size;
        self.records += other.records;
        self.skipped_unknown_class += other.skipped_unknown_class;
        self.skipped_difficult += other.skipped_difficult;
    }
}

/// Result of building one split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    pub split: String,
    pub manifest_path: PathBuf,
    pub counts: LabelCounts,
}

impl SplitReport {
    pub fn new(split: impl Into<String>, manifest_path: PathBuf) -> Self {
        Self {
            split: split.into(),
            manifest_path,
            counts: LabelCounts::default(),
        }
    }
}

/// A split that failed while other splits kept running.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitFailure {
    pub split: String,
    pub message: String,
}

/// Result of a full run over all splits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub splits: Vec<SplitReport>,
    pub failures: Vec<SplitFailure>,
}

impl RunReport {
    pub fn totals(&self) -> LabelCounts {
        let mut totals = LabelCounts::default();
        for split in &self.splits {
            totals.merge(&split.counts);
        }
        totals
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turns recorded split failures into [`Voc2YoloError::SplitsFailed`].
    pub fn into_result(self) -> Result<RunReport, Voc2YoloError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Voc2YoloError::SplitsFailed {
                failed: self.failures.into_iter().map(|f| f.split).collect(),
            })
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for split in &self.splits {
            writeln!(
                f,
                "  {}: {} images, {} labels -> {}",
                split.split,
                split.counts.images,
                split.counts.records,
                split.manifest_path.display()
            )?;
        }

        let totals = self.totals();
        writeln!(
            f,
            "  total: {} images, {} labels",
            totals.images, totals.records
        )?;

        let skipped = totals.skipped_unknown_class + totals.skipped_difficult;
        if skipped > 0 || totals.images_without_size > 0 {
            writeln!(f)?;
            writeln!(f, "Notes:")?;
            if totals.skipped_unknown_class > 0 {
                writeln!(
                    f,
                    "  - {} object(s) skipped: class not in registry",
                    totals.skipped_unknown_class
                )?;
            }
            if totals.skipped_difficult > 0 {
                writeln!(
                    f,
                    "  - {} object(s) skipped: marked difficult",
                    totals.skipped_difficult
                )?;
            }
            if totals.images_without_size > 0 {
                writeln!(
                    f,
                    "  - {} image(s) without <size>: empty label files written",
                    totals.images_without_size
                )?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failed splits ({}):", self.failures.len())?;
            for failure in &self.failures {
                writeln!(f, "  - {}: {}", failure.split, failure.message)?;
            }
        }

        Ok(())
    }
}
