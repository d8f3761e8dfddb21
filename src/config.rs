//! Dataset layout and run configuration.
//!
//! Defaults follow the usual VOC-derived layout:
//!
//! ```text
//! <root>/Annotations/<id>.xml   source annotations
//! <root>/ImageSets/<split>.txt  identifiers per split
//! <root>/images/<id>.jpg        images (only referenced, never read)
//! <root>/labels/<id>.txt        generated YOLO labels
//! <root>/<split>.txt            generated image manifests
//! ```
//!
//! A YAML file can override any of these, and CLI flags override the file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Voc2YoloError;
use crate::ir::ClassRegistry;

/// Split names used when none are configured.
pub const DEFAULT_SPLITS: [&str; 3] = ["train", "test", "val"];

/// Where every input and output of a dataset lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetLayout {
    pub root: PathBuf,
    /// Subdirectories below are relative to `root`.
    pub annotations_dir: PathBuf,
    pub image_sets_dir: PathBuf,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
    /// Extension (without dot) used when writing image paths to manifests.
    pub image_extension: String,
}

impl DatasetLayout {
    /// Layout with the default subdirectory names under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            annotations_dir: PathBuf::from("Annotations"),
            image_sets_dir: PathBuf::from("ImageSets"),
            images_dir: PathBuf::from("images"),
            labels_dir: PathBuf::from("labels"),
            image_extension: "jpg".to_string(),
        }
    }

    pub fn annotation_path(&self, image_id: &str) -> PathBuf {
        self.root
            .join(&self.annotations_dir)
            .join(format!("{image_id}.xml"))
    }

    pub fn labels_dir(&self) -> PathBuf {
        self.root.join(&self.labels_dir)
    }

    pub fn label_path(&self, image_id: &str) -> PathBuf {
        self.labels_dir().join(format!("{image_id}.txt"))
    }

    pub fn image_path(&self, image_id: &str) -> PathBuf {
        self.root
            .join(&self.images_dir)
            .join(format!("{image_id}.{}", self.image_extension))
    }

    pub fn image_set_path(&self, split: &str) -> PathBuf {
        self.root
            .join(&self.image_sets_dir)
            .join(format!("{split}.txt"))
    }

    pub fn manifest_path(&self, split: &str) -> PathBuf {
        self.root.join(format!("{split}.txt"))
    }

    pub fn data_yaml_path(&self) -> PathBuf {
        self.root.join("data.yaml")
    }
}

/// Everything a conversion run needs.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    pub layout: DatasetLayout,
    pub classes: ClassRegistry,
    pub splits: Vec<String>,
}

impl ConvertConfig {
    /// Builds a config, rejecting empty, blank or duplicate split names.
    pub fn new(
        layout: DatasetLayout,
        classes: ClassRegistry,
        splits: Vec<String>,
    ) -> Result<Self, Voc2YoloError> {
        if splits.is_empty() {
            return Err(Voc2YoloError::InvalidConfig(
                "at least one split is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for split in &splits {
            if split.trim().is_empty() || split.contains(['/', '\\']) {
                return Err(Voc2YoloError::InvalidConfig(format!(
                    "invalid split name '{split}'"
                )));
            }
            if !seen.insert(split.as_str()) {
                return Err(Voc2YoloError::InvalidConfig(format!(
                    "duplicate split name '{split}'"
                )));
            }
        }

        Ok(Self {
            layout,
            classes,
            splits,
        })
    }

    /// Default classes and splits for a dataset rooted at `root`.
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: DatasetLayout::new(root),
            classes: ClassRegistry::default(),
            splits: DEFAULT_SPLITS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Optional settings read from a YAML config file.
///
/// ```yaml
/// root: /data/PCB_dataset/data
/// image_extension: png
/// classes: [missing_hole, mouse_bite, open_circuit, short, spur, spurious_copper]
/// splits: [train, val]
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub root: Option<PathBuf>,
    pub annotations_dir: Option<PathBuf>,
    pub image_sets_dir: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
    pub labels_dir: Option<PathBuf>,
    pub image_extension: Option<String>,
    pub classes: Option<ClassRegistry>,
    pub splits: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, Voc2YoloError> {
        let data = fs::read_to_string(path).map_err(Voc2YoloError::io(path))?;
        serde_yaml::from_str(&data).map_err(|source| Voc2YoloError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies the file's overrides to a layout rooted at `root`.
    pub fn layout_for(&self, root: PathBuf) -> DatasetLayout {
        let mut layout = DatasetLayout::new(root);
        if let Some(dir) = &self.annotations_dir {
            layout.annotations_dir = dir.clone();
        }
        if let Some(dir) = &self.image_sets_dir {
            layout.image_sets_dir = dir.clone();
        }
        if let Some(dir) = &self.images_dir {
            layout.images_dir = dir.clone();
        }
        if let Some(dir) = &self.labels_dir {
            layout.labels_dir = dir.clone();
        }
        if let Some(ext) = &self.image_extension {
            layout.image_extension = ext.trim_start_matches('.').to_string();
        }
        layout
    }
}
