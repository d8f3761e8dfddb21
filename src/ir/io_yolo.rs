//! YOLO label and `data.yaml` writers.
//!
//! A label file holds one `class_id cx cy w h` line per object, with box values
//! relative to the image size.

use std::fs;
use std::path::Path;

use super::{BBoxCxCyWh, ClassRegistry, Normalized};
use crate::error::Voc2YoloError;

/// One line of a YOLO label file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelRecord {
    pub class_id: usize,
    pub bbox: BBoxCxCyWh<Normalized>,
}

impl LabelRecord {
    pub fn new(class_id: usize, bbox: BBoxCxCyWh<Normalized>) -> Self {
        Self { class_id, bbox }
    }

    /// Renders the record without a trailing newline.
    ///
    /// Floats use the shortest representation that round-trips and always keep
    /// a fractional part (`0.2`, `1.0`). Values below `1e-4` or from `1e16` up
    /// use a signed, two-digit exponent (`5e-06`, `1e+16`).
    pub fn to_line(&self) -> String {
        let (cx, cy, w, h) = self.bbox.to_tuple();
        format!(
            "{} {} {} {} {}",
            self.class_id,
            format_float(cx),
            format_float(cy),
            format_float(w),
            format_float(h)
        )
    }
}

fn format_float(value: f64) -> String {
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Renders a whole label file, one newline-terminated line per record.
pub fn to_label_string(records: &[LabelRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_line());
        out.push('\n');
    }
    out
}

/// Writes (truncating) a label file. An empty slice produces an empty file.
pub fn write_label_file(path: &Path, records: &[LabelRecord]) -> Result<(), Voc2YoloError> {
    fs::write(path, to_label_string(records)).map_err(Voc2YoloError::io(path))
}

/// Writes an Ultralytics-style `data.yaml`.
///
/// `splits` pairs each split name with the manifest file listing its images.
pub fn write_data_yaml(
    path: &Path,
    dataset_root: &Path,
    splits: &[(String, std::path::PathBuf)],
    classes: &ClassRegistry,
) -> Result<(), Voc2YoloError> {
    let mut yaml = format!("path: {}\n", yaml_single_quoted(&dataset_root.to_string_lossy()));
    for (split, manifest) in splits {
        let manifest = manifest.strip_prefix(dataset_root).unwrap_or(manifest);
        yaml.push_str(&format!(
            "{}: {}\n",
            split,
            yaml_single_quoted(&manifest.to_string_lossy().replace('\\', "/"))
        ));
    }
    yaml.push_str(&format!("nc: {}\nnames:\n", classes.len()));
    for (idx, name) in classes.names().iter().enumerate() {
        yaml.push_str(&format!("  {}: {}\n", idx, yaml_single_quoted(name)));
    }

    fs::write(path, yaml).map_err(Voc2YoloError::io(path))
}

fn yaml_single_quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_line_uses_shortest_float_repr() {
        let record = LabelRecord::new(4, BBoxCxCyWh::new(0.2, 0.2, 0.2, 0.2));
        assert_eq!(record.to_line(), "4 0.2 0.2 0.2 0.2");
    }

    #[test]
    fn to_line_keeps_fraction_for_whole_numbers() {
        let record = LabelRecord::new(0, BBoxCxCyWh::new(0.5, 0.5, 1.0, 1.0));
        assert_eq!(record.to_line(), "0 0.5 0.5 1.0 1.0");
    }

    #[test]
    fn tiny_and_huge_values_use_two_digit_exponents() {
        let record = LabelRecord::new(4, BBoxCxCyWh::new(5e-6, 0.5, 1e-5, 1.0));
        assert_eq!(record.to_line(), "4 5e-06 0.5 1e-05 1.0");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(2.5e-300), "2.5e-300");
    }

    #[test]
    fn empty_records_render_empty_file() {
        assert_eq!(to_label_string(&[]), "");
    }

    #[test]
    fn label_string_is_newline_terminated_in_order() {
        let records = [
            LabelRecord::new(1, BBoxCxCyWh::new(0.1, 0.2, 0.3, 0.4)),
            LabelRecord::new(0, BBoxCxCyWh::new(0.5, 0.5, 0.25, 0.25)),
        ];
        assert_eq!(
            to_label_string(&records),
            "1 0.1 0.2 0.3 0.4\n0 0.5 0.5 0.25 0.25\n"
        );
    }

    #[test]
    fn write_data_yaml_lists_splits_and_names() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let splits = vec![
            ("train".to_string(), temp.path().join("train.txt")),
            ("val".to_string(), temp.path().join("val.txt")),
        ];
        let classes = ClassRegistry::new(["cat", "o'dog"]).expect("registry");
        let yaml_path = temp.path().join("data.yaml");

        write_data_yaml(&yaml_path, temp.path(), &splits, &classes).expect("write data.yaml");

        let yaml = fs::read_to_string(&yaml_path).expect("read data.yaml");
        assert!(yaml.contains("train: 'train.txt'\n"));
        assert!(yaml.contains("val: 'val.txt'\n"));
        assert!(yaml.contains("nc: 2\n"));
        assert!(yaml.contains("  0: 'cat'\n"));
        assert!(yaml.contains("  1: 'o''dog'\n"));
    }
}
