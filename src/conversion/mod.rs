//! Annotation conversion: one VOC XML file in, one YOLO label file out.

pub mod observer;
pub mod report;

pub use observer::{
    ConversionObserver, NullObserver, ObservedEvent, RecordingObserver, SkipReason,
    TracingObserver,
};
pub use report::{LabelCounts, LabelFileSummary, RunReport, SplitFailure, SplitReport};

use std::fs;

use crate::config::DatasetLayout;
use crate::error::Voc2YoloError;
use crate::ir::io_voc_xml::read_voc_xml;
use crate::ir::io_yolo::{write_label_file, LabelRecord};
use crate::ir::ClassRegistry;

/// Converts annotations of one dataset layout into YOLO label files.
pub struct AnnotationConverter<'a, O = TracingObserver> {
    layout: &'a DatasetLayout,
    classes: &'a ClassRegistry,
    observer: O,
}

impl<'a> AnnotationConverter<'a, TracingObserver> {
    pub fn new(layout: &'a DatasetLayout, classes: &'a ClassRegistry) -> Self {
        Self::with_observer(layout, classes, TracingObserver)
    }
}

impl<'a, O: ConversionObserver> AnnotationConverter<'a, O> {
    pub fn with_observer(layout: &'a DatasetLayout, classes: &'a ClassRegistry, observer: O) -> Self {
        Self {
            layout,
            classes,
            observer,
        }
    }

    pub fn layout(&self) -> &'a DatasetLayout {
        self.layout
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Converts the annotation of `image_id` and (re)writes its label file.
    ///
    /// A missing or malformed annotation is an error and leaves no label file
    /// behind. An annotation without `<size>` yields an empty label file.
    /// Boxes with non-finite or inverted corners and zero image sizes are
    /// rejected; nothing is written for that image.
    pub fn convert_annotation(&mut self, image_id: &str) -> Result<LabelFileSummary, Voc2YoloError> {
        let annotation_path = self.layout.annotation_path(image_id);
        let label_path = self.layout.label_path(image_id);

        let annotation = read_voc_xml(&annotation_path, self.classes)?;
        let mut summary = LabelFileSummary::new(image_id, label_path.clone());
        let mut records = Vec::new();

        match annotation.size {
            None => self.observer.size_missing(image_id),
            Some(size) => {
                summary.size_present = true;
                if !size.is_positive() {
                    return Err(Voc2YoloError::InvalidImageSize {
                        path: annotation_path,
                        width: size.width,
                        height: size.height,
                    });
                }

                for (object_index, object) in annotation.objects.iter().enumerate() {
                    let Some(class_id) = self.classes.class_id(&object.name) else {
                        summary.skipped_unknown_class += 1;
                        self.observer
                            .object_skipped(image_id, &object.name, SkipReason::UnknownClass);
                        continue;
                    };
                    if object.is_difficult() {
                        summary.skipped_difficult += 1;
                        self.observer
                            .object_skipped(image_id, &object.name, SkipReason::Difficult);
                        continue;
                    }

                    let bbox = object.bndbox.ok_or_else(|| Voc2YoloError::VocXmlParse {
                        path: annotation_path.clone(),
                        message: format!("missing <bndbox> in <object> {object_index}"),
                    })?;
                    if !bbox.is_finite() || !bbox.is_ordered() {
                        return Err(Voc2YoloError::InvalidBox {
                            path: annotation_path,
                            object_index,
                            message: format!(
                                "expected finite xmin <= xmax and ymin <= ymax, got {bbox:?}"
                            ),
                        });
                    }

                    self.observer.object_retained(image_id, &object.name, &bbox);
                    records.push(LabelRecord::new(class_id, bbox.to_normalized_cxcywh(size)));
                }
            }
        }

        let labels_dir = self.layout.labels_dir();
        fs::create_dir_all(&labels_dir).map_err(Voc2YoloError::io(&labels_dir))?;
        write_label_file(&label_path, &records)?;

        summary.records_written = records.len();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_annotation(root: &Path, id: &str, xml: &str) {
        let dir = root.join("Annotations");
        fs::create_dir_all(&dir).expect("create annotations dir");
        fs::write(dir.join(format!("{id}.xml")), xml).expect("write annotation");
    }

    fn object_xml(name: &str, difficult: u8, b: (f64, f64, f64, f64)) -> String {
        format!(
            "<object><name>{name}</name><difficult>{difficult}</difficult>\
             <bndbox><xmin>{}</xmin><xmax>{}</xmax><ymin>{}</ymin><ymax>{}</ymax></bndbox></object>",
            b.0, b.1, b.2, b.3
        )
    }

    fn annotation_xml(size: Option<(u32, u32)>, objects: &[String]) -> String {
        let size = size
            .map(|(w, h)| format!("<size><width>{w}</width><height>{h}</height><depth>3</depth></size>"))
            .unwrap_or_default();
        format!("<annotation>{size}{}</annotation>", objects.concat())
    }

    #[test]
    fn converts_retained_objects_and_reports_them() {
        let temp = tempfile::tempdir().expect("create temp dir");
        write_annotation(
            temp.path(),
            "001",
            &annotation_xml(
                Some((300, 300)),
                &[
                    object_xml("spur", 0, (30.0, 90.0, 30.0, 90.0)),
                    object_xml("scratch", 0, (1.0, 2.0, 1.0, 2.0)),
                    object_xml("short", 1, (1.0, 2.0, 1.0, 2.0)),
                ],
            ),
        );

        let layout = DatasetLayout::new(temp.path());
        let classes = ClassRegistry::default();
        let mut converter =
            AnnotationConverter::with_observer(&layout, &classes, RecordingObserver::default());

        let summary = converter.convert_annotation("001").expect("convert");
        assert_eq!(summary.records_written, 1);
        assert_eq!(summary.skipped_unknown_class, 1);
        assert_eq!(summary.skipped_difficult, 1);
        assert!(summary.size_present);

        let labels = fs::read_to_string(layout.label_path("001")).expect("read label");
        assert_eq!(labels, "4 0.2 0.2 0.2 0.2\n");

        let observer = converter.observer();
        assert_eq!(observer.retained(), vec![("001", "spur")]);
        assert!(observer.events.contains(&ObservedEvent::Skipped {
            image_id: "001".into(),
            class_name: "short".into(),
            reason: SkipReason::Difficult,
        }));
    }

    #[test]
    fn label_file_is_overwritten_not_appended() {
        let temp = tempfile::tempdir().expect("create temp dir");
        write_annotation(
            temp.path(),
            "a",
            &annotation_xml(Some((10, 10)), &[object_xml("spur", 0, (0.0, 10.0, 0.0, 10.0))]),
        );
        let layout = DatasetLayout::new(temp.path());
        let classes = ClassRegistry::default();
        let mut converter = AnnotationConverter::with_observer(&layout, &classes, NullObserver);

        converter.convert_annotation("a").expect("first run");
        converter.convert_annotation("a").expect("second run");

        let labels = fs::read_to_string(layout.label_path("a")).expect("read label");
        assert_eq!(labels, "4 0.5 0.5 1.0 1.0\n");
    }

    #[test]
    fn class_names_are_matched_verbatim() {
        let temp = tempfile::tempdir().expect("create temp dir");
        write_annotation(
            temp.path(),
            "padded",
            &annotation_xml(Some((300, 300)), &[object_xml(" spur\n", 0, (30.0, 90.0, 30.0, 90.0))]),
        );
        let layout = DatasetLayout::new(temp.path());
        let classes = ClassRegistry::default();
        let mut converter = AnnotationConverter::with_observer(&layout, &classes, NullObserver);

        let summary = converter.convert_annotation("padded").expect("convert");
        assert_eq!(summary.skipped_unknown_class, 1);
        assert_eq!(fs::read_to_string(layout.label_path("padded")).expect("read label"), "");
    }

    #[test]
    fn unregistered_object_with_blank_difficult_is_skipped() {
        let temp = tempfile::tempdir().expect("create temp dir");
        write_annotation(
            temp.path(),
            "mixed",
            &annotation_xml(
                Some((300, 300)),
                &[
                    "<object><name>scratch</name><difficult></difficult></object>".to_string(),
                    object_xml("spur", 0, (30.0, 90.0, 30.0, 90.0)),
                ],
            ),
        );
        let layout = DatasetLayout::new(temp.path());
        let classes = ClassRegistry::default();
        let mut converter = AnnotationConverter::with_observer(&layout, &classes, NullObserver);

        converter.convert_annotation("mixed").expect("convert");
        assert_eq!(
            fs::read_to_string(layout.label_path("mixed")).expect("read label"),
            "4 0.2 0.2 0.2 0.2\n"
        );
    }

    #[test]
    fn inverted_box_is_rejected() {
        let temp = tempfile::tempdir().expect("create temp dir");
        write_annotation(
            temp.path(),
            "bad",
            &annotation_xml(Some((10, 10)), &[object_xml("spur", 0, (8.0, 2.0, 1.0, 3.0))]),
        );
        let layout = DatasetLayout::new(temp.path());
        let classes = ClassRegistry::default();
        let mut converter = AnnotationConverter::with_observer(&layout, &classes, NullObserver);

        let err = converter.convert_annotation("bad").unwrap_err();
        assert!(matches!(err, Voc2YoloError::InvalidBox { object_index: 0, .. }));
        assert!(!layout.label_path("bad").exists());
    }

    #[test]
    fn zero_image_size_is_rejected() {
        let temp = tempfile::tempdir().expect("create temp dir");
        write_annotation(temp.path(), "zero", &annotation_xml(Some((0, 10)), &[]));
        let layout = DatasetLayout::new(temp.path());
        let classes = ClassRegistry::default();
        let mut converter = AnnotationConverter::with_observer(&layout, &classes, NullObserver);

        let err = converter.convert_annotation("zero").unwrap_err();
        assert!(matches!(err, Voc2YoloError::InvalidImageSize { width: 0, .. }));
    }

    #[test]
    fn missing_annotation_is_an_io_error() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let layout = DatasetLayout::new(temp.path());
        let classes = ClassRegistry::default();
        let mut converter = AnnotationConverter::with_observer(&layout, &classes, NullObserver);

        let err = converter.convert_annotation("nope").unwrap_err();
        assert!(matches!(err, Voc2YoloError::Io { .. }));
        assert!(!layout.label_path("nope").exists());
    }
}
