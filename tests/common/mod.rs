#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// One `<object>` of a test annotation.
pub struct Obj<'a> {
    pub name: &'a str,
    pub difficult: u8,
    /// (xmin, xmax, ymin, ymax)
    pub bndbox: (f64, f64, f64, f64),
}

pub fn obj(name: &str, difficult: u8, bndbox: (f64, f64, f64, f64)) -> Obj<'_> {
    Obj {
        name,
        difficult,
        bndbox,
    }
}

pub fn annotation_xml(size: Option<(u32, u32)>, objects: &[Obj<'_>]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<annotation>\n");
    xml.push_str("  <folder>images</folder>\n");
    if let Some((width, height)) = size {
        xml.push_str(&format!(
            "  <size>\n    <width>{width}</width>\n    <height>{height}</height>\n    <depth>3</depth>\n  </size>\n"
        ));
    }
    for o in objects {
        let (xmin, xmax, ymin, ymax) = o.bndbox;
        xml.push_str(&format!(
            "  <object>\n    <name>{}</name>\n    <pose>Unspecified</pose>\n    <truncated>0</truncated>\n    <difficult>{}</difficult>\n    <bndbox>\n      <xmin>{xmin}</xmin>\n      <ymin>{ymin}</ymin>\n      <xmax>{xmax}</xmax>\n      <ymax>{ymax}</ymax>\n    </bndbox>\n  </object>\n",
            o.name, o.difficult
        ));
    }
    xml.push_str("</annotation>\n");
    xml
}

pub fn write_annotation(root: &Path, image_id: &str, xml: &str) {
    let dir = root.join("Annotations");
    fs::create_dir_all(&dir).expect("create annotations dir");
    fs::write(dir.join(format!("{image_id}.xml")), xml).expect("write annotation");
}

pub fn write_image_set(root: &Path, split: &str, contents: &str) {
    let dir = root.join("ImageSets");
    fs::create_dir_all(&dir).expect("create image sets dir");
    fs::write(dir.join(format!("{split}.txt")), contents).expect("write image set");
}

/// A small PCB-style dataset: `train` has three images, `val` one, `test` two.
pub fn create_sample_dataset(root: &Path) {
    write_annotation(
        root,
        "001",
        &annotation_xml(Some((300, 300)), &[obj("spur", 0, (30.0, 90.0, 30.0, 90.0))]),
    );
    write_annotation(
        root,
        "002",
        &annotation_xml(
            Some((100, 200)),
            &[
                obj("missing_hole", 0, (10.0, 30.0, 40.0, 80.0)),
                obj("scratch", 0, (0.0, 1.0, 0.0, 1.0)),
                obj("short", 1, (0.0, 1.0, 0.0, 1.0)),
                obj("short", 0, (0.0, 100.0, 0.0, 200.0)),
            ],
        ),
    );
    write_annotation(root, "003", &annotation_xml(None, &[]));
    write_annotation(
        root,
        "004",
        &annotation_xml(Some((640, 480)), &[obj("mouse_bite", 0, (0.0, 64.0, 0.0, 48.0))]),
    );
    write_annotation(root, "005", &annotation_xml(Some((50, 50)), &[]));
    write_annotation(
        root,
        "006",
        &annotation_xml(Some((10, 10)), &[obj("spurious_copper", 0, (0.0, 5.0, 5.0, 10.0))]),
    );

    write_image_set(root, "train", "001\n002\n003\n");
    write_image_set(root, "val", "004\n");
    write_image_set(root, "test", "005 006\n");
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read file")
        .lines()
        .map(str::to_owned)
        .collect()
}
