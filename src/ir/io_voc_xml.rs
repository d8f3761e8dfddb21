//! Pascal VOC XML reader.
//!
//! Reads the subset of a VOC annotation that YOLO conversion needs: the
//! `<size>` node and every `<object>` with its name, difficult flag and box.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::model::{ImageSize, VocAnnotation, VocObject};
use super::{BBoxXYXY, ClassRegistry, Pixel};
use crate::error::Voc2YoloError;

/// Read and parse one VOC XML file.
///
/// Every `<object>` needs `<difficult>` and `<name>` elements. The difficult
/// flag is only parsed for registered class names, and boxes are only read for
/// registered objects that are not difficult; a filtered object may omit
/// `<bndbox>` and may carry a non-numeric difficult flag.
pub fn read_voc_xml(path: &Path, registry: &ClassRegistry) -> Result<VocAnnotation, Voc2YoloError> {
    let xml = fs::read_to_string(path).map_err(Voc2YoloError::io(path))?;
    parse_voc_xml_str(&xml, path, registry)
}

/// Parse VOC XML from a UTF-8 string.
///
/// Useful for testing/fuzzing parse behavior in-memory.
pub fn from_voc_xml_str(xml: &str, registry: &ClassRegistry) -> Result<VocAnnotation, Voc2YoloError> {
    parse_voc_xml_str(xml, Path::new("<memory>"), registry)
}

/// Parse VOC XML from bytes. The input must be valid UTF-8.
pub fn from_voc_xml_slice(
    bytes: &[u8],
    registry: &ClassRegistry,
) -> Result<VocAnnotation, Voc2YoloError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| Voc2YoloError::VocXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_voc_xml_str(xml, registry)
}

pub(crate) fn parse_voc_xml_str(
    xml: &str,
    path: &Path,
    registry: &ClassRegistry,
) -> Result<VocAnnotation, Voc2YoloError> {
    let document = roxmltree::Document::parse(xml).map_err(|source| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;
    let root = document.root_element();

    let Some(size) = child_element(root, "size") else {
        return Ok(VocAnnotation::default());
    };
    let width = parse_required::<u32>(size, "width", path, "<size>", "u32")?;
    let height = parse_required::<u32>(size, "height", path, "<size>", "u32")?;

    let mut objects = Vec::new();
    for object in root
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let difficult = required_child(object, "difficult", path, "<object>")?;
        let name = raw_text(required_child(object, "name", path, "<object>")?);

        // Unregistered objects are skipped before their difficult flag is read.
        if !registry.contains(&name) {
            objects.push(VocObject {
                name,
                difficult: None,
                bndbox: None,
            });
            continue;
        }

        let difficult = parse_text::<i64>(difficult, path, "<object>", "integer")?;
        let bndbox = if difficult != 1 {
            Some(parse_bndbox(object, path)?)
        } else {
            None
        };
        objects.push(VocObject {
            name,
            difficult: Some(difficult),
            bndbox,
        });
    }

    Ok(VocAnnotation {
        size: Some(ImageSize::new(width, height)),
        objects,
    })
}

fn parse_bndbox(object: Node<'_, '_>, path: &Path) -> Result<BBoxXYXY<Pixel>, Voc2YoloError> {
    let bndbox = child_element(object, "bndbox").ok_or_else(|| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: "missing <bndbox> in <object>".to_string(),
    })?;

    let xmin = parse_required::<f64>(bndbox, "xmin", path, "<bndbox>", "floating-point number")?;
    let xmax = parse_required::<f64>(bndbox, "xmax", path, "<bndbox>", "floating-point number")?;
    let ymin = parse_required::<f64>(bndbox, "ymin", path, "<bndbox>", "floating-point number")?;
    let ymax = parse_required::<f64>(bndbox, "ymax", path, "<bndbox>", "floating-point number")?;

    Ok(BBoxXYXY::from_voc_order(xmin, xmax, ymin, ymax))
}

fn required_child<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, Voc2YoloError> {
    child_element(node, tag).ok_or_else(|| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn parse_required<T: std::str::FromStr>(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
    expected: &str,
) -> Result<T, Voc2YoloError> {
    parse_text(required_child(node, tag, path, context)?, path, context, expected)
}

/// Parses a numeric element, ignoring surrounding whitespace.
fn parse_text<T: std::str::FromStr>(
    element: Node<'_, '_>,
    path: &Path,
    context: &str,
    expected: &str,
) -> Result<T, Voc2YoloError> {
    let tag = element.tag_name().name();
    let raw = element.text().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(Voc2YoloError::VocXmlParse {
            path: path.to_path_buf(),
            message: format!("empty <{tag}> in {context}; expected {expected}"),
        });
    }
    raw.parse::<T>().map_err(|_| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in {context}; expected {expected}"),
    })
}

/// Element text exactly as written; class names are matched without trimming.
fn raw_text(element: Node<'_, '_>) -> String {
    element.text().unwrap_or_default().to_string()
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}
