//! Fuzz target for VOC XML parsing.
//!
//! Arbitrary bytes go through the same parser the converter uses, with the
//! default class registry so retained objects also exercise box parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use voc2yolo::ir::io_voc_xml::from_voc_xml_slice;
use voc2yolo::ClassRegistry;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let registry = ClassRegistry::default();
    let _ = from_voc_xml_slice(data, &registry);
});
