#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Image size plus a box inside it, as `((width, height), (xmin, xmax, ymin, ymax))`.
pub fn arb_size_and_inner_box() -> impl Strategy<Value = ((u32, u32), (f64, f64, f64, f64))> {
    (1u32..=8192, 1u32..=8192).prop_flat_map(|(width, height)| {
        let w = width as f64;
        let h = height as f64;
        (
            Just((width, height)),
            (0.0..=w, 0.0..=w, 0.0..=h, 0.0..=h).prop_map(|(x1, x2, y1, y2)| {
                (x1.min(x2), x1.max(x2), y1.min(y2), y1.max(y2))
            }),
        )
    })
}

/// Object names drawn from the default registry plus a few unknown ones.
pub fn arb_object_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "missing_hole",
        "mouse_bite",
        "open_circuit",
        "short",
        "spur",
        "spurious_copper",
        "scratch",
        "Spur",
        "dust",
    ])
}
