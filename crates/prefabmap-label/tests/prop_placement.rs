//! Property tests for the label placement search.

use prefabmap_common::{boxes_overlap, Point};
use prefabmap_label::{FixedMetrics, LabelPlacer, PlacementConfig, PlacementOutcome};
use proptest::prelude::*;

const METRICS: FixedMetrics = FixedMetrics::new(9, 18);

fn dots() -> impl Strategy<Value = Vec<(i32, i32, String)>> {
    proptest::collection::vec((0i32..600, 0i32..600, "[A-Za-z]{1,8}( [A-Za-z]{1,8}){0,3}"), 1..40)
}

proptest! {
    #[test]
    fn accepted_labels_never_overlap(points in dots()) {
        let mut placer = LabelPlacer::new(&METRICS, PlacementConfig::default());
        let mut labels = Vec::new();
        for (i, (x, y, text)) in points.iter().enumerate() {
            let badge = format!("P{i:04}");
            if let PlacementOutcome::Label(p) = placer.place(Point::new(*x, *y), text, &badge) {
                labels.push(p.label_box);
            }
        }
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                prop_assert!(!boxes_overlap(a, b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn earlier_boxes_never_move(points in dots()) {
        let mut placer = LabelPlacer::new(&METRICS, PlacementConfig::default());
        let mut snapshot = Vec::new();
        for (i, (x, y, text)) in points.iter().enumerate() {
            placer.place(Point::new(*x, *y), text, &format!("P{i:04}"));
            prop_assert_eq!(&placer.occupied()[..snapshot.len()], &snapshot[..]);
            snapshot = placer.occupied().to_vec();
        }
    }

    #[test]
    fn lone_label_takes_default_slot(x in -1000i32..1000, y in -1000i32..1000, text in "[a-z]{1,12}") {
        let mut placer = LabelPlacer::new(&METRICS, PlacementConfig::default());
        match placer.place(Point::new(x, y), &text, "P0000") {
            PlacementOutcome::Label(p) => prop_assert_eq!(p.origin, Point::new(x + 4, y + 8)),
            PlacementOutcome::Badge(b) => prop_assert!(false, "unexpected badge {b:?}"),
        }
    }
}
