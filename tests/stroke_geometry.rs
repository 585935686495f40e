use egui::Pos2;
use inknote::freehand::{self, InputPoint, StrokeOptions};

#[test]
fn fewer_than_two_points_yield_nothing() {
    let options = StrokeOptions::default();
    assert!(freehand::compute_stroke(&[], &options).is_empty());

    let dot = [InputPoint::with_pressure(3.0, 3.0, 0.8)];
    assert!(freehand::compute_stroke(&dot, &options).is_empty());
}

#[test]
fn full_pressure_keeps_full_width() {
    let points = [
        InputPoint::with_pressure(0.0, 0.0, 1.0),
        InputPoint::with_pressure(10.0, 0.0, 1.0),
    ];
    let options = StrokeOptions {
        size: 16.0,
        thinning: 0.5,
        ..Default::default()
    };
    let outline = freehand::compute_stroke(&points, &options);
    assert!(!outline.is_empty());

    // Full pressure means thinning takes nothing away.
    for sample in &outline {
        assert!((sample.width - 16.0).abs() < 1e-4, "width {}", sample.width);
    }

    // Samples progress monotonically along the x axis.
    let mut last_x = f32::NEG_INFINITY;
    for sample in &outline {
        assert!(sample.pos.x >= last_x);
        last_x = sample.pos.x;
    }
    assert_eq!(outline[0].pos.x, 0.0);
    assert!(last_x > 5.0);
    for sample in &outline {
        assert_eq!(sample.pos.y, 0.0);
    }
}

#[test]
fn width_floor_holds_across_pressure_and_thinning() {
    for thinning in [0.0, 0.25, 0.5, 0.75, 1.0] {
        for pressure in [0.0, 0.1, 0.5, 0.9, 1.0] {
            let points = [
                InputPoint::with_pressure(0.0, 0.0, pressure),
                InputPoint::with_pressure(4.0, 3.0, pressure),
            ];
            let options = StrokeOptions {
                size: 1.0,
                thinning,
                ..Default::default()
            };
            let outline = freehand::compute_stroke(&points, &options);
            assert!(!outline.is_empty());
            for sample in &outline {
                assert!(
                    sample.width >= freehand::MIN_STROKE_WIDTH,
                    "width {} at pressure {pressure}, thinning {thinning}",
                    sample.width
                );
            }
        }
    }
}

#[test]
fn missing_pressure_falls_back_to_simulation() {
    let points = [
        InputPoint::new(0.0, 0.0),
        InputPoint::new(2.0, 0.0),
        InputPoint::new(4.0, 0.0),
        InputPoint::new(6.0, 0.0),
    ];
    let outline = freehand::compute_stroke(&points, &StrokeOptions::default());
    assert!(!outline.is_empty());
    for sample in &outline {
        assert!((0.0..=1.0).contains(&sample.pressure));
    }
}

#[test]
fn finished_stroke_ends_exactly_at_last_point() {
    let points = [
        InputPoint::with_pressure(0.0, 0.0, 0.5),
        InputPoint::with_pressure(30.0, 0.0, 0.5),
    ];
    let options = StrokeOptions {
        last: true,
        ..Default::default()
    };
    let outline = freehand::compute_stroke(&points, &options);
    let cap = outline.last().unwrap();
    assert_eq!(cap.pos, Pos2::new(30.0, 0.0));
}

#[test]
fn dense_input_is_deduplicated() {
    // Fifty points packed into a couple of units collapse to a handful of
    // samples.
    let points: Vec<InputPoint> = (0..50)
        .map(|i| InputPoint::with_pressure(i as f32 * 0.05, 0.0, 0.5))
        .collect();
    let outline = freehand::compute_stroke(&points, &StrokeOptions::default());
    assert!(!outline.is_empty());
    assert!(outline.len() < 5, "got {} samples", outline.len());
}

#[test]
fn path_data_renders_move_then_lines() {
    let points = [
        InputPoint::with_pressure(0.0, 0.0, 1.0),
        InputPoint::with_pressure(20.0, 0.0, 1.0),
    ];
    let options = StrokeOptions {
        size: 4.0,
        ..Default::default()
    };
    let outline = freehand::compute_stroke(&points, &options);
    let path = freehand::stroke_to_path_data(&outline);
    assert!(path.starts_with("M "));
    assert!(path.contains(" L "));

    assert!(freehand::stroke_to_path_data(&[]).is_empty());
}
