use mark_labels::config::{AdjustConfig, AdjustType, ContentSource, LabelCfg, LabelOption, LabelPosition, PositionSource};
use mark_labels::coord::{Cartesian, Polar};
use mark_labels::ir::{Datum, DimValue, GeometryKind, MappedDatum, Point};
use mark_labels::label::{GeometryContext, LabelController};
use mark_labels::scale::{Scale, TextScale};
use mark_labels::scene::{Shape, ShapeAttrs, ShapeKind, TextAlign};
use mark_labels::theme::Theme;

fn no_scales() -> Vec<Box<dyn Scale>> {
    Vec::new()
}

/// An interval mark spanning canvas x in [90, 110] and y in [100, 140],
/// inside a 600x400 plot. Mark vertices are in normalized space; the anchor
/// is already in canvas space, as the mapping stage produces them.
fn bar_datum() -> MappedDatum {
    let mut datum = MappedDatum::new(DimValue::Single(100.0), DimValue::Single(100.0));
    datum.points = Some(vec![
        Point::new(90.0 / 600.0, 0.65),
        Point::new(90.0 / 600.0, 0.75),
        Point::new(110.0 / 600.0, 0.75),
        Point::new(110.0 / 600.0, 0.65),
    ]);
    datum
}

#[test]
fn interval_top_label_sits_above_the_bar() {
    let coord = Cartesian::new(Point::new(0.0, 400.0), Point::new(600.0, 0.0));
    let theme = Theme::default();
    let option = LabelOption {
        cfg: LabelCfg {
            content: Some(ContentSource::from("42")),
            offset: Some(10.0),
            position: Some(PositionSource::from(LabelPosition::Top)),
            ..LabelCfg::default()
        },
        ..LabelOption::default()
    };
    let scales = no_scales();
    let ctx = GeometryContext {
        kind: GeometryKind::Interval,
        coordinate: &coord,
        theme: &theme,
        label_option: &option,
        scales: &scales,
    };

    let mut controller = LabelController::new();
    controller.render(&ctx, &[bar_datum()], &[], &AdjustConfig::default());

    assert_eq!(controller.label_count(), 1);
    let shape = controller.labels().next().expect("label shape");
    assert!(
        shape.y() < 100.0,
        "offset 10 with position top must place the label above the bar, got y {}",
        shape.y()
    );
    assert_eq!(shape.attrs.text_align, Some(TextAlign::Center));
    assert_eq!(shape.attrs.text.as_deref(), Some("42"));
}

#[test]
fn reconciliation_reuses_shapes_across_renders() {
    let coord = Cartesian::new(Point::new(0.0, 400.0), Point::new(600.0, 0.0));
    let theme = Theme::default();
    let option = LabelOption {
        fields: vec!["city".to_string()],
        ..LabelOption::default()
    };
    let scales: Vec<Box<dyn Scale>> = vec![Box::new(TextScale::new("city"))];
    let ctx = GeometryContext {
        kind: GeometryKind::Point,
        coordinate: &coord,
        theme: &theme,
        label_option: &option,
        scales: &scales,
    };

    let datum_named = |name: &str, x: f32| {
        let mut origin = Datum::new();
        origin.insert("city".to_string(), serde_json::Value::String(name.to_string()));
        let mut datum = MappedDatum::new(x, 200.0);
        datum.origin = origin;
        datum
    };

    let mut controller = LabelController::new();
    controller.render(
        &ctx,
        &[
            datum_named("A", 100.0),
            datum_named("B", 200.0),
            datum_named("C", 300.0),
        ],
        &[],
        &AdjustConfig::default(),
    );
    assert_eq!(controller.label_count(), 3);

    controller.render(
        &ctx,
        &[datum_named("A", 100.0), datum_named("C", 300.0)],
        &[],
        &AdjustConfig::default(),
    );
    assert_eq!(controller.label_count(), 2);
    let texts: Vec<_> = controller
        .labels()
        .map(|shape| shape.attrs.text.clone().unwrap_or_default())
        .collect();
    assert_eq!(texts, vec!["A", "C"]);
}

#[test]
fn theta_pie_labels_rotate_upright() {
    let coord = Polar::new(Point::new(200.0, 200.0), 50.0).theta();
    let theme = Theme::default();
    let option = LabelOption {
        cfg: LabelCfg {
            content: Some(ContentSource::from("slice")),
            ..LabelCfg::default()
        },
        ..LabelOption::default()
    };
    let scales = no_scales();
    let ctx = GeometryContext {
        kind: GeometryKind::Interval,
        coordinate: &coord,
        theme: &theme,
        label_option: &option,
        scales: &scales,
    };

    // Arc boundary points in canvas space: start at the top, end at the right.
    let mut datum = MappedDatum::new(
        DimValue::Multi(vec![200.0, 250.0]),
        DimValue::Multi(vec![150.0, 200.0]),
    );
    datum.origin = Datum::new();

    let mut controller = LabelController::new();
    controller.render(&ctx, &[datum], &[], &AdjustConfig::default());

    assert_eq!(controller.label_count(), 1);
    let shape = controller.labels().next().expect("label shape");
    assert!(
        shape.x() > 200.0,
        "a single-content label anchors on the arc's end point"
    );
    assert!(
        shape.has_transform(),
        "auto-rotate defaults on for polar labels"
    );
}

#[test]
fn multi_content_expands_to_independent_items() {
    let coord = Cartesian::new(Point::new(0.0, 400.0), Point::new(600.0, 0.0));
    let theme = Theme::default();
    let option = LabelOption {
        cfg: LabelCfg {
            content: Some(ContentSource::from(vec![
                "min".to_string(),
                "max".to_string(),
            ])),
            ..LabelCfg::default()
        },
        ..LabelOption::default()
    };
    let scales = no_scales();
    let ctx = GeometryContext {
        kind: GeometryKind::Interval,
        coordinate: &coord,
        theme: &theme,
        label_option: &option,
        scales: &scales,
    };

    let datum = MappedDatum::new(
        DimValue::Multi(vec![100.0, 100.0]),
        DimValue::Multi(vec![300.0, 150.0]),
    );

    let mut controller = LabelController::new();
    controller.render(&ctx, &[datum], &[], &AdjustConfig::default());

    assert_eq!(controller.label_count(), 2);
    let ys: Vec<f32> = controller.labels().map(|shape| shape.y()).collect();
    assert!(
        (ys[0] - ys[1]).abs() > 1.0,
        "stacked sub-items must place independently, got {ys:?}"
    );
}

#[test]
fn treemap_adjust_hides_labels_that_cannot_fit() {
    let coord = Cartesian::new(Point::new(0.0, 400.0), Point::new(600.0, 0.0));
    let theme = Theme::default();
    let option = LabelOption {
        cfg: LabelCfg {
            content: Some(ContentSource::from("a very long treemap label")),
            adjust_type: Some(AdjustType::Treemap),
            ..LabelCfg::default()
        },
        ..LabelOption::default()
    };
    let scales = no_scales();
    let ctx = GeometryContext {
        kind: GeometryKind::Polygon,
        coordinate: &coord,
        theme: &theme,
        label_option: &option,
        scales: &scales,
    };

    let datum = MappedDatum::new(100.0, 100.0);
    let tiny_mark = Shape::new(
        ShapeKind::Rect,
        ShapeAttrs {
            x: 98.0,
            y: 86.0,
            width: Some(4.0),
            height: Some(4.0),
            ..ShapeAttrs::default()
        },
    );

    let mut controller = LabelController::new();
    controller.render(&ctx, &[datum], &[tiny_mark], &AdjustConfig::default());

    let shape = controller.labels().next().expect("label shape");
    assert!(
        !shape.visible,
        "a label far wider than its mark must be hidden by the treemap strategy"
    );
}

#[test]
fn suppressed_datum_leaves_siblings_untouched() {
    let coord = Cartesian::new(Point::new(0.0, 400.0), Point::new(600.0, 0.0));
    let theme = Theme::default();
    let option = LabelOption {
        fields: vec!["value".to_string()],
        callback: Some(Box::new(|values| {
            // Suppress labels for odd values.
            let value = values.first().and_then(|v| v.as_i64()).unwrap_or(0);
            if value % 2 == 1 {
                None
            } else {
                Some(LabelCfg::default())
            }
        })),
        ..LabelOption::default()
    };
    let scales: Vec<Box<dyn Scale>> = vec![Box::new(TextScale::new("value"))];
    let ctx = GeometryContext {
        kind: GeometryKind::Point,
        coordinate: &coord,
        theme: &theme,
        label_option: &option,
        scales: &scales,
    };

    let datum_valued = |value: i64, x: f32| {
        let mut origin = Datum::new();
        origin.insert("value".to_string(), serde_json::Value::from(value));
        let mut datum = MappedDatum::new(x, 200.0);
        datum.origin = origin;
        datum
    };

    let mut controller = LabelController::new();
    controller.render(
        &ctx,
        &[datum_valued(2, 100.0), datum_valued(3, 200.0), datum_valued(4, 300.0)],
        &[],
        &AdjustConfig::default(),
    );

    assert_eq!(controller.label_count(), 2);
    let texts: Vec<_> = controller
        .labels()
        .map(|shape| shape.attrs.text.clone().unwrap_or_default())
        .collect();
    assert_eq!(texts, vec!["2", "4"]);
}
