//! Item building and the default (rectangular) positioner.

use serde_json::Value;

use crate::config::{Content, ContentSource, LabelCfg, LabelLineCfg, LabelPosition, PositionSource};
use crate::coord::Coordinate;
use crate::ir::{Datum, DimValue, GeometryKind, MappedDatum, MarkShape, Point};
use crate::scale::Scale;
use crate::scene::TextAlign;
use crate::theme::TextStyle;

use super::{interval, polar, GeometryContext, LabelItem, LabelVariant};

/// Per-datum configuration after callback merging, content/position
/// resolution, and theme fallback. Plain data from here on.
pub(crate) struct ResolvedCfg {
    /// One entry per sub-item; `None` marks a sub-item that must not render.
    pub content: Vec<Option<String>>,
    pub position: Option<LabelPosition>,
    pub offset: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub rotate: Option<f32>,
    pub auto_rotate: bool,
    pub label_emit: bool,
    pub label_line: Option<LabelLineCfg>,
    pub style: TextStyle,
}

/// Expand mapped data into the ordered item sequence. `None` entries keep
/// their ordinal so the reconciler can match shapes by index.
pub(crate) fn build_items(
    variant: LabelVariant,
    ctx: &GeometryContext<'_>,
    data: &[MappedDatum],
) -> Vec<Option<LabelItem>> {
    let cfgs = resolve_cfgs(ctx, data);
    let mut items = Vec::new();
    for (datum, cfg) in data.iter().zip(cfgs) {
        let Some(cfg) = cfg else {
            items.push(None);
            continue;
        };
        let total = cfg.content.len();
        for sub_index in 0..total {
            let Some(text) = cfg.content[sub_index].clone() else {
                items.push(None);
                continue;
            };
            let mut item = match variant {
                LabelVariant::Polar => polar::label_position(&cfg, datum, sub_index, total, ctx, text),
                _ => base_position(variant, &cfg, datum, sub_index, total, ctx, text),
            };
            if item.text_align.is_none() {
                item.text_align = cfg.style.text_align;
            }
            if item.text_align.is_none() {
                item.text_align = Some(match variant {
                    LabelVariant::Polar => polar::label_align(&item, ctx.coordinate),
                    _ => base_align(cfg.offset, sub_index, total, ctx.coordinate),
                });
            }
            items.push(Some(item));
        }
    }
    items
}

/// Add the configured manual nudges after base placement.
pub(crate) fn apply_manual_offsets(items: &mut [Option<LabelItem>]) {
    for item in items.iter_mut().flatten() {
        if item.offset_x != 0.0 {
            item.x += item.offset_x;
        }
        if item.offset_y != 0.0 {
            item.y += item.offset_y;
        }
    }
}

/// Default positioner: anchor extraction, funnel/pyramid correction, named
/// position override (interval variant), directional offset, canvas mapping.
fn base_position(
    variant: LabelVariant,
    cfg: &ResolvedCfg,
    datum: &MappedDatum,
    sub_index: usize,
    total: usize,
    ctx: &GeometryContext<'_>,
    content: String,
) -> LabelItem {
    let coord = ctx.coordinate;

    let (mut x, y) = if ctx.kind == GeometryKind::Polygon {
        centroid(&datum.x, &datum.y)
    } else {
        (
            dim_value(&datum.x, total, sub_index),
            dim_value(&datum.y, total, sub_index),
        )
    };

    // Funnel and pyramid slices taper; keep the label centered between the
    // current slice and the widest edge of the adjacent one.
    if datum.shape.is_tapered()
        && let Some(next_points) = &datum.next_points
    {
        let mut max_x = f32::NEG_INFINITY;
        for point in next_points {
            let converted = coord.convert(*point);
            if converted.x > max_x {
                max_x = converted.x;
            }
        }
        if max_x.is_finite() {
            x = (x + max_x) / 2.0;
        }
    }
    // Last pyramid slice has no successor: average toward the apex vertex.
    if datum.shape == MarkShape::Pyramid
        && datum.next_points.is_none()
        && let Some(points) = &datum.points
    {
        for point in points {
            let converted = coord.convert(*point);
            if !datum.x.contains(converted.x) {
                x = (x + converted.x) / 2.0;
            }
        }
    }

    let mut item = LabelItem {
        content,
        x,
        y,
        start: Point::default(),
        text_align: None,
        rotate: cfg.rotate,
        angle: 0.0,
        color: None,
        offset: cfg.offset,
        offset_x: cfg.offset_x,
        offset_y: cfg.offset_y,
        label_emit: cfg.label_emit,
        label_line: cfg.label_line.clone(),
        style: cfg.style.clone(),
        origin: datum.origin.clone(),
    };

    if let Some(position) = cfg.position
        && variant == LabelVariant::Interval
    {
        interval::set_label_position(&mut item, datum, position, coord);
    }

    let offset_point = label_offset(cfg.offset, sub_index, total, coord);
    let mapped = coord.apply_matrix(item.x, item.y, 1.0);
    item.x = mapped[0];
    item.y = mapped[1];
    item.start = Point::new(item.x, item.y);
    item.x += offset_point.x;
    item.y += offset_point.y;
    item.color = datum.color.clone();
    item
}

/// Signed-area centroid of a polygon given its vertex arrays. Scalar inputs
/// are single-point marks and skip the polygon formula.
fn centroid(xs: &DimValue, ys: &DimValue) -> (f32, f32) {
    let (DimValue::Multi(xs), DimValue::Multi(ys)) = (xs, ys) else {
        return (xs.last(), ys.last());
    };
    let n = xs.len().min(ys.len());
    if n == 0 {
        return (0.0, 0.0);
    }
    let mut x = 0.0f32;
    let mut y = 0.0f32;
    let mut k = 0.0f32;
    let mut former = n - 1;
    for current in 0..n {
        let diff = xs[former] * ys[current] - xs[current] * ys[former];
        k += diff;
        x += (xs[former] + xs[current]) * diff;
        y += (ys[former] + ys[current]) * diff;
        former = current;
    }
    k *= 3.0;
    if k == 0.0 {
        // Degenerate (zero-area) outline: every sensible anchor coincides.
        return (mean(xs), mean(ys));
    }
    (x / k, y / k)
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

/// Anchor coordinate from a possibly-array dim: a single-content label takes
/// the last of up to two stacked values or the mean of more; multi-content
/// labels index by sub-item.
fn dim_value(value: &DimValue, content_len: usize, index: usize) -> f32 {
    match value {
        DimValue::Single(v) => *v,
        DimValue::Multi(values) => {
            if content_len == 1 {
                if values.len() <= 2 {
                    value.last()
                } else {
                    value.mean()
                }
            } else {
                value.get(index)
            }
        }
    }
}

fn offset_vector(offset: f32, coord: &dyn Coordinate) -> [f32; 3] {
    if coord.is_transposed() {
        coord.apply_matrix(offset, 0.0, 0.0)
    } else {
        coord.apply_matrix(0.0, offset, 0.0)
    }
}

/// The configured offset projected onto the non-transposed axis.
pub(crate) fn default_offset(offset: f32, coord: &dyn Coordinate) -> f32 {
    let vector = offset_vector(offset, coord);
    if coord.is_transposed() {
        vector[0]
    } else {
        vector[1]
    }
}

/// Offset vector for one sub-item. The first of several stacked labels moves
/// opposite its siblings so stacked series labels sit on opposite edges.
fn label_offset(cfg_offset: f32, index: usize, total: usize, coord: &dyn Coordinate) -> Point {
    let offset = default_offset(cfg_offset, coord);
    let transposed = coord.is_transposed();
    // Screen y grows downward, so the rectangular offset flips sign.
    let factor = if transposed { 1.0 } else { -1.0 };
    let value = if index > 0 || total == 1 {
        offset * factor
    } else {
        -offset * factor
    };
    if transposed {
        Point::new(value, 0.0)
    } else {
        Point::new(0.0, value)
    }
}

/// Default alignment when neither the position override nor the config set
/// one: center, unless the coordinate is transposed, where the offset sign
/// decides and the first stacked sub-item mirrors.
fn base_align(cfg_offset: f32, index: usize, total: usize, coord: &dyn Coordinate) -> TextAlign {
    if !coord.is_transposed() {
        return TextAlign::Center;
    }
    let offset = default_offset(cfg_offset, coord);
    let mut align = if offset < 0.0 {
        TextAlign::Right
    } else if offset == 0.0 {
        TextAlign::Center
    } else {
        TextAlign::Left
    };
    if total > 1 && index == 0 {
        align = match align {
            TextAlign::Right => TextAlign::Left,
            TextAlign::Left => TextAlign::Right,
            TextAlign::Center => TextAlign::Center,
        };
    }
    align
}

/// Resolve one config per datum: callback merge, default content from the
/// scales, theme selection. `None` entries are suppressed data.
fn resolve_cfgs(ctx: &GeometryContext<'_>, data: &[MappedDatum]) -> Vec<Option<ResolvedCfg>> {
    let option = ctx.label_option;
    let mut cfgs = Vec::with_capacity(data.len());
    for (index, datum) in data.iter().enumerate() {
        let origin = &datum.origin;
        let texts = label_texts(origin, ctx.scales);
        let override_cfg = match &option.callback {
            Some(callback) => {
                let values: Vec<Value> = option
                    .fields
                    .iter()
                    .map(|field| origin.get(field).cloned().unwrap_or(Value::Null))
                    .collect();
                match callback(&values) {
                    Some(cfg) => Some(cfg),
                    None => {
                        cfgs.push(None);
                        continue;
                    }
                }
            }
            None => None,
        };
        let default_text = texts.into_iter().next().flatten();
        cfgs.push(Some(resolve_one(
            &option.cfg,
            override_cfg,
            default_text,
            datum,
            index,
            ctx,
        )));
    }
    cfgs
}

fn resolve_one(
    base: &LabelCfg,
    over: Option<LabelCfg>,
    default_text: Option<Content>,
    datum: &MappedDatum,
    index: usize,
    ctx: &GeometryContext<'_>,
) -> ResolvedCfg {
    let over = over.unwrap_or_default();
    let origin = &datum.origin;

    let content_source = over.content.as_ref().or(base.content.as_ref());
    let content = match content_source {
        None => match &default_text {
            Some(content) => content_entries(content),
            None => vec![None],
        },
        Some(ContentSource::Value(content)) => content_entries(content),
        Some(ContentSource::Fn(resolve)) => match resolve(origin, datum, index) {
            Some(content) => content_entries(&content),
            None => vec![None],
        },
    };

    let position_source = over.position.as_ref().or(base.position.as_ref());
    let position = match position_source {
        None => None,
        Some(PositionSource::Keyword(position)) => Some(*position),
        Some(PositionSource::Fn(resolve)) => resolve(origin, datum, index),
    };

    let configured_offset = over.offset.or(base.offset);
    // Inside-the-mark text needs the contrasting inner theme.
    let inner = ctx.kind == GeometryKind::Polygon
        || (configured_offset.is_some_and(|offset| offset < 0.0)
            && !matches!(
                ctx.kind,
                GeometryKind::Line | GeometryKind::Point | GeometryKind::Path
            ));
    let preset = if inner {
        &ctx.theme.inner_labels
    } else {
        &ctx.theme.label
    };

    ResolvedCfg {
        content,
        position,
        offset: configured_offset.unwrap_or(preset.offset),
        offset_x: over.offset_x.or(base.offset_x).unwrap_or(0.0),
        offset_y: over.offset_y.or(base.offset_y).unwrap_or(0.0),
        rotate: over.rotate.or(base.rotate),
        auto_rotate: over.auto_rotate.or(base.auto_rotate).unwrap_or(true),
        label_emit: over.label_emit.or(base.label_emit).unwrap_or(false),
        label_line: over.label_line.or_else(|| base.label_line.clone()),
        style: over
            .style
            .merged_over(&base.style)
            .merged_over(&preset.style),
    }
}

fn content_entries(content: &Content) -> Vec<Option<String>> {
    match content {
        Content::Single(text) => vec![non_empty(text)],
        Content::Multi(texts) => texts.iter().map(|text| non_empty(text)).collect(),
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Scale-rendered text of each configured field, element-wise for array
/// field values.
fn label_texts(origin: &Datum, scales: &[Box<dyn Scale>]) -> Vec<Option<Content>> {
    scales
        .iter()
        .map(|scale| {
            let value = origin.get(scale.field())?;
            match value {
                Value::Array(values) => Some(Content::Multi(
                    values
                        .iter()
                        .map(|value| scale.get_text(value).unwrap_or_default())
                        .collect(),
                )),
                value => scale
                    .get_text(value)
                    .filter(|text| !text.is_empty())
                    .map(Content::Single),
            }
        })
        .collect()
}
