//! Positioner for polar and theta coordinates (pie, donut, radial bars).
//!
//! Works in (center, radius, angle) space: pick a reference point on the arc,
//! perturb it radially or angularly by the offset, and keep rotated text
//! upright.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::coord::{self, Coordinate};
use crate::ir::{DimValue, MappedDatum, Point};
use crate::scene::TextAlign;

use super::base::{self, ResolvedCfg};
use super::{GeometryContext, LabelItem};

pub(crate) fn label_position(
    cfg: &ResolvedCfg,
    datum: &MappedDatum,
    sub_index: usize,
    total: usize,
    ctx: &GeometryContext<'_>,
    content: String,
) -> LabelItem {
    let coord = ctx.coordinate;

    let mut factor = 1.0f32;
    let arc_point = if is_to_middle(datum) {
        middle_point(datum, coord).unwrap_or_else(|| boundary_point(datum, sub_index, coord))
    } else {
        // A single-content label reads the arc's end point; the first of a
        // stacked pair reads the start with the offset flipped inward.
        let mut point_index = sub_index;
        if total == 1 && sub_index == 0 {
            point_index = 1;
        } else if sub_index == 0 {
            factor = -1.0;
        }
        boundary_point(datum, point_index, coord)
    };

    let offset = base::default_offset(cfg.offset, coord) * factor;
    let angle = coord::point_angle(coord, arc_point);
    let emit = cfg.label_emit;

    let mut item = match circle_point(coord, angle, offset, arc_point, emit) {
        Some(position) => LabelItem {
            content,
            x: position.x,
            y: position.y,
            start: arc_point,
            text_align: None,
            rotate: None,
            angle,
            color: datum.color.clone(),
            offset: cfg.offset,
            offset_x: cfg.offset_x,
            offset_y: cfg.offset_y,
            label_emit: emit,
            label_line: cfg.label_line.clone(),
            style: cfg.style.clone(),
            origin: datum.origin.clone(),
        },
        // Zero radius: nothing sensible to anchor to. Degrade to an
        // empty-content placeholder so the reconciler still sees the slot.
        None => LabelItem {
            content: String::new(),
            x: arc_point.x,
            y: arc_point.y,
            start: arc_point,
            text_align: None,
            rotate: None,
            angle,
            color: None,
            offset: cfg.offset,
            offset_x: cfg.offset_x,
            offset_y: cfg.offset_y,
            label_emit: emit,
            label_line: None,
            style: cfg.style.clone(),
            origin: datum.origin.clone(),
        },
    };

    item.rotate = if cfg.auto_rotate {
        Some(label_rotate(angle, offset, emit))
    } else {
        cfg.rotate
    };
    item
}

/// Stacked data with more than two points anchors at the converted mean of
/// the mark's vertices rather than either arc boundary.
fn is_to_middle(datum: &MappedDatum) -> bool {
    matches!(&datum.x, DimValue::Multi(values) if values.len() > 2)
}

fn middle_point(datum: &MappedDatum, coord: &dyn Coordinate) -> Option<Point> {
    let points = datum.points.as_ref()?;
    if points.is_empty() {
        return None;
    }
    let mut middle = Point::default();
    for point in points {
        middle.x += point.x;
        middle.y += point.y;
    }
    middle.x /= points.len() as f32;
    middle.y /= points.len() as f32;
    Some(coord.convert(middle))
}

fn boundary_point(datum: &MappedDatum, index: usize, coord: &dyn Coordinate) -> Point {
    let point = Point::new(datum.x.get(index), datum.y.get(index));
    let mapped = coord.apply_matrix(point.x, point.y, 1.0);
    Point::new(mapped[0], mapped[1])
}

/// Project the reference point outward. Transposed (radial) charts convert
/// the offset into an angular perturbation while it stays under the radius,
/// which keeps labels on the arc instead of past it.
fn circle_point(
    coord: &dyn Coordinate,
    angle: f32,
    offset: f32,
    point: Point,
    emit: bool,
) -> Option<Point> {
    let center = coord.center();
    let mut radius = coord::point_radius(coord, point);
    if radius == 0.0 {
        return None;
    }
    let mut label_angle = angle;
    if coord.is_transposed() && radius > offset && !emit {
        let append = (offset / (2.0 * radius)).asin();
        label_angle = angle + append * 2.0;
    } else {
        radius += offset;
    }
    Some(Point::new(
        center.x + radius * label_angle.cos(),
        center.y + radius * label_angle.sin(),
    ))
}

/// Rotation that keeps label text upright: tangent to the arc, flipped for
/// emitted labels, normalized into (-PI/2, PI/2].
pub fn label_rotate(angle: f32, _offset: f32, emit: bool) -> f32 {
    let mut rotate = angle + FRAC_PI_2;
    if emit {
        rotate -= FRAC_PI_2;
    }
    if rotate != 0.0 {
        if rotate > FRAC_PI_2 {
            rotate -= PI;
        } else if rotate < -FRAC_PI_2 {
            rotate += PI;
        }
    }
    rotate
}

/// Alignment: emitted labels read left/right off the half-plane; transposed
/// radial charts split four ways on angle and offset sign about the center.
pub(crate) fn label_align(item: &LabelItem, coord: &dyn Coordinate) -> TextAlign {
    if item.label_emit {
        if item.angle <= FRAC_PI_2 && item.angle > -FRAC_PI_2 {
            TextAlign::Left
        } else {
            TextAlign::Right
        }
    } else if !coord.is_transposed() {
        TextAlign::Center
    } else {
        let center = coord.center();
        let offset = base::default_offset(item.offset, coord);
        if (item.x - center.x).abs() < 1.0 {
            TextAlign::Center
        } else if item.angle > PI || item.angle <= 0.0 {
            if offset > 0.0 {
                TextAlign::Left
            } else {
                TextAlign::Right
            }
        } else if offset > 0.0 {
            TextAlign::Right
        } else {
            TextAlign::Left
        }
    }
}
