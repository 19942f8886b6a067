//! Named-position overrides for bar-like marks.
//!
//! Half extents come from two opposite corner vertices of the mark; only the
//! axis orthogonal to transposition shifts, so the label stays anchored along
//! the mark's main axis.

use crate::config::LabelPosition;
use crate::coord::Coordinate;
use crate::ir::MappedDatum;
use crate::scene::TextAlign;

use super::LabelItem;

pub(crate) fn set_label_position(
    item: &mut LabelItem,
    datum: &MappedDatum,
    position: LabelPosition,
    coord: &dyn Coordinate,
) {
    let Some(points) = datum.points.as_ref() else {
        return;
    };
    if points.len() < 3 {
        return;
    }
    let transposed = coord.is_transposed();
    let point0 = coord.convert_point(points[0]);
    let point1 = coord.convert_point(points[2]);
    let sign = if transposed { -1.0 } else { 1.0 };
    let width = (point0.x - point1.x) / 2.0 * sign;
    let height = (point0.y - point1.y) / 2.0 * sign;

    match position {
        LabelPosition::Right => {
            item.x -= width;
            item.y += height;
            let align = if transposed {
                TextAlign::Center
            } else {
                TextAlign::Left
            };
            item.text_align.get_or_insert(align);
        }
        LabelPosition::Left => {
            if transposed {
                item.x -= width;
                item.y -= height;
                item.text_align.get_or_insert(TextAlign::Center);
            } else {
                item.x += width;
                item.y += height;
                item.text_align.get_or_insert(TextAlign::Right);
            }
        }
        LabelPosition::Bottom => {
            if transposed {
                item.x -= width * 2.0;
                item.text_align.get_or_insert(TextAlign::Left);
            } else {
                item.y += height * 2.0;
                item.text_align.get_or_insert(TextAlign::Center);
            }
        }
        LabelPosition::Middle => {
            if transposed {
                item.x -= width;
            } else {
                item.y += height;
            }
            item.text_align.get_or_insert(TextAlign::Center);
        }
        LabelPosition::Top => {
            let align = if transposed {
                TextAlign::Left
            } else {
                TextAlign::Center
            };
            item.text_align.get_or_insert(align);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelLineCfg;
    use crate::coord::Cartesian;
    use crate::ir::{Datum, DimValue, Point};
    use crate::theme::TextStyle;

    fn item_at(x: f32, y: f32) -> LabelItem {
        LabelItem {
            content: "v".to_string(),
            x,
            y,
            start: Point::default(),
            text_align: None,
            rotate: None,
            angle: 0.0,
            color: None,
            offset: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            label_emit: false,
            label_line: Option::<LabelLineCfg>::None,
            style: TextStyle::default(),
            origin: Datum::new(),
        }
    }

    /// A bar spanning x in [90, 110] and y in [100, 140]; corner vertices in
    /// the order the interval shape emits them (bottom-left first, clockwise).
    fn bar_datum() -> MappedDatum {
        let mut datum = MappedDatum::new(DimValue::Single(100.0), DimValue::Single(100.0));
        datum.points = Some(vec![
            Point::new(90.0, 140.0),
            Point::new(90.0, 100.0),
            Point::new(110.0, 100.0),
            Point::new(110.0, 140.0),
        ]);
        datum
    }

    fn identity_coord() -> Cartesian {
        // Canvas-space vertices pass through untouched for these tests.
        Cartesian::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0))
    }

    #[test]
    fn middle_shifts_half_height_into_the_bar() {
        let coord = identity_coord();
        let datum = bar_datum();
        let mut item = item_at(100.0, 100.0);
        set_label_position(&mut item, &datum, LabelPosition::Middle, &coord);
        // width = (90-110)/2 = -10, height = (140-100)/2 = 20
        assert_eq!(item.y, 120.0, "middle sits at the bar's vertical center");
        assert_eq!(item.text_align, Some(TextAlign::Center));
    }

    #[test]
    fn bottom_shifts_full_height() {
        let coord = identity_coord();
        let datum = bar_datum();
        let mut item = item_at(100.0, 100.0);
        set_label_position(&mut item, &datum, LabelPosition::Bottom, &coord);
        assert_eq!(item.y, 140.0);
        assert_eq!(item.text_align, Some(TextAlign::Center));
    }

    #[test]
    fn top_only_sets_alignment() {
        let coord = identity_coord();
        let datum = bar_datum();
        let mut item = item_at(100.0, 100.0);
        set_label_position(&mut item, &datum, LabelPosition::Top, &coord);
        assert_eq!((item.x, item.y), (100.0, 100.0));
        assert_eq!(item.text_align, Some(TextAlign::Center));
    }

    #[test]
    fn right_moves_across_and_down() {
        let coord = identity_coord();
        let datum = bar_datum();
        let mut item = item_at(100.0, 100.0);
        set_label_position(&mut item, &datum, LabelPosition::Right, &coord);
        assert_eq!((item.x, item.y), (110.0, 120.0));
        assert_eq!(item.text_align, Some(TextAlign::Left));
    }

    #[test]
    fn transposed_bottom_moves_along_x() {
        let coord = identity_coord().transposed(true);
        let datum = bar_datum();
        let mut item = item_at(100.0, 100.0);
        set_label_position(&mut item, &datum, LabelPosition::Bottom, &coord);
        // Transposition negates the half extents and shifts x instead of y:
        // width = (90 - 110) / 2 * -1 = 10, so x moves back by 20.
        assert_eq!((item.x, item.y), (80.0, 100.0));
        assert_eq!(item.text_align, Some(TextAlign::Left));
    }

    #[test]
    fn missing_points_leave_the_anchor_untouched() {
        let coord = identity_coord();
        let datum = MappedDatum::new(DimValue::Single(5.0), DimValue::Single(6.0));
        let mut item = item_at(5.0, 6.0);
        set_label_position(&mut item, &datum, LabelPosition::Middle, &coord);
        assert_eq!((item.x, item.y), (5.0, 6.0));
    }

    #[test]
    fn configured_alignment_wins_over_position_default() {
        let coord = identity_coord();
        let datum = bar_datum();
        let mut item = item_at(100.0, 100.0);
        item.text_align = Some(TextAlign::Right);
        set_label_position(&mut item, &datum, LabelPosition::Right, &coord);
        assert_eq!(item.text_align, Some(TextAlign::Right));
    }
}
