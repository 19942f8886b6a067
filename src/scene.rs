//! Backend-neutral drawable state.
//!
//! Shapes carry the geometric and textual attributes a renderer needs and
//! nothing about how they become pixels. Groups are plain containers with a
//! group/leaf distinction so callers can walk the tree.

use serde::{Deserialize, Serialize};

use crate::ir::{Datum, Point};
use crate::text_metrics;

pub type Matrix = [[f32; 3]; 3];

pub const IDENTITY: Matrix = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

pub fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    let mut out = [[0.0f32; 3]; 3];
    for (row, out_row) in out.iter_mut().enumerate() {
        for (col, cell) in out_row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[row][k] * b[k][col]).sum();
        }
    }
    out
}

pub fn apply(matrix: &Matrix, x: f32, y: f32, z: f32) -> [f32; 3] {
    [
        matrix[0][0] * x + matrix[0][1] * y + matrix[0][2] * z,
        matrix[1][0] * x + matrix[1][1] * y + matrix[1][2] * z,
        matrix[2][0] * x + matrix[2][1] * y + matrix[2][2] * z,
    ]
}

/// Rotation by `radians` about the point `(x, y)`.
pub fn rotation_about(x: f32, y: f32, radians: f32) -> Matrix {
    let (sin, cos) = radians.sin_cos();
    [
        [cos, -sin, x - x * cos + y * sin],
        [sin, cos, y - x * sin - y * cos],
        [0.0, 0.0, 1.0],
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    pub fn overlap_area(&self, other: &BBox) -> f32 {
        let w = (self.max_x().min(other.max_x()) - self.x.max(other.x)).max(0.0);
        let h = (self.max_y().min(other.max_y()) - self.y.max(other.y)).max(0.0);
        w * h
    }

    pub fn inflated(&self, pad: f32) -> BBox {
        BBox::new(
            self.x - pad,
            self.y - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    pub fn translated(&self, dx: f32, dy: f32) -> BBox {
        BBox::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Text,
    Rect,
    Path,
}

/// Attribute bag shared by all shape kinds. Unused fields stay `None`; the
/// renderer decides what each kind consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeAttrs {
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub text: Option<String>,
    pub text_align: Option<TextAlign>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub line_width: Option<f32>,
    pub line_dash: Option<Vec<f32>>,
    pub path: Option<Vec<PathCommand>>,
}

const DEFAULT_FONT_SIZE: f32 = 12.0;

#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    pub attrs: ShapeAttrs,
    pub visible: bool,
    /// Whether the shape participates in event picking.
    pub capture: bool,
    /// Source record stashed on label shapes for event handlers.
    pub origin: Option<Datum>,
    matrix: Matrix,
}

impl Shape {
    pub fn new(kind: ShapeKind, attrs: ShapeAttrs) -> Self {
        Self {
            kind,
            attrs,
            visible: true,
            capture: true,
            origin: None,
            matrix: IDENTITY,
        }
    }

    pub fn x(&self) -> f32 {
        self.attrs.x
    }

    pub fn y(&self) -> f32 {
        self.attrs.y
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.attrs.x = x;
        self.attrs.y = y;
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.attrs.x += dx;
        self.attrs.y += dy;
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn has_transform(&self) -> bool {
        self.matrix != IDENTITY
    }

    pub fn reset_matrix(&mut self) {
        self.matrix = IDENTITY;
    }

    /// Rotate the shape about its own anchor point.
    pub fn rotate_at_anchor(&mut self, radians: f32) {
        let rotation = rotation_about(self.attrs.x, self.attrs.y, radians);
        self.matrix = multiply(&rotation, &self.matrix);
    }

    /// Axis-aligned bounds in canvas space, including any transform.
    pub fn bbox(&self) -> BBox {
        let local = self.local_bbox();
        if !self.has_transform() {
            return local;
        }
        let corners = [
            (local.x, local.y),
            (local.max_x(), local.y),
            (local.max_x(), local.max_y()),
            (local.x, local.max_y()),
        ];
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for (x, y) in corners {
            let mapped = apply(&self.matrix, x, y, 1.0);
            min_x = min_x.min(mapped[0]);
            min_y = min_y.min(mapped[1]);
            max_x = max_x.max(mapped[0]);
            max_y = max_y.max(mapped[1]);
        }
        BBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    fn local_bbox(&self) -> BBox {
        match self.kind {
            ShapeKind::Text => {
                let font_size = self.attrs.font_size.unwrap_or(DEFAULT_FONT_SIZE);
                let text = self.attrs.text.as_deref().unwrap_or("");
                let (width, height) =
                    text_metrics::text_size(text, font_size, self.attrs.font_family.as_deref());
                let x = match self.attrs.text_align.unwrap_or(TextAlign::Center) {
                    TextAlign::Left => self.attrs.x,
                    TextAlign::Center => self.attrs.x - width / 2.0,
                    TextAlign::Right => self.attrs.x - width,
                };
                // Baseline is treated as middle, matching how labels anchor.
                BBox::new(x, self.attrs.y - height / 2.0, width, height)
            }
            ShapeKind::Rect => BBox::new(
                self.attrs.x,
                self.attrs.y,
                self.attrs.width.unwrap_or(0.0),
                self.attrs.height.unwrap_or(0.0),
            ),
            ShapeKind::Path => {
                let mut min_x = f32::INFINITY;
                let mut min_y = f32::INFINITY;
                let mut max_x = f32::NEG_INFINITY;
                let mut max_y = f32::NEG_INFINITY;
                for command in self.attrs.path.iter().flatten() {
                    let point = match command {
                        PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p,
                        PathCommand::Close => continue,
                    };
                    min_x = min_x.min(point.x);
                    min_y = min_y.min(point.y);
                    max_x = max_x.max(point.x);
                    max_y = max_y.max(point.y);
                }
                if min_x.is_finite() {
                    BBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
                } else {
                    BBox::new(self.attrs.x, self.attrs.y, 0.0, 0.0)
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum SceneNode {
    Shape(Shape),
    Group(Group),
}

impl SceneNode {
    pub fn is_group(&self) -> bool {
        matches!(self, SceneNode::Group(_))
    }
}

#[derive(Debug, Default)]
pub struct Group {
    pub name: String,
    children: Vec<SceneNode>,
    destroyed: bool,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            destroyed: false,
        }
    }

    pub fn add_shape(&mut self, kind: ShapeKind, attrs: ShapeAttrs) -> &mut Shape {
        self.children.push(SceneNode::Shape(Shape::new(kind, attrs)));
        match self.children.last_mut() {
            Some(SceneNode::Shape(shape)) => shape,
            _ => unreachable!("just pushed a shape"),
        }
    }

    pub fn add_group(&mut self, name: impl Into<String>) -> &mut Group {
        self.children.push(SceneNode::Group(Group::new(name)));
        match self.children.last_mut() {
            Some(SceneNode::Group(group)) => group,
            _ => unreachable!("just pushed a group"),
        }
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Leaf shapes only, skipping nested groups.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.children.iter().filter_map(|child| match child {
            SceneNode::Shape(shape) => Some(shape),
            SceneNode::Group(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn destroy(&mut self) {
        self.children.clear();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_about_anchor_keeps_anchor_fixed() {
        let matrix = rotation_about(10.0, 20.0, std::f32::consts::FRAC_PI_2);
        let mapped = apply(&matrix, 10.0, 20.0, 1.0);
        assert!((mapped[0] - 10.0).abs() < 1e-4);
        assert!((mapped[1] - 20.0).abs() < 1e-4);
    }

    #[test]
    fn text_bbox_centers_on_anchor_for_center_align() {
        let attrs = ShapeAttrs {
            x: 100.0,
            y: 50.0,
            text: Some("hello".to_string()),
            text_align: Some(TextAlign::Center),
            ..ShapeAttrs::default()
        };
        let shape = Shape::new(ShapeKind::Text, attrs);
        let bbox = shape.bbox();
        let center_x = bbox.x + bbox.width / 2.0;
        assert!(
            (center_x - 100.0).abs() < 1e-3,
            "center-aligned text should straddle its anchor, got center {center_x}"
        );
        assert!(bbox.width > 0.0, "non-empty text must measure wider than 0");
    }

    #[test]
    fn text_bbox_extends_left_for_right_align() {
        let attrs = ShapeAttrs {
            x: 100.0,
            y: 50.0,
            text: Some("hello".to_string()),
            text_align: Some(TextAlign::Right),
            ..ShapeAttrs::default()
        };
        let shape = Shape::new(ShapeKind::Text, attrs);
        let bbox = shape.bbox();
        assert!((bbox.max_x() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn reset_matrix_restores_identity() {
        let mut shape = Shape::new(ShapeKind::Text, ShapeAttrs::default());
        shape.rotate_at_anchor(1.0);
        assert!(shape.has_transform());
        shape.reset_matrix();
        assert!(!shape.has_transform());
    }

    #[test]
    fn bbox_overlap_area_matches_hand_computation() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&b), 25.0);
        let c = BBox::new(20.0, 20.0, 4.0, 4.0);
        assert_eq!(a.overlap_area(&c), 0.0);
    }

    #[test]
    fn group_shapes_skips_nested_groups() {
        let mut group = Group::new("labels");
        group.add_shape(ShapeKind::Text, ShapeAttrs::default());
        group.add_group("nested");
        group.add_shape(ShapeKind::Path, ShapeAttrs::default());
        assert_eq!(group.shapes().count(), 2);
        assert_eq!(group.len(), 3);
    }
}
