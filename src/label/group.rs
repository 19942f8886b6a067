//! Persistent label scene state.
//!
//! Label shapes live in an arena of optional slots aligned with item
//! ordinals, reconciled by an explicit create/update/remove diff each render.
//! Leader lines churn with label visibility rather than datum identity, so
//! they are cleared and rebuilt every pass instead of reconciled.

use crate::config::{AdjustConfig, AdjustType, LinePathSource};
use crate::ir::Point;
use crate::scene::{Group, PathCommand, Shape, ShapeAttrs, ShapeKind};

use super::adjust;
use super::LabelItem;

const LINE_GROUP_NAME: &str = "label-line";
const DEFAULT_LINE_STROKE: &str = "#000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReconcileOp {
    Create(usize),
    Update(usize),
    Remove(usize),
}

pub struct LabelsGroup {
    /// Label shapes by item ordinal; `None` slots are suppressed items.
    slots: Vec<Option<Shape>>,
    lines: Group,
}

impl Default for LabelsGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelsGroup {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            lines: Group::new(LINE_GROUP_NAME),
        }
    }

    /// One reconciliation pass: diff against the previous render, run the
    /// configured adjustment over the surviving shapes, rebuild leader lines.
    pub fn render(
        &mut self,
        items: &[Option<LabelItem>],
        marks: &[Shape],
        adjust_type: Option<AdjustType>,
        config: &AdjustConfig,
    ) {
        let ops = self.diff(items);
        if self.slots.len() < items.len() {
            self.slots.resize_with(items.len(), || None);
        }
        for op in ops {
            match op {
                ReconcileOp::Update(index) => {
                    if let (Some(Some(shape)), Some(Some(item))) =
                        (self.slots.get_mut(index), items.get(index))
                    {
                        update_label(shape, item);
                    }
                }
                ReconcileOp::Create(index) => {
                    if let Some(Some(item)) = items.get(index) {
                        self.slots[index] = Some(create_label(item));
                    }
                }
                ReconcileOp::Remove(index) => {
                    self.slots[index] = None;
                }
            }
        }
        self.slots.truncate(items.len());

        if let Some(kind) = adjust_type {
            let mut labels: Vec<&mut Shape> = self.slots.iter_mut().flatten().collect();
            adjust::resolve(kind, &mut labels, marks, config);
        }

        self.draw_lines(items);
    }

    fn diff(&self, items: &[Option<LabelItem>]) -> Vec<ReconcileOp> {
        let span = items.len().max(self.slots.len());
        let mut ops = Vec::with_capacity(span);
        for index in 0..span {
            let has_shape = self.slots.get(index).is_some_and(Option::is_some);
            let has_item = items.get(index).is_some_and(Option::is_some);
            match (has_shape, has_item) {
                (true, true) => ops.push(ReconcileOp::Update(index)),
                (false, true) => ops.push(ReconcileOp::Create(index)),
                (true, false) => ops.push(ReconcileOp::Remove(index)),
                (false, false) => {}
            }
        }
        ops
    }

    fn draw_lines(&mut self, items: &[Option<LabelItem>]) {
        if self.lines.is_destroyed() {
            self.lines = Group::new(LINE_GROUP_NAME);
        } else {
            self.lines.clear();
        }
        for item in items.iter().flatten() {
            line_to_label(&mut self.lines, item);
        }
    }

    /// Live label shapes in item order.
    pub fn labels(&self) -> impl Iterator<Item = &Shape> {
        self.slots.iter().flatten()
    }

    pub fn label_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Slot view, holes included, for callers that need item-aligned access.
    pub fn slots(&self) -> &[Option<Shape>] {
        &self.slots
    }

    pub fn lines(&self) -> &Group {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.lines.clear();
    }

    pub fn destroy(&mut self) {
        self.slots.clear();
        self.lines.destroy();
    }
}

/// Always refresh the text; skip the matrix/attr rewrite when the position
/// is unchanged so unmoved labels keep their transform untouched.
fn update_label(shape: &mut Shape, item: &LabelItem) {
    if shape.x() != item.x || shape.y() != item.y {
        shape.reset_matrix();
        shape.attrs = label_attrs(item);
        if let Some(rotate) = item.rotate {
            shape.rotate_at_anchor(rotate);
        }
        shape.visible = true;
    } else {
        shape.attrs.text = Some(item.content.clone());
    }
}

fn create_label(item: &LabelItem) -> Shape {
    let mut shape = Shape::new(ShapeKind::Text, label_attrs(item));
    if let Some(rotate) = item.rotate {
        shape.rotate_at_anchor(rotate);
    }
    shape.origin = Some(item.origin.clone());
    shape
}

fn label_attrs(item: &LabelItem) -> ShapeAttrs {
    ShapeAttrs {
        x: item.x,
        y: item.y,
        text: Some(item.content.clone()),
        text_align: item.text_align,
        font_size: item.style.font_size,
        font_family: item.style.font_family.clone(),
        fill: item.style.fill.clone(),
        stroke: item.style.stroke.clone(),
        line_width: item.style.line_width,
        ..ShapeAttrs::default()
    }
}

fn line_to_label(lines: &mut Group, item: &LabelItem) {
    let Some(line) = &item.label_line else {
        return;
    };
    let path = match &line.path {
        Some(LinePathSource::Commands(commands)) => commands.clone(),
        Some(LinePathSource::Fn(callback)) => callback(item),
        None => vec![
            PathCommand::MoveTo(item.start),
            PathCommand::LineTo(Point::new(item.x, item.y)),
        ],
    };
    let fallback = item
        .color
        .clone()
        .or_else(|| item.style.fill.clone())
        .unwrap_or_else(|| DEFAULT_LINE_STROKE.to_string());
    let stroke = line.style.stroke.clone().unwrap_or(fallback);
    let attrs = ShapeAttrs {
        path: Some(path),
        stroke: Some(stroke),
        line_width: line.style.line_width,
        line_dash: line.style.line_dash.clone(),
        ..ShapeAttrs::default()
    };
    let shape = lines.add_shape(ShapeKind::Path, attrs);
    shape.capture = false;
}
