//! The label-placement pipeline: variant selection, item building, overlap
//! resolution, and incremental scene maintenance.

pub mod adjust;
mod base;
mod group;
mod interval;
mod polar;

use std::collections::HashMap;

pub use group::LabelsGroup;

use crate::config::{AdjustConfig, LabelLineCfg, LabelOption};
use crate::coord::{CoordKind, Coordinate};
use crate::ir::{Datum, GeometryKind, MappedDatum, Point};
use crate::log::debug;
use crate::scale::Scale;
use crate::scene::{Group, Shape, TextAlign};
use crate::theme::{TextStyle, Theme};

/// Positioner variants. One implementation per geometry/coordinate
/// combination, selected once per render by the registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelVariant {
    Base,
    Interval,
    Polar,
}

/// Named variant mapping injected into the controller. Defaults cover the
/// stock names; charts with custom positioners add entries at construction
/// instead of registering process-wide.
pub struct LabelRegistry {
    entries: HashMap<String, LabelVariant>,
}

impl Default for LabelRegistry {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert("base".to_string(), LabelVariant::Base);
        entries.insert("interval".to_string(), LabelVariant::Interval);
        entries.insert("polar".to_string(), LabelVariant::Polar);
        // Pie labels ride the polar math; theta coordinates resolve here.
        entries.insert("pie".to_string(), LabelVariant::Polar);
        Self { entries }
    }
}

impl LabelRegistry {
    pub fn insert(&mut self, name: impl Into<String>, variant: LabelVariant) {
        self.entries.insert(name.into(), variant);
    }

    pub fn get(&self, name: &str) -> Option<LabelVariant> {
        self.entries.get(name).copied()
    }

    /// Resolve the variant for one render: an explicit label type wins,
    /// otherwise the coordinate and geometry types decide.
    pub fn select(
        &self,
        label_type: Option<&str>,
        coord: CoordKind,
        geometry: GeometryKind,
    ) -> LabelVariant {
        let mut key = label_type.unwrap_or("base");
        if key == "base" {
            key = match coord {
                CoordKind::Polar => "polar",
                CoordKind::Theta => "pie",
                CoordKind::Rect => match geometry {
                    GeometryKind::Interval | GeometryKind::Polygon => "interval",
                    _ => "base",
                },
            };
        }
        self.get(key).unwrap_or(LabelVariant::Base)
    }
}

/// The fully resolved, renderable unit for one label.
#[derive(Clone)]
pub struct LabelItem {
    pub content: String,
    pub x: f32,
    pub y: f32,
    /// Pre-offset canvas anchor on the mark; leader lines start here.
    pub start: Point,
    pub text_align: Option<TextAlign>,
    pub rotate: Option<f32>,
    /// Polar angle of the anchor; 0 for rectangular placements.
    pub angle: f32,
    pub color: Option<String>,
    /// Resolved configured offset (kept for alignment decisions).
    pub offset: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub label_emit: bool,
    pub label_line: Option<LabelLineCfg>,
    pub style: TextStyle,
    pub origin: Datum,
}

/// Everything the pipeline consumes from the owning geometry for one render.
pub struct GeometryContext<'a> {
    pub kind: GeometryKind,
    pub coordinate: &'a dyn Coordinate,
    pub theme: &'a Theme,
    pub label_option: &'a LabelOption,
    /// Scales resolved by the caller, aligned with `label_option.fields`.
    pub scales: &'a [Box<dyn Scale>],
}

/// Drives one label render pass per geometry update and owns the persistent
/// label scene state.
pub struct LabelController {
    registry: LabelRegistry,
    group: LabelsGroup,
}

impl Default for LabelController {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelController {
    pub fn new() -> Self {
        Self::with_registry(LabelRegistry::default())
    }

    pub fn with_registry(registry: LabelRegistry) -> Self {
        Self {
            registry,
            group: LabelsGroup::new(),
        }
    }

    /// One full render pass: build items, apply manual nudges, reconcile
    /// shapes, run the configured adjustment, redraw leader lines.
    pub fn render(
        &mut self,
        ctx: &GeometryContext<'_>,
        data: &[MappedDatum],
        marks: &[Shape],
        config: &AdjustConfig,
    ) {
        let variant = self.registry.select(
            ctx.label_option.cfg.label_type.as_deref(),
            ctx.coordinate.kind(),
            ctx.kind,
        );
        debug!(?variant, data = data.len(), "label render pass");
        let mut items = base::build_items(variant, ctx, data);
        base::apply_manual_offsets(&mut items);
        let adjust_type = ctx.label_option.cfg.adjust_type;
        self.group.render(&items, marks, adjust_type, config);
    }

    /// Live label shapes in item order.
    pub fn labels(&self) -> impl Iterator<Item = &Shape> {
        self.group.labels()
    }

    pub fn label_count(&self) -> usize {
        self.group.label_count()
    }

    pub fn lines(&self) -> &Group {
        self.group.lines()
    }

    pub fn group(&self) -> &LabelsGroup {
        &self.group
    }

    pub fn clear(&mut self) {
        self.group.clear();
    }

    pub fn destroy(&mut self) {
        self.group.destroy();
    }
}
