use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ir::{Datum, MappedDatum};
use crate::label::LabelItem;
use crate::scene::PathCommand;
use crate::theme::{TextStyle, Theme};

/// Post-placement overlap-resolution strategy keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustType {
    Scatter,
    Map,
    Treemap,
}

impl AdjustType {
    /// Parse a strategy key. Unrecognized keys silently disable adjustment.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "scatter" => Some(AdjustType::Scatter),
            "map" => Some(AdjustType::Map),
            "treemap" => Some(AdjustType::Treemap),
            _ => None,
        }
    }
}

/// Named label positions relative to a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Top,
    Bottom,
    Left,
    Right,
    Middle,
}

/// Label text for one datum: one string, or one string per sub-item.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Single(String),
    Multi(Vec<String>),
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Single(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Single(text)
    }
}

impl From<Vec<String>> for Content {
    fn from(texts: Vec<String>) -> Self {
        Content::Multi(texts)
    }
}

pub type ContentFn = Box<dyn Fn(&Datum, &MappedDatum, usize) -> Option<Content>>;
pub type PositionFn = Box<dyn Fn(&Datum, &MappedDatum, usize) -> Option<LabelPosition>>;
pub type LinePathFn = Rc<dyn Fn(&LabelItem) -> Vec<PathCommand>>;

/// Per-datum config produced by a label callback. Returning `None` suppresses
/// the datum's label entirely.
pub type LabelCallback = Box<dyn Fn(&[serde_json::Value]) -> Option<LabelCfg>>;

pub enum ContentSource {
    Value(Content),
    Fn(ContentFn),
}

impl From<Content> for ContentSource {
    fn from(content: Content) -> Self {
        ContentSource::Value(content)
    }
}

impl From<&str> for ContentSource {
    fn from(text: &str) -> Self {
        ContentSource::Value(Content::from(text))
    }
}

impl From<String> for ContentSource {
    fn from(text: String) -> Self {
        ContentSource::Value(Content::from(text))
    }
}

impl From<Vec<String>> for ContentSource {
    fn from(texts: Vec<String>) -> Self {
        ContentSource::Value(Content::from(texts))
    }
}

pub enum PositionSource {
    Keyword(LabelPosition),
    Fn(PositionFn),
}

impl From<LabelPosition> for PositionSource {
    fn from(position: LabelPosition) -> Self {
        PositionSource::Keyword(position)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub stroke: Option<String>,
    pub line_width: Option<f32>,
    pub line_dash: Option<Vec<f32>>,
}

/// Leader-line path override: fixed commands, or a callback over the item.
#[derive(Clone)]
pub enum LinePathSource {
    Commands(Vec<PathCommand>),
    Fn(LinePathFn),
}

/// Leader-line configuration. Absence (`label_line: None` on [`LabelCfg`])
/// disables the connector.
#[derive(Clone, Default)]
pub struct LabelLineCfg {
    pub style: LineStyle,
    pub path: Option<LinePathSource>,
}

/// Label configuration, either the static per-geometry config or a per-datum
/// override produced by a callback. Unset fields fall through to the static
/// config and then to the theme.
#[derive(Default)]
pub struct LabelCfg {
    /// Explicit positioner variant name; selection falls back to the
    /// coordinate/geometry lookup when unset.
    pub label_type: Option<String>,
    pub content: Option<ContentSource>,
    pub position: Option<PositionSource>,
    /// Signed label-to-mark distance; negative values place inside the mark.
    pub offset: Option<f32>,
    pub offset_x: Option<f32>,
    pub offset_y: Option<f32>,
    pub rotate: Option<f32>,
    pub auto_rotate: Option<bool>,
    /// Polar only: push the label radially outward from its arc.
    pub label_emit: Option<bool>,
    pub label_line: Option<LabelLineCfg>,
    pub adjust_type: Option<AdjustType>,
    pub style: TextStyle,
}

/// The label option attached to one geometry.
#[derive(Default)]
pub struct LabelOption {
    /// Fields whose scale-rendered values become the default content.
    pub fields: Vec<String>,
    pub callback: Option<LabelCallback>,
    pub cfg: LabelCfg,
}

/// Tunables for the positional (scatter) strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionAdjustCfg {
    /// Labels whose x differs by at most this much share a column.
    pub column_width: f32,
    /// Minimum vertical gap between label boxes in a column.
    pub min_gap: f32,
    /// Labels needing more displacement than this are hidden instead of
    /// partially moved.
    pub max_displacement: f32,
}

impl Default for PositionAdjustCfg {
    fn default() -> Self {
        Self {
            column_width: 1.0,
            min_gap: 2.0,
            max_displacement: 48.0,
        }
    }
}

/// Tunables for the spiral (map) strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralAdjustCfg {
    /// Angle advanced per spiral step, radians.
    pub angle_step: f32,
    /// Radius gained per full turn.
    pub radius_growth: f32,
    /// Give up (and hide the label) past this distance from the anchor.
    pub max_radius: f32,
    /// Clearance kept between committed label boxes.
    pub padding: f32,
    /// Hard cap on spiral steps per label.
    pub max_iterations: usize,
}

impl Default for SpiralAdjustCfg {
    fn default() -> Self {
        Self {
            angle_step: std::f32::consts::PI / 8.0,
            radius_growth: 8.0,
            max_radius: 64.0,
            padding: 1.0,
            max_iterations: 256,
        }
    }
}

/// Tunables for the bounding-box (treemap) strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BboxAdjustCfg {
    /// Clearance kept between a label and its mark's edges.
    pub padding: f32,
}

impl Default for BboxAdjustCfg {
    fn default() -> Self {
        Self { padding: 2.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustConfig {
    pub position: PositionAdjustCfg,
    pub spiral: SpiralAdjustCfg,
    pub bbox: BboxAdjustCfg,
}

/// File-loadable configuration: theme presets plus strategy tunables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub adjust: AdjustConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Load a JSON config file; `None` yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Config::from_json(&raw)
        }
        None => Ok(Config::default()),
    }
}
