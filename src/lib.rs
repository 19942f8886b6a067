pub mod config;
pub mod coord;
pub mod ir;
pub mod label;
pub mod log;
pub mod scale;
pub mod scene;
pub mod text_metrics;
pub mod theme;

pub use config::{AdjustConfig, AdjustType, Config, ConfigError, LabelCfg, LabelOption};
pub use coord::{Cartesian, CoordKind, Coordinate, Polar};
pub use ir::{Datum, DimValue, GeometryKind, MappedDatum, MarkShape, Point};
pub use label::{
    GeometryContext, LabelController, LabelItem, LabelRegistry, LabelVariant, LabelsGroup,
};
pub use scale::{Scale, TextScale};
pub use scene::{BBox, Group, Shape, ShapeAttrs, ShapeKind, TextAlign};
pub use theme::{LabelTheme, TextStyle, Theme};
