use serde::{Deserialize, Serialize};

/// Original source record a mapped datum was produced from. Field values keep
/// the dynamic typing of the input table.
pub type Datum = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A mapped dimension value: a single canvas coordinate, or several when one
/// record expands to multiple stacked/multi-series points.
#[derive(Debug, Clone, PartialEq)]
pub enum DimValue {
    Single(f32),
    Multi(Vec<f32>),
}

impl DimValue {
    pub fn is_multi(&self) -> bool {
        matches!(self, DimValue::Multi(_))
    }

    pub fn len(&self) -> usize {
        match self {
            DimValue::Single(_) => 1,
            DimValue::Multi(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DimValue::Multi(values) if values.is_empty())
    }

    /// Value at `index`, falling back to the last element when the index runs
    /// past the end, and to 0 when there are no values at all.
    pub fn get(&self, index: usize) -> f32 {
        match self {
            DimValue::Single(value) => *value,
            DimValue::Multi(values) => values
                .get(index)
                .or_else(|| values.last())
                .copied()
                .unwrap_or(0.0),
        }
    }

    pub fn last(&self) -> f32 {
        match self {
            DimValue::Single(value) => *value,
            DimValue::Multi(values) => values.last().copied().unwrap_or(0.0),
        }
    }

    pub fn mean(&self) -> f32 {
        match self {
            DimValue::Single(value) => *value,
            DimValue::Multi(values) => {
                if values.is_empty() {
                    0.0
                } else {
                    values.iter().sum::<f32>() / values.len() as f32
                }
            }
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        match self {
            DimValue::Single(own) => *own == value,
            DimValue::Multi(values) => values.contains(&value),
        }
    }
}

impl From<f32> for DimValue {
    fn from(value: f32) -> Self {
        DimValue::Single(value)
    }
}

impl From<Vec<f32>> for DimValue {
    fn from(values: Vec<f32>) -> Self {
        DimValue::Multi(values)
    }
}

/// Geometry types the variant lookup recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Interval,
    Polygon,
    Line,
    Point,
    Path,
    Area,
    Schema,
    Edge,
    Heatmap,
}

/// Shape kind of a drawn mark. Only funnel and pyramid change label
/// placement; the rest are carried through for style decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkShape {
    #[default]
    Rect,
    Circle,
    Funnel,
    Pyramid,
    Smooth,
    Hollow,
}

impl MarkShape {
    pub fn is_tapered(self) -> bool {
        matches!(self, MarkShape::Funnel | MarkShape::Pyramid)
    }
}

/// The rendering-space projection of one source record, produced by the
/// geometry-mapping stage. Read-only to the label pipeline.
#[derive(Debug, Clone)]
pub struct MappedDatum {
    pub x: DimValue,
    pub y: DimValue,
    pub color: Option<String>,
    pub shape: MarkShape,
    /// Vertices of the mark outline (bars, polygons, funnel slices).
    pub points: Option<Vec<Point>>,
    /// Vertices of the adjacent mark, used for funnel/pyramid leader anchors.
    pub next_points: Option<Vec<Point>>,
    pub origin: Datum,
}

impl MappedDatum {
    pub fn new(x: impl Into<DimValue>, y: impl Into<DimValue>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            color: None,
            shape: MarkShape::default(),
            points: None,
            next_points: None,
            origin: Datum::new(),
        }
    }
}
