//! Coordinate-system surface consumed by the positioners.
//!
//! The pipeline only ever talks to [`Coordinate`]; the two implementations
//! here cover the standard chart cases (rectangular and polar) and double as
//! the black box the positioners are tested against.

use crate::ir::Point;
use crate::scene::{self, Matrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordKind {
    Rect,
    Polar,
    /// Polar with the full circle mapped to the value dimension (pie charts).
    Theta,
}

pub trait Coordinate {
    fn kind(&self) -> CoordKind;

    fn is_transposed(&self) -> bool;

    fn center(&self) -> Point;

    /// Map a normalized data-space point into canvas space.
    fn convert(&self, point: Point) -> Point;

    /// Apply the coordinate's extra transform matrix to a vector. `z = 1`
    /// transforms a point, `z = 0` a direction (offsets stay translation-free).
    fn apply_matrix(&self, x: f32, y: f32, z: f32) -> [f32; 3];

    /// Alias used by positioners converting mark corner vertices.
    fn convert_point(&self, point: Point) -> Point {
        self.convert(point)
    }
}

/// Angle of `point` about the coordinate center, in `(-PI, PI]`.
pub fn point_angle(coord: &dyn Coordinate, point: Point) -> f32 {
    let center = coord.center();
    (point.y - center.y).atan2(point.x - center.x)
}

/// Distance of `point` from the coordinate center.
pub fn point_radius(coord: &dyn Coordinate, point: Point) -> f32 {
    let center = coord.center();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    (dx * dx + dy * dy).sqrt()
}

/// Rectangular coordinate over a canvas region. `start` is the origin corner
/// (bottom-left in screen space, so y runs upward in data space).
#[derive(Debug, Clone)]
pub struct Cartesian {
    pub start: Point,
    pub end: Point,
    pub transposed: bool,
    matrix: Option<Matrix>,
}

impl Cartesian {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            transposed: false,
            matrix: None,
        }
    }

    pub fn transposed(mut self, transposed: bool) -> Self {
        self.transposed = transposed;
        self
    }

    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = Some(matrix);
        self
    }
}

impl Coordinate for Cartesian {
    fn kind(&self) -> CoordKind {
        CoordKind::Rect
    }

    fn is_transposed(&self) -> bool {
        self.transposed
    }

    fn center(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    fn convert(&self, point: Point) -> Point {
        let (x, y) = if self.transposed {
            (point.y, point.x)
        } else {
            (point.x, point.y)
        };
        Point::new(
            self.start.x + x * (self.end.x - self.start.x),
            self.start.y + y * (self.end.y - self.start.y),
        )
    }

    fn apply_matrix(&self, x: f32, y: f32, z: f32) -> [f32; 3] {
        match &self.matrix {
            Some(matrix) => scene::apply(matrix, x, y, z),
            None => [x, y, z],
        }
    }
}

/// Polar coordinate about a center. Normalized x maps to angle, normalized y
/// to radius; transposition swaps the two (radial bar charts).
#[derive(Debug, Clone)]
pub struct Polar {
    pub center: Point,
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub transposed: bool,
    theta: bool,
    matrix: Option<Matrix>,
}

impl Polar {
    pub fn new(center: Point, radius: f32) -> Self {
        Self {
            center,
            radius,
            start_angle: -std::f32::consts::FRAC_PI_2,
            end_angle: std::f32::consts::PI * 1.5,
            transposed: false,
            theta: false,
            matrix: None,
        }
    }

    /// Mark this coordinate as a theta coordinate (pie charts: the value
    /// dimension sweeps the full circle).
    pub fn theta(mut self) -> Self {
        self.theta = true;
        self.transposed = true;
        self
    }

    pub fn transposed(mut self, transposed: bool) -> Self {
        self.transposed = transposed;
        self
    }

    pub fn with_angles(mut self, start: f32, end: f32) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = Some(matrix);
        self
    }
}

impl Coordinate for Polar {
    fn kind(&self) -> CoordKind {
        if self.theta {
            CoordKind::Theta
        } else {
            CoordKind::Polar
        }
    }

    fn is_transposed(&self) -> bool {
        self.transposed
    }

    fn center(&self) -> Point {
        self.center
    }

    fn convert(&self, point: Point) -> Point {
        let (angular, radial) = if self.transposed {
            (point.y, point.x)
        } else {
            (point.x, point.y)
        };
        let angle = self.start_angle + angular * (self.end_angle - self.start_angle);
        let radius = radial * self.radius;
        Point::new(
            self.center.x + radius * angle.cos(),
            self.center.y + radius * angle.sin(),
        )
    }

    fn apply_matrix(&self, x: f32, y: f32, z: f32) -> [f32; 3] {
        match &self.matrix {
            Some(matrix) => scene::apply(matrix, x, y, z),
            None => [x, y, z],
        }
    }
}
