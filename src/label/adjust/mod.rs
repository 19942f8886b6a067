//! Post-placement overlap resolution.
//!
//! Strategies mutate label shape positions in place and never touch marks.
//! Each is idempotent on unchanged input and terminates via the explicit
//! caps in [`AdjustConfig`]. Labels that cannot be resolved within their
//! displacement bound are hidden rather than left overlapping.

mod bbox;
mod position;
mod spiral;

use crate::config::{AdjustConfig, AdjustType};
use crate::scene::Shape;

/// Run the selected strategy over the current label shapes.
pub fn resolve(kind: AdjustType, labels: &mut [&mut Shape], marks: &[Shape], config: &AdjustConfig) {
    match kind {
        AdjustType::Scatter => position::adjust(labels, &config.position),
        AdjustType::Map => spiral::adjust(labels, &config.spiral),
        AdjustType::Treemap => bbox::adjust(labels, marks, &config.bbox),
    }
}
