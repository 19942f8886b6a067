//! Spiral relocation for map-like charts.
//!
//! Greedy in sequence order: the first label claims its spot, later labels
//! whose boxes collide with a committed box walk an Archimedean spiral
//! around their anchor until a free position turns up. Past the radius cap
//! the label hides rather than overlap.

use std::f32::consts::TAU;

use crate::config::SpiralAdjustCfg;
use crate::log::debug;
use crate::scene::{BBox, Shape};

pub(crate) fn adjust(labels: &mut [&mut Shape], cfg: &SpiralAdjustCfg) {
    let mut occupied: Vec<BBox> = Vec::new();
    for label in labels.iter_mut() {
        if !label.visible {
            continue;
        }
        let bbox = label.bbox();
        if !collides(&occupied, &bbox, cfg.padding) {
            occupied.push(bbox);
            continue;
        }

        let anchor = (label.x(), label.y());
        let mut theta = 0.0f32;
        let mut placed = false;
        for _ in 0..cfg.max_iterations {
            theta += cfg.angle_step;
            let radius = cfg.radius_growth * theta / TAU;
            if radius > cfg.max_radius {
                break;
            }
            let dx = radius * theta.cos();
            let dy = radius * theta.sin();
            let candidate = bbox.translated(dx, dy);
            if !collides(&occupied, &candidate, cfg.padding) {
                label.set_position(anchor.0 + dx, anchor.1 + dy);
                occupied.push(candidate);
                placed = true;
                break;
            }
        }
        if !placed {
            debug!("spiral search exhausted; hiding label");
            label.visible = false;
        }
    }
}

fn collides(occupied: &[BBox], bbox: &BBox, padding: f32) -> bool {
    let inflated = bbox.inflated(padding);
    occupied.iter().any(|other| inflated.intersects(other))
}
