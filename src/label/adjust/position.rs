//! Positional nudging for scatter-like charts.
//!
//! Labels sharing an x-column are swept top-to-bottom so their boxes keep a
//! minimum vertical gap. A label that would need more than the configured
//! displacement is hidden: a partial move would leave residual overlap that
//! accumulates on repeated invocations.

use std::cmp::Ordering;

use crate::config::PositionAdjustCfg;
use crate::log::debug;
use crate::scene::Shape;

pub(crate) fn adjust(labels: &mut [&mut Shape], cfg: &PositionAdjustCfg) {
    let mut order: Vec<usize> = (0..labels.len()).filter(|&i| labels[i].visible).collect();
    order.sort_by(|&a, &b| {
        labels[a]
            .x()
            .partial_cmp(&labels[b].x())
            .unwrap_or(Ordering::Equal)
    });

    let mut start = 0;
    while start < order.len() {
        let column_x = labels[order[start]].x();
        let mut end = start;
        while end < order.len() && (labels[order[end]].x() - column_x).abs() <= cfg.column_width {
            end += 1;
        }
        let mut column: Vec<usize> = order[start..end].to_vec();
        column.sort_by(|&a, &b| {
            labels[a]
                .y()
                .partial_cmp(&labels[b].y())
                .unwrap_or(Ordering::Equal)
        });
        sweep_column(labels, &column, cfg);
        start = end;
    }
}

fn sweep_column(labels: &mut [&mut Shape], column: &[usize], cfg: &PositionAdjustCfg) {
    let mut next_free = f32::NEG_INFINITY;
    for &index in column {
        let bbox = labels[index].bbox();
        if bbox.y < next_free {
            let displacement = next_free - bbox.y;
            if displacement > cfg.max_displacement {
                debug!(displacement, "column displacement over cap; hiding label");
                labels[index].visible = false;
                continue;
            }
            labels[index].translate(0.0, displacement);
            next_free = bbox.y + displacement + bbox.height + cfg.min_gap;
        } else {
            next_free = bbox.max_y() + cfg.min_gap;
        }
    }
}
