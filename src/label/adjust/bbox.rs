//! Bounding-box separation for treemap-like charts.
//!
//! Every label is confined to its index-aligned mark: clamped inside the
//! mark's box with a padding margin, hidden outright when it cannot fit.
//! Labels without a paired mark (multi-content expansion can outnumber the
//! marks) are left untouched.

use crate::config::BboxAdjustCfg;
use crate::log::debug;
use crate::scene::Shape;

pub(crate) fn adjust(labels: &mut [&mut Shape], marks: &[Shape], cfg: &BboxAdjustCfg) {
    for (label, mark) in labels.iter_mut().zip(marks.iter()) {
        if !label.visible {
            continue;
        }
        let label_box = label.bbox();
        let region = mark.bbox();
        let pad = cfg.padding;
        if label_box.width + pad * 2.0 > region.width
            || label_box.height + pad * 2.0 > region.height
        {
            debug!("label larger than its mark; hiding");
            label.visible = false;
            continue;
        }

        let mut dx = 0.0;
        if label_box.x < region.x + pad {
            dx = region.x + pad - label_box.x;
        } else if label_box.max_x() > region.max_x() - pad {
            dx = region.max_x() - pad - label_box.max_x();
        }
        let mut dy = 0.0;
        if label_box.y < region.y + pad {
            dy = region.y + pad - label_box.y;
        } else if label_box.max_y() > region.max_y() - pad {
            dy = region.max_y() - pad - label_box.max_y();
        }
        if dx != 0.0 || dy != 0.0 {
            label.translate(dx, dy);
        }
    }
}
