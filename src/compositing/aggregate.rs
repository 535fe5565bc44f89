use ndarray::{s, ArrayView2};
use serde::Serialize;
use crate::common::SizeBox;

/// Depth scalar of one layout object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectDepth {
    /// Slot index of the object in its layout.
    pub index: usize,
    pub depth: f32,
    /// Set for objects with nothing to crop; they are never painted.
    pub excluded: bool,
}

impl ObjectDepth {
    pub fn new(index: usize, depth: f32) -> Self {
        Self {
            index,
            depth,
            excluded: false,
        }
    }

    pub fn excluded(index: usize) -> Self {
        Self {
            index,
            depth: 0.,
            excluded: true,
        }
    }
}

/// Mean of `depth` over the box, `None` if the box covers no pixel of the map.
pub fn crop_mean(depth: ArrayView2<'_, f32>, bbox: &SizeBox) -> Option<f32> {
    let (height, width) = depth.dim();
    let x0 = bbox.x.min(width);
    let y0 = bbox.y.min(height);
    let x1 = (bbox.x + bbox.width).min(width);
    let y1 = (bbox.y + bbox.height).min(height);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    depth.slice(s![y0..y1, x0..x1]).mean()
}

/// One depth scalar per `(slot index, box)`, the mean of the map inside the box.
///
/// Empty boxes and crops with a non-finite mean come back excluded with depth 0.
pub fn aggregate_depths(depth: ArrayView2<'_, f32>, boxes: &[(usize, SizeBox)]) -> Vec<ObjectDepth> {
    boxes
        .iter()
        .map(|&(index, bbox)| match crop_mean(depth, &bbox) {
            Some(d) if d.is_finite() => ObjectDepth::new(index, d),
            Some(d) => {
                log::warn!("Object {} has non-finite mean depth {}, excluding it", index, d);
                ObjectDepth::excluded(index)
            }
            None => {
                log::debug!("Object {} has an empty box {:?}, excluding it", index, bbox);
                ObjectDepth::excluded(index)
            }
        })
        .collect()
}
