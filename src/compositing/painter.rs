//! Back-to-front painting of per-object depths into a single-channel canvas.

use std::cmp::Ordering;
use ndarray::{s, Array2};
use crate::common::{CoordBox, DepthConvention};

/// A box region filled with one normalized depth value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthPatch {
    /// Slot index of the object in its layout, also the tie-break key.
    pub index: usize,
    pub depth: f32,
    pub bbox: CoordBox,
}

impl DepthPatch {
    pub fn new(index: usize, depth: f32, bbox: CoordBox) -> Self {
        Self { index, depth, bbox }
    }
}

/// Farthest first: compares `a` and `b` so that the one painted later sorts after.
fn far_to_near(a: &DepthPatch, b: &DepthPatch, convention: DepthConvention) -> Ordering {
    let by_depth = match convention {
        DepthConvention::NearerHigher => a.depth.total_cmp(&b.depth),
        DepthConvention::NearerLower => b.depth.total_cmp(&a.depth),
    };
    by_depth.then(a.index.cmp(&b.index))
}

/// Slot indices of the non-empty patches in the order they are painted.
///
/// Equal depths paint in ascending slot index, so the order does not depend
/// on how `patches` is arranged.
pub fn paint_order(patches: &[DepthPatch], convention: DepthConvention) -> Vec<usize> {
    sorted_patches(patches, convention)
        .into_iter()
        .map(|p| p.index)
        .collect()
}

fn sorted_patches(patches: &[DepthPatch], convention: DepthConvention) -> Vec<&DepthPatch> {
    let mut sorted: Vec<&DepthPatch> = patches.iter().filter(|p| !p.bbox.is_empty()).collect();
    sorted.sort_by(|a, b| far_to_near(a, b, convention));
    sorted
}

/// Fills each patch's box on `canvas`, later patches overwriting earlier ones.
///
/// Boxes are clipped to the canvas; empty ones are skipped.
pub fn paint<'a>(canvas: &mut Array2<f32>, patches: impl IntoIterator<Item = &'a DepthPatch>) {
    let (height, width) = canvas.dim();
    for patch in patches {
        let b = patch.bbox.clip(height, width);
        if b.is_empty() {
            continue;
        }
        canvas
            .slice_mut(s![b.y_min..b.y_max, b.x_min..b.x_max])
            .fill(patch.depth);
    }
}

/// Composites `patches` onto a zeroed `(height, width)` canvas, nearest object on top.
///
/// Returns the canvas and the paint order (slot indices).
pub fn composite(
    patches: &[DepthPatch],
    convention: DepthConvention,
    shape: (usize, usize),
) -> (Array2<f32>, Vec<usize>) {
    let sorted = sorted_patches(patches, convention);

    let mut canvas = Array2::<f32>::zeros(shape);
    paint(&mut canvas, sorted.iter().copied());

    let order = sorted.iter().map(|p| p.index).collect();
    (canvas, order)
}
