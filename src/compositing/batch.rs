use ndarray::{stack, Array3, ArrayView2, Axis};
use rayon::prelude::*;
use crate::common::{BatchPolicy, Layout, LayoutError};
use crate::compositing::{DepthCompositor, DepthLayout};
use crate::data::{DepthStore, TimeCalc};
use crate::Result;

/// Composites every layout independently, in parallel across layouts.
///
/// Results keep the order of `layouts`; one failing sample does not affect the others.
pub fn composite_batch<S>(compositor: &DepthCompositor, store: &S, layouts: &[Layout]) -> Vec<Result<DepthLayout>>
where
    S: DepthStore + Sync + ?Sized,
{
    layouts
        .par_iter()
        .map(|layout| compositor.composite_with_store(store, layout))
        .collect()
}

/// Sequential [`composite_batch`] that records per-stage timings into `timer`.
pub fn composite_batch_timed<S>(
    compositor: &DepthCompositor,
    store: &S,
    layouts: &[Layout],
    timer: &mut TimeCalc,
) -> Vec<Result<DepthLayout>>
where
    S: DepthStore + ?Sized,
{
    layouts
        .iter()
        .map(|layout| compositor.composite_timed(store, layout, timer))
        .collect()
}

/// Applies `policy` to per-sample results.
///
/// `SkipAndLog` keeps the successful `(sample index, layout)` pairs and logs the
/// rest; `Abort` returns the first error.
pub fn collect_batch(
    results: Vec<Result<DepthLayout>>,
    policy: BatchPolicy,
) -> Result<Vec<(usize, DepthLayout)>> {
    let mut ok = Vec::with_capacity(results.len());
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(layout) => ok.push((i, layout)),
            Err(err) => match policy {
                BatchPolicy::SkipAndLog => log::warn!("Skipping sample {}: {}", i, err),
                BatchPolicy::Abort => return Err(err),
            },
        }
    }
    Ok(ok)
}

/// Stacks canvases into one `(N, H, W)` array.
pub fn stack_layouts(layouts: &[DepthLayout]) -> Result<Array3<f32>> {
    let Some(first) = layouts.first() else {
        return Ok(Array3::zeros((0, 0, 0)));
    };

    let expected = first.shape();
    if let Some(bad) = layouts.iter().find(|l| l.shape() != expected) {
        return Err(LayoutError::ShapeMismatch {
            expected,
            found: bad.shape(),
        });
    }

    let views: Vec<ArrayView2<'_, f32>> = layouts.iter().map(|l| l.canvas.view()).collect();
    stack(Axis(0), &views).map_err(|_| LayoutError::ShapeMismatch {
        expected,
        found: expected,
    })
}
