use image::RgbImage;
use crate::common::DepthMap;
use crate::compositing::image_ops;
use crate::data::{DepthStore, NpyDepthStore};

/// Monocular depth estimation, RGB image to dense depth map.
pub trait DepthEstimator {
    fn estimate(&mut self, image: &RgbImage) -> anyhow::Result<DepthMap>;
}

impl<F> DepthEstimator for F
where
    F: FnMut(&RgbImage) -> anyhow::Result<DepthMap>,
{
    fn estimate(&mut self, image: &RgbImage) -> anyhow::Result<DepthMap> {
        self(image)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrecomputeSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Runs `estimator` once per `(filename, image)` and caches the results in `store`.
///
/// Predictions are resampled to the image's own resolution before saving.
/// Already cached filenames are skipped unless `overwrite` is set.
pub fn precompute_depths<E, I>(
    estimator: &mut E,
    store: &NpyDepthStore,
    images: I,
    overwrite: bool,
) -> anyhow::Result<PrecomputeSummary>
where
    E: DepthEstimator + ?Sized,
    I: IntoIterator<Item = (String, RgbImage)>,
{
    let mut summary = PrecomputeSummary::default();

    for (filename, image) in images {
        if !overwrite && store.contains(&filename) {
            log::debug!("Depth map for {} already cached", filename);
            summary.skipped += 1;
            continue;
        }

        let prediction = estimator.estimate(&image)?;
        let (height, width) = (image.height() as usize, image.width() as usize);
        let depth = if prediction.shape_hw() == (height, width) {
            prediction
        } else {
            DepthMap::from(image_ops::resize_depth(prediction.view(), height, width))
        };

        store.save(&filename, &depth)?;
        summary.written += 1;
    }

    log::info!(
        "Precomputed {} depth maps into {} ({} already cached)",
        summary.written,
        store.root().display(),
        summary.skipped
    );
    Ok(summary)
}
