use std::time::Instant;
use crate::common::{CompositorConfig, DepthMap};
use crate::compositing::{DepthLayout, ObjectDepth, PreparedLayout};
use crate::data::TimeCalc;
use crate::utils;
use crate::Result;

/// Stages of turning one layout and its depth map into a depth layout.
pub trait LayoutProcess: Sized {
    type Input;

    /// Creates the processor, rejecting configurations that cannot be run.
    fn new(config: CompositorConfig) -> Result<Self>;

    /// Orients the depth map, checks its shape and scales the boxes to pixels.
    fn preprocess<'a>(&self, x: &Self::Input, depth: &'a DepthMap) -> Result<PreparedLayout<'a>>;

    /// Reduces the depth map to one scalar per object.
    fn aggregate(&self, prepared: &PreparedLayout<'_>) -> Vec<ObjectDepth>;

    /// Normalizes the scalars and paints the canvas.
    fn postprocess(&self, x: &Self::Input, prepared: PreparedLayout<'_>, depths: Vec<ObjectDepth>) -> DepthLayout;

    fn profile(&self) -> bool {
        false
    }

    /// Executes the full pipeline.
    fn run(&self, x: &Self::Input, depth: &DepthMap) -> Result<DepthLayout> {
        let prepared = self.preprocess(x, depth)?;
        let depths = self.aggregate(&prepared);
        Ok(self.postprocess(x, prepared, depths))
    }

    /// Executes the full pipeline, recording stage timings into `timer` if given.
    fn forward(&self, x: &Self::Input, depth: &DepthMap, timer: Option<&mut TimeCalc>) -> Result<DepthLayout> {
        let start = Instant::now();

        let t_pre = Instant::now();
        let prepared = self.preprocess(x, depth)?;
        let t_pre = t_pre.elapsed();

        let mut elapsed = start.elapsed();
        elapsed = utils::trace(false, "TIME", "Preprocess", start, elapsed);

        let t_agg = Instant::now();
        let depths = self.aggregate(&prepared);
        let t_agg = t_agg.elapsed();

        elapsed = utils::trace(false, "TIME", "Aggregate", start, elapsed);

        let t_post = Instant::now();
        let layout = self.postprocess(x, prepared, depths);
        let t_post = t_post.elapsed();

        utils::trace(false, "TIME", "Composite", start, elapsed);

        if self.profile() {
            log::info!("> Preprocess: {t_pre:?} | Aggregate: {t_agg:?} | Composite: {t_post:?}");
        }

        if let Some(timer) = timer {
            timer.add_or_push(0, t_pre);
            timer.add_or_push(1, t_agg);
            timer.add_or_push(2, t_post);
        }

        Ok(layout)
    }
}
