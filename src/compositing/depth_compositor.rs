use std::sync::Arc;
use image::GrayImage;
use ndarray::{Array2, ArrayView2};
use serde::Serialize;
use crate::common::{CompositorConfig, CoordBox, DepthConvention, DepthMap, Layout, LayoutError, SizeBox};
use crate::compositing::{aggregate_depths, composite, image_ops, normalize_objects, DepthPatch, LayoutProcess, ObjectDepth};
use crate::data::{DepthStore, TimeCalc};
use crate::Result;

/// A valid layout object scaled to the working resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreparedObject {
    pub index: usize,
    pub class_id: u32,
    pub size_box: SizeBox,
    pub coord_box: CoordBox,
}

/// Output of [`LayoutProcess::preprocess`]: the oriented depth map and pixel boxes.
#[derive(Debug, Clone)]
pub struct PreparedLayout<'a> {
    pub depth: ArrayView2<'a, f32>,
    pub objects: Vec<PreparedObject>,
    /// `(height, width)` of the canvas.
    pub shape: (usize, usize),
}

/// Composited depth layout of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthLayout {
    pub filename: String,
    /// `(height, width)`, values in the configured target range, 0 where no object is.
    pub canvas: Array2<f32>,
    /// Normalized depth per valid object, in slot order.
    pub objects: Vec<ObjectDepth>,
    /// Slot indices in paint order, farthest first.
    pub order: Vec<usize>,
}

impl DepthLayout {
    pub fn shape(&self) -> (usize, usize) {
        self.canvas.dim()
    }

    /// Normalized depth of the object in `index`, `None` if it was excluded or is padding.
    pub fn depth_of(&self, index: usize) -> Option<f32> {
        self.objects
            .iter()
            .find(|o| o.index == index && !o.excluded)
            .map(|o| o.depth)
    }

    /// The object painted last, i.e. the nearest one.
    pub fn nearest(&self) -> Option<usize> {
        self.order.last().copied()
    }

    pub fn to_gray(&self) -> GrayImage {
        image_ops::layout_to_gray(self.canvas.view())
    }

    pub fn into_canvas(self) -> Array2<f32> {
        self.canvas
    }
}

/// Depth-ordered layout compositor.
#[derive(Debug, Clone)]
pub struct DepthCompositor {
    config: CompositorConfig,
    convention: DepthConvention,
}

impl DepthCompositor {
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn convention(&self) -> DepthConvention {
        self.convention
    }

    /// Looks up the layout's depth map in `store` and composites it.
    ///
    /// The map is resized to the layout's resolution only when `resize_depth` is set.
    pub fn composite_with_store<S>(&self, store: &S, layout: &Layout) -> Result<DepthLayout>
    where
        S: DepthStore + ?Sized,
    {
        let map = store.load(&layout.filename)?;
        let map = self.fit_depth(map, layout);
        self.forward(layout, &map, None)
    }

    /// Same as [`DepthCompositor::composite_with_store`], recording stage timings.
    pub fn composite_timed<S>(&self, store: &S, layout: &Layout, timer: &mut TimeCalc) -> Result<DepthLayout>
    where
        S: DepthStore + ?Sized,
    {
        let map = store.load(&layout.filename)?;
        let map = self.fit_depth(map, layout);
        self.forward(layout, &map, Some(timer))
    }

    fn fit_depth(&self, map: Arc<DepthMap>, layout: &Layout) -> Arc<DepthMap> {
        let (height, width) = layout.shape();
        if !self.config.resize_depth || map.shape_hw() == (height, width) {
            return map;
        }
        log::debug!(
            "Resizing depth map for {} from {:?} to {:?}",
            layout.filename,
            map.shape_hw(),
            (height, width)
        );
        Arc::new(DepthMap::from(image_ops::resize_depth(map.view(), height, width)))
    }
}

impl LayoutProcess for DepthCompositor {
    type Input = Layout;

    fn new(config: CompositorConfig) -> Result<Self> {
        let convention = config.validate()?;
        log::info!("Compositing with depth convention `{}`", convention);
        Ok(Self { config, convention })
    }

    fn preprocess<'a>(&self, x: &Layout, depth: &'a DepthMap) -> Result<PreparedLayout<'a>> {
        x.check_num_obj(self.config.background_class, self.config.num_obj)?;

        let oriented = depth.oriented(x.flip);
        let shape = x.shape();
        if oriented.dim() != shape {
            return Err(LayoutError::ShapeMismatch {
                expected: shape,
                found: oriented.dim(),
            });
        }

        let (height, width) = shape;
        let objects = x
            .valid_objects(self.config.background_class)
            .map(|(index, obj)| {
                let (size_box, coord_box) = obj.bbox.to_pixel_boxes(height, width);
                PreparedObject {
                    index,
                    class_id: obj.class_id,
                    size_box,
                    coord_box,
                }
            })
            .collect();

        Ok(PreparedLayout {
            depth: oriented,
            objects,
            shape,
        })
    }

    fn aggregate(&self, prepared: &PreparedLayout<'_>) -> Vec<ObjectDepth> {
        let boxes: Vec<(usize, SizeBox)> = prepared
            .objects
            .iter()
            .map(|o| (o.index, o.size_box))
            .collect();
        aggregate_depths(prepared.depth, &boxes)
    }

    fn postprocess(&self, x: &Layout, prepared: PreparedLayout<'_>, mut depths: Vec<ObjectDepth>) -> DepthLayout {
        normalize_objects(&mut depths, self.config.target_range);

        let patches: Vec<DepthPatch> = prepared
            .objects
            .iter()
            .zip(depths.iter())
            .filter(|(_, d)| !d.excluded)
            .map(|(o, d)| DepthPatch::new(o.index, d.depth, o.coord_box))
            .collect();

        let (canvas, order) = composite(&patches, self.convention, prepared.shape);

        DepthLayout {
            filename: x.filename.clone(),
            canvas,
            objects: depths,
            order,
        }
    }

    fn profile(&self) -> bool {
        self.config.profile
    }
}
