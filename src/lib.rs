//! Depth-ordered layout compositing.
//!
//! Turns the object boxes of a scene layout and a precomputed dense depth map
//! into a single-channel "depth layout": each object's box filled with its
//! normalized mean depth, painted farthest first so nearer objects cover
//! farther ones.

mod utils;
pub mod common;
pub mod compositing;
pub mod data;

use std::time::Instant;
use crate::common::{CompositorConfig, Layout, LayoutError};
use crate::compositing::{DepthCompositor, DepthLayout, LayoutProcess};
use crate::data::DepthStore;

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

pub fn init_compositor(config: &CompositorConfig) -> anyhow::Result<DepthCompositor> {
    log::info!("Initializing compositor\n{}", config.to_string());
    let compositor = DepthCompositor::new(config.clone())?;
    Ok(compositor)
}

pub fn run_composite<S>(compositor: &DepthCompositor, store: &S, layout: &Layout) -> anyhow::Result<DepthLayout>
where
    S: DepthStore + ?Sized,
{
    let now = Instant::now();

    let depth_layout = compositor.composite_with_store(store, layout)?;

    log::debug!("Composited {} in {:?}", layout.filename, now.elapsed());

    Ok(depth_layout)
}
