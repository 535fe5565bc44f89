mod aggregate;
mod batch;
mod depth_compositor;
mod estimator;
mod layout_process;
mod normalize;
mod painter;
pub mod image_ops;

pub use aggregate::*;
pub use batch::*;
pub use depth_compositor::*;
pub use estimator::*;
pub use layout_process::*;
pub use normalize::*;
pub use painter::*;
