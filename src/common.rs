mod compositor_config;
mod depth_convention;
mod depth_map;
mod layout_box;
mod layout_error;
mod layout_object;

pub use compositor_config::*;
pub use depth_convention::*;
pub use depth_map::*;
pub use layout_box::*;
pub use layout_error::*;
pub use layout_object::*;
