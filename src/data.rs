mod dataset_kind;
mod depth_store;
mod filesystem_access;
mod time_calc;

pub use dataset_kind::{DatasetKind, Split};
pub use depth_store::{DepthStore, MemoryDepthStore, NpyDepthStore};
pub use filesystem_access::FsAccess;
pub use time_calc::TimeCalc;
