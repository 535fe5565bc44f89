use image::{ImageBuffer, Luma};
use ndarray::{s, Array2, ArrayView2};

/// Single-channel depth image, `(height, width)`.
pub type DepthImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Dense per-pixel depth (or disparity) of one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthMap {
    pub depth: Array2<f32>,
}

impl std::ops::Deref for DepthMap {
    type Target = Array2<f32>;

    fn deref(&self) -> &Self::Target {
        &self.depth
    }
}

impl From<Array2<f32>> for DepthMap {
    fn from(depth: Array2<f32>) -> Self {
        Self { depth }
    }
}

impl From<Array2<f64>> for DepthMap {
    fn from(depth: Array2<f64>) -> Self {
        Self {
            depth: depth.mapv(|d| d as f32),
        }
    }
}

impl From<DepthImage> for DepthMap {
    fn from(image: DepthImage) -> Self {
        let (width, height) = image.dimensions();
        let depth = Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
            image.get_pixel(x as u32, y as u32)[0]
        });
        Self { depth }
    }
}

impl From<DepthMap> for Array2<f32> {
    fn from(map: DepthMap) -> Self {
        map.depth
    }
}

impl DepthMap {
    pub fn new(depth: Array2<f32>) -> Self {
        Self { depth }
    }

    /// A map with the same value everywhere.
    pub fn constant(height: usize, width: usize, value: f32) -> Self {
        Self {
            depth: Array2::from_elem((height, width), value),
        }
    }

    pub fn height(&self) -> usize {
        self.depth.nrows()
    }

    pub fn width(&self) -> usize {
        self.depth.ncols()
    }

    /// `(height, width)`.
    pub fn shape_hw(&self) -> (usize, usize) {
        self.depth.dim()
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.depth.view()
    }

    /// View of the map mirrored left-right when `flip` is set.
    pub fn oriented(&self, flip: bool) -> ArrayView2<'_, f32> {
        orient(self.depth.view(), flip)
    }

    /// `(min, max)` over finite values, `None` if there are none.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.depth
            .iter()
            .filter(|d| d.is_finite())
            .fold(None, |acc, &d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }

    pub fn to_image(&self) -> DepthImage {
        let (height, width) = self.shape_hw();
        ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
            Luma([self.depth[[y as usize, x as usize]]])
        })
    }

    pub fn into_array(self) -> Array2<f32> {
        self.depth
    }
}

/// Matches a depth map's horizontal orientation to its (possibly flipped) image.
///
/// Returns a view; the source array is never modified.
pub fn orient(depth: ArrayView2<'_, f32>, flip: bool) -> ArrayView2<'_, f32> {
    if flip {
        depth.slice_move(s![.., ..;-1])
    } else {
        depth
    }
}
