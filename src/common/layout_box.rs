use serde::{Deserialize, Serialize};

/// How a raw four-value box is laid out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxFormat {
    /// `(x, y, w, h)` with `(x, y)` the top-left corner.
    #[default]
    Xywh,
    /// `(cx, cy, w, h)` with `(cx, cy)` the box center.
    Cxcywh,
}

impl BoxFormat {
    pub fn from_str(format: &str) -> Option<Self> {
        match format.to_lowercase().as_str() {
            "xywh" => Some(BoxFormat::Xywh),
            "cxcywh" => Some(BoxFormat::Cxcywh),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoxFormat::Xywh => "xywh",
            BoxFormat::Cxcywh => "cxcywh",
        }
    }
}

/// A layout box in normalized image coordinates, stored as `(x, y, w, h)`.
///
/// All four values are fractions of the image width (x, w) or height (y, h).
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Pixel-space box as `(x, y, width, height)`, used for cropping.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Pixel-space box as `(xmin, ymin, xmax, ymax)`, used for painting.
///
/// The max edges are exclusive.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordBox {
    pub x_min: usize,
    pub y_min: usize,
    pub x_max: usize,
    pub y_max: usize,
}

impl NormBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a box from raw values in the given layout.
    pub fn from_raw(raw: [f32; 4], format: BoxFormat) -> Self {
        let [a, b, w, h] = raw;
        match format {
            BoxFormat::Xywh => Self::default().with_x1y1_wh(a, b, w, h),
            BoxFormat::Cxcywh => Self::default().with_cxcy_wh(a, b, w, h),
        }
    }

    /// Sets the box from its top-left corner and size.
    pub fn with_x1y1_wh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x = x;
        self.y = y;
        self.w = w;
        self.h = h;
        self
    }

    /// Sets the box from its center and size.
    pub fn with_cxcy_wh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x = cx - w / 2.0;
        self.y = cy - h / 2.0;
        self.w = w;
        self.h = h;
        self
    }

    /// Returns the center x-coordinate of the box.
    pub fn cx(&self) -> f32 {
        self.x + self.w / 2.
    }

    /// Returns the center y-coordinate of the box.
    pub fn cy(&self) -> f32 {
        self.y + self.h / 2.
    }

    /// Returns the box as `(x, y, w, h)`.
    pub fn xy1_wh(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.w, self.h)
    }

    /// Returns the box as `(cx, cy, w, h)`.
    pub fn cxy_wh(&self) -> (f32, f32, f32, f32) {
        (self.cx(), self.cy(), self.w, self.h)
    }

    pub fn area(&self) -> f32 {
        self.w.max(0.) * self.h.max(0.)
    }

    /// Mirrors the box around the vertical center line of the image.
    pub fn flip_horizontal(&self) -> Self {
        Self {
            x: 1.0 - self.x - self.w,
            ..*self
        }
    }

    /// Scales the box to an image of `height` x `width` pixels in size form.
    ///
    /// Both edges are scaled and rounded, then clamped into the image, so a
    /// box hanging over a border is clipped rather than shifted. The size
    /// is never negative.
    pub fn to_size_box(&self, height: usize, width: usize) -> SizeBox {
        let x_min = scale_clamped(self.x, width);
        let y_min = scale_clamped(self.y, height);
        let x_max = scale_clamped(self.x + self.w, width);
        let y_max = scale_clamped(self.y + self.h, height);
        SizeBox {
            x: x_min,
            y: y_min,
            width: x_max.saturating_sub(x_min),
            height: y_max.saturating_sub(y_min),
        }
    }

    /// Scales the box to an image of `height` x `width` pixels in coordinate form.
    pub fn to_coord_box(&self, height: usize, width: usize) -> CoordBox {
        self.to_size_box(height, width).to_coord_box()
    }

    /// Both pixel-space forms at once. They always describe the same pixels.
    pub fn to_pixel_boxes(&self, height: usize, width: usize) -> (SizeBox, CoordBox) {
        let size_box = self.to_size_box(height, width);
        (size_box, size_box.to_coord_box())
    }
}

fn scale_clamped(value: f32, dim: usize) -> usize {
    let scaled = (value * dim as f32).round();
    if scaled.is_nan() || scaled <= 0. {
        0
    } else {
        (scaled as usize).min(dim)
    }
}

impl SizeBox {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// A box that covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    pub fn to_coord_box(&self) -> CoordBox {
        CoordBox {
            x_min: self.x,
            y_min: self.y,
            x_max: self.x + self.width,
            y_max: self.y + self.height,
        }
    }
}

impl CoordBox {
    pub fn new(x_min: usize, y_min: usize, x_max: usize, y_max: usize) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> usize {
        self.x_max.saturating_sub(self.x_min)
    }

    pub fn height(&self) -> usize {
        self.y_max.saturating_sub(self.y_min)
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// Checks if this box completely contains `other`.
    pub fn contains(&self, other: &CoordBox) -> bool {
        self.x_min <= other.x_min
            && self.x_max >= other.x_max
            && self.y_min <= other.y_min
            && self.y_max >= other.y_max
    }

    /// Clips the box to a `height` x `width` canvas.
    pub fn clip(&self, height: usize, width: usize) -> Self {
        let x_min = self.x_min.min(width);
        let y_min = self.y_min.min(height);
        Self {
            x_min,
            y_min,
            x_max: self.x_max.clamp(x_min, width),
            y_max: self.y_max.clamp(y_min, height),
        }
    }

    pub fn to_size_box(&self) -> SizeBox {
        SizeBox {
            x: self.x_min,
            y: self.y_min,
            width: self.width(),
            height: self.height(),
        }
    }
}
