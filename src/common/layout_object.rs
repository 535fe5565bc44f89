use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::common::{BoxFormat, LayoutError, NormBox};

/// Class id reserved for padding slots.
pub const BACKGROUND_CLASS: u32 = 0;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutObject {
    pub class_id: u32,
    pub bbox: NormBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LayoutObject {
    pub fn new(class_id: u32, bbox: NormBox) -> Self {
        Self {
            class_id,
            bbox,
            label: None,
        }
    }

    /// Sets the box using `(x, y, w, h)`.
    pub fn with_x1y1_wh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = NormBox::default().with_x1y1_wh(x, y, w, h);
        self
    }

    /// Sets the box using `(cx, cy, w, h)`.
    pub fn with_cxcy_wh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = NormBox::default().with_cxcy_wh(cx, cy, w, h);
        self
    }

    pub fn with_class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn get_label(&self) -> String {
        self.label.clone().unwrap_or("Unknown".to_string())
    }

    pub fn is_background(&self, background_class: u32) -> bool {
        self.class_id == background_class
    }
}

/// Object boxes of one image together with what is needed to find and
/// orient its depth map.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Key of the cached depth map.
    pub filename: String,
    /// Set when the image (and these boxes) were mirrored left-right.
    #[serde(default)]
    pub flip: bool,
    /// Working resolution the normalized boxes are scaled to.
    pub image_height: usize,
    pub image_width: usize,
    pub objects: Vec<LayoutObject>,
}

impl Layout {
    pub fn new(filename: &str, image_height: usize, image_width: usize) -> Self {
        Self {
            filename: filename.to_string(),
            flip: false,
            image_height,
            image_width,
            objects: vec![],
        }
    }

    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    pub fn with_object(mut self, object: LayoutObject) -> Self {
        self.objects.push(object);
        self
    }

    pub fn with_objects(mut self, objects: &[LayoutObject]) -> Self {
        self.objects.extend_from_slice(objects);
        self
    }

    /// `(height, width)` of the working resolution.
    pub fn shape(&self) -> (usize, usize) {
        (self.image_height, self.image_width)
    }

    /// Non-padding objects with their slot index in `objects`.
    pub fn valid_objects(&self, background_class: u32) -> impl Iterator<Item = (usize, &LayoutObject)> {
        self.objects
            .iter()
            .enumerate()
            .filter(move |(_, obj)| !obj.is_background(background_class))
    }

    pub fn num_valid(&self, background_class: u32) -> usize {
        self.valid_objects(background_class).count()
    }

    pub fn check_num_obj(&self, background_class: u32, num_obj: usize) -> Result<(), LayoutError> {
        let count = self.num_valid(background_class);
        if count > num_obj {
            return Err(LayoutError::TooManyObjects { count, max: num_obj });
        }
        Ok(())
    }

    /// Mirrors every box left-right and toggles the flip flag.
    pub fn flip_horizontal(&mut self) {
        for obj in self.objects.iter_mut() {
            obj.bbox = obj.bbox.flip_horizontal();
        }
        self.flip = !self.flip;
    }

    /// Applies [`Layout::flip_horizontal`] with probability `p`. Returns whether it flipped.
    pub fn random_flip<R: Rng + ?Sized>(&mut self, rng: &mut R, p: f64) -> bool {
        let flip = rng.gen_bool(p.clamp(0., 1.));
        if flip {
            self.flip_horizontal();
        }
        flip
    }
}

/// On-disk layout description with raw four-value boxes.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct RawLayout {
    pub filename: String,
    #[serde(default)]
    pub flip: bool,
    pub image_height: usize,
    pub image_width: usize,
    pub classes: Vec<u32>,
    pub boxes: Vec<[f32; 4]>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl RawLayout {
    pub fn into_layout(self, format: BoxFormat) -> anyhow::Result<Layout> {
        if self.classes.len() != self.boxes.len() {
            anyhow::bail!(
                "layout `{}` has {} classes but {} boxes",
                self.filename,
                self.classes.len(),
                self.boxes.len()
            );
        }

        let labels = self.labels.unwrap_or_default();
        let objects = self
            .classes
            .iter()
            .zip(self.boxes.iter())
            .enumerate()
            .map(|(i, (&class_id, &raw))| {
                let mut obj = LayoutObject::new(class_id, NormBox::from_raw(raw, format));
                if let Some(label) = labels.get(i) {
                    obj = obj.with_label(label);
                }
                obj
            })
            .collect();

        Ok(Layout {
            filename: self.filename,
            flip: self.flip,
            image_height: self.image_height,
            image_width: self.image_width,
            objects,
        })
    }
}
