//! Depth map resampling and debug rendering.

use anyhow::Result;
use fast_image_resize::{
    images::Image as FirImage,
    pixels::PixelType,
    FilterType as FirFilterType, ResizeAlg, ResizeOptions, Resizer,
};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use ndarray::{Array2, ArrayView2};
use crate::common::{DepthMap, Layout};
use crate::compositing::DepthLayout;

/// Resamples a depth map to `target_h` x `target_w` with bilinear filtering.
pub fn resize_depth(depth: ArrayView2<'_, f32>, target_h: usize, target_w: usize) -> Array2<f32> {
    let (h, w) = depth.dim();
    if (h, w) == (target_h, target_w) {
        return depth.to_owned();
    }
    if h == 0 || w == 0 || target_h == 0 || target_w == 0 {
        return Array2::zeros((target_h, target_w));
    }

    match resize_fir(depth, target_h, target_w) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("Failed to use `fast_image_resize` ({}). Falling back.", err);
            resize_imageops(depth, target_h, target_w)
        }
    }
}

fn resize_fir(depth: ArrayView2<'_, f32>, target_h: usize, target_w: usize) -> Result<Array2<f32>> {
    let (h, w) = depth.dim();
    let buffer: Vec<u8> = depth.iter().flat_map(|d| d.to_ne_bytes()).collect();
    let src = FirImage::from_vec_u8(w as u32, h as u32, buffer, PixelType::F32)?;
    let mut dst = FirImage::new(target_w as u32, target_h as u32, PixelType::F32);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FirFilterType::Bilinear));
    let mut resizer = Resizer::new();
    resizer.resize(&src, &mut dst, &options)?;

    let values: Vec<f32> = dst
        .buffer()
        .chunks_exact(4)
        .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Ok(Array2::from_shape_vec((target_h, target_w), values)?)
}

fn resize_imageops(depth: ArrayView2<'_, f32>, target_h: usize, target_w: usize) -> Array2<f32> {
    let image = DepthMap::from(depth.to_owned()).to_image();
    let resized = image::imageops::resize(&image, target_w as u32, target_h as u32, FilterType::Triangle);
    DepthMap::from(resized).into_array()
}

/// 8-bit rendering of a raw depth map, stretched over its own finite range.
pub fn depth_to_gray(depth: ArrayView2<'_, f32>) -> GrayImage {
    let (height, width) = depth.dim();
    let range = depth
        .iter()
        .filter(|d| d.is_finite())
        .fold(None, |acc: Option<(f32, f32)>, &d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        });

    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let d = depth[[y as usize, x as usize]];
        let v = match range {
            Some((lo, hi)) if hi > lo && d.is_finite() => (d - lo) / (hi - lo),
            _ => 0.,
        };
        Luma([(v * 255.).round() as u8])
    })
}

/// 8-bit rendering of a composited canvas with values in `[0, 1]`.
pub fn layout_to_gray(canvas: ArrayView2<'_, f32>) -> GrayImage {
    let (height, width) = canvas.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let v = canvas[[y as usize, x as usize]].clamp(0., 1.);
        Luma([(v * 255.).round() as u8])
    })
}

pub fn class_colour(class: u32) -> Rgb<u8> {
    match class {
        0 => Rgb([128, 128, 128]),      // grey (background)
        1..=91 => Rgb([0, 255, 0]),     // green (things)
        92..=182 => Rgb([255, 0, 0]),   // red (stuff)
        _ => Rgb([0, 0, 255])           // blue (everything else)
    }
}

/// Draws the valid boxes of `layout`, scaled to `image`'s size.
pub fn draw_layout_boxes(image: &mut RgbImage, layout: &Layout, background_class: u32) {
    let (width, height) = image.dimensions();
    for (_, obj) in layout.valid_objects(background_class) {
        let b = obj.bbox.to_size_box(height as usize, width as usize);
        if b.is_empty() {
            continue;
        }
        let rect = Rect::at(b.x as i32, b.y as i32).of_size(b.width as u32, b.height as u32);
        draw_hollow_rect_mut(image, rect, class_colour(obj.class_id));
    }
}

/// Image with boxes | depth map | depth layout, side by side.
pub fn depth_panel(image: &RgbImage, depth: ArrayView2<'_, f32>, canvas: ArrayView2<'_, f32>) -> RgbImage {
    let panels = [
        image.clone(),
        DynamicImage::ImageLuma8(depth_to_gray(depth)).to_rgb8(),
        DynamicImage::ImageLuma8(layout_to_gray(canvas)).to_rgb8(),
    ];

    let width = panels.iter().map(|p| p.width()).sum();
    let height = panels.iter().map(|p| p.height()).max().unwrap_or(0);
    let mut out = RgbImage::new(width, height);

    let mut x = 0i64;
    for panel in panels.iter() {
        image::imageops::replace(&mut out, panel, x, 0);
        x += panel.width() as i64;
    }
    out
}

/// Panel for one composited layout, drawn in the layout's orientation.
///
/// `image` is the source image as stored on disk; it is mirrored for flipped
/// layouts so that it lines up with the boxes, the oriented depth map and the canvas.
pub fn layout_panel(
    image: &RgbImage,
    layout: &Layout,
    depth: &DepthMap,
    result: &DepthLayout,
    background_class: u32,
) -> RgbImage {
    let mut rgb = if layout.flip {
        image::imageops::flip_horizontal(image)
    } else {
        image.clone()
    };
    draw_layout_boxes(&mut rgb, layout, background_class);
    depth_panel(&rgb, depth.oriented(layout.flip), result.canvas.view())
}
