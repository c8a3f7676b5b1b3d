//! CPU-side painting of particle appearances.
//!
//! Each particle becomes a disc whose diameter is its size scale and whose
//! color is blended over the background at its opacity. Particles are painted
//! far-to-near so near ones end up on top.

use std::path::Path;

use image::{Rgba, RgbaImage};
use particle_glyph_core::{ParticleError, Srgb};
use particle_glyph_field::Appearance;

/// Paints `appearances` onto an opaque `width x height` background.
pub fn render(appearances: &[Appearance], width: u32, height: u32, background: Srgb) -> RgbaImage {
    let [br, bg, bb] = background.to_rgb8();
    let mut img = RgbaImage::from_pixel(width, height, Rgba([br, bg, bb, 255]));

    let mut ordered: Vec<&Appearance> = appearances.iter().collect();
    ordered.sort_by(|a, b| a.size.total_cmp(&b.size));
    for a in ordered {
        paint_disc(&mut img, a);
    }
    img
}

/// Renders and writes a PNG.
pub fn write_png(
    appearances: &[Appearance],
    width: u32,
    height: u32,
    background: Srgb,
    path: &Path,
) -> Result<(), ParticleError> {
    render(appearances, width, height, background)
        .save(path)
        .map_err(|e| ParticleError::Io(e.to_string()))
}

fn paint_disc(img: &mut RgbaImage, a: &Appearance) {
    let radius = a.size / 2.0;
    if !(a.x.is_finite() && a.y.is_finite()) {
        return;
    }
    let x0 = (a.x - radius).floor().max(0.0) as i64;
    let y0 = (a.y - radius).floor().max(0.0) as i64;
    let x1 = ((a.x + radius).ceil() as i64).min(img.width() as i64 - 1);
    let y1 = ((a.y + radius).ceil() as i64).min(img.height() as i64 - 1);
    let alpha = a.opacity.clamp(0.0, 1.0);
    let src = [a.color.r, a.color.g, a.color.b];

    for py in y0..=y1 {
        for px in x0..=x1 {
            let cx = px as f64 + 0.5 - a.x;
            let cy = py as f64 + 0.5 - a.y;
            if cx * cx + cy * cy > radius * radius {
                continue;
            }
            let dst = img.get_pixel_mut(px as u32, py as u32);
            for (c, s) in dst.0.iter_mut().take(3).zip(src) {
                let blended = (*c as f64 / 255.0) * (1.0 - alpha) + s * alpha;
                *c = (blended * 255.0).round() as u8;
            }
        }
    }
}
