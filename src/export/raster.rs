use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{SegError, SegResult};

const MAX_DIM: u32 = 16_384;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Rasterization settings for overlay export.
pub struct RasterOpts {
    /// Output pixels per image unit.
    pub scale: f32,
    /// Straight-alpha RGBA painted under the overlay.
    pub background: [u8; 4],
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: [0, 0, 0, 255],
        }
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(raw: &str) -> SegResult<[u8; 4]> {
    let bad = || SegError::validation(format!("invalid hex color '{raw}'"));
    let hex = raw.trim().strip_prefix('#').ok_or_else(bad)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(bad());
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
    match hex.len() {
        3 => {
            let mut out = [255u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16).ok_or_else(bad)? as u8;
                out[i] = v * 17;
            }
            Ok(out)
        }
        6 => Ok([byte(0)?, byte(2)?, byte(4)?, 255]),
        8 => Ok([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
        _ => Err(bad()),
    }
}

/// Render an overlay document into a straight-alpha RGBA image.
#[tracing::instrument(skip(svg), fields(len = svg.len()))]
pub fn rasterize_overlay(svg: &str, opts: &RasterOpts) -> SegResult<image::RgbaImage> {
    let tree = usvg::Tree::from_data(svg.as_bytes(), &usvg::Options::default())
        .context("parse overlay svg")?;

    let to_px = |v: f32| -> SegResult<u32> {
        let px = (v * opts.scale).ceil();
        if !px.is_finite() || px < 1.0 {
            return Err(SegError::validation("overlay has invalid width/height"));
        }
        Ok(px as u32)
    };
    let (w, h) = (to_px(tree.size().width())?, to_px(tree.size().height())?);
    if w > MAX_DIM || h > MAX_DIM {
        return Err(SegError::validation(format!(
            "overlay raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| SegError::validation("failed to allocate overlay pixmap"))?;
    let [r, g, b, a] = opts.background;
    pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, a));

    let sx = (w as f32) / tree.size().width();
    let sy = (h as f32) / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image::RgbaImage::from_raw(w, h, data)
        .ok_or_else(|| SegError::validation("overlay raster buffer size mismatch"))
}

/// Write `img` as PNG, creating parent directories.
pub fn write_png(img: &image::RgbaImage, path: &Path) -> SegResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/raster.rs"]
mod tests;
