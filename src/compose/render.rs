//! Pixel work: text rasterization, the translucent quote box, and the
//! circular watermark.
//!
//! The [`Composer`] owns the font and watermark assets, loaded once at
//! startup. Composition itself is deterministic: identical image bytes,
//! quote, author, and watermark produce byte-identical output.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode / encode (JPEG, PNG) | `image` crate |
//! | Glyph measurement + rasterization | `rusttype` |
//! | Watermark crop-to-square | `image::DynamicImage::resize_to_fill` |
//! | Circle mask / outline | custom per-pixel blend below |

use super::layout::{
    Scheme, TextBoxLayout, WatermarkLayout, author_font_px, chars_per_line, quote_font_px,
    text_box, watermark_layout, wrap_greedy,
};
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage, imageops};
use rusttype::{Font, Scale, point};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Asset load failed: {0}")]
    Asset(String),
}

/// Composition seam: `prepare` talks to this trait so tests can swap in
/// a stub that writes placeholder files instead of rendering.
pub trait AssetComposer {
    fn compose_file(
        &self,
        image: &Path,
        quote: &str,
        author: &str,
        save: &Path,
    ) -> Result<(), ComposeError>;
}

/// Holds the loaded font and watermark; renders quote-over-photo assets.
pub struct Composer {
    font: Font<'static>,
    watermark: DynamicImage,
}

impl Composer {
    /// Load the font and watermark assets.
    ///
    /// A missing or corrupt asset is fatal here — there is no silent
    /// substitute font.
    pub fn load(font_path: &Path, watermark_path: &Path) -> Result<Self, ComposeError> {
        let bytes = std::fs::read(font_path)
            .map_err(|e| ComposeError::Asset(format!("{}: {}", font_path.display(), e)))?;
        let font = Font::try_from_vec(bytes).ok_or_else(|| {
            ComposeError::Asset(format!(
                "{} is not a usable TrueType font",
                font_path.display()
            ))
        })?;
        let watermark = image::open(watermark_path)
            .map_err(|e| ComposeError::Asset(format!("{}: {}", watermark_path.display(), e)))?;
        Ok(Self { font, watermark })
    }

    /// Composite the quote box and watermark onto `img`.
    pub fn compose(&self, img: &DynamicImage, quote: &str, author: &str) -> RgbaImage {
        let scheme = Scheme::from_mean_luminance(mean_luminance(img));
        let mut canvas = img.to_rgba8();
        self.draw_quote_box(&mut canvas, scheme, quote, author);
        self.apply_watermark(&mut canvas, scheme);
        canvas
    }

    fn draw_quote_box(&self, canvas: &mut RgbaImage, scheme: Scheme, quote: &str, author: &str) {
        let (width, height) = (canvas.width(), canvas.height());
        let quoted = format!("\"{quote}\"");
        let byline = format!("- {author}");

        let quote_scale = Scale::uniform(quote_font_px(height));
        let author_scale = Scale::uniform(author_font_px(quote_font_px(height)));

        let full_width = text_width(&self.font, quote_scale, &quoted);
        let avg_glyph = full_width / quoted.chars().count().max(1) as f32;
        let lines = wrap_greedy(&quoted, chars_per_line(width, height, avg_glyph));

        let box_layout: TextBoxLayout = text_box(
            height,
            line_height(&self.font, quote_scale),
            lines.len(),
            line_height(&self.font, author_scale),
        );
        fill_band(
            canvas,
            box_layout.top,
            box_layout.top + box_layout.height,
            scheme.translucent(),
        );

        let mut y = box_layout.top;
        let mut widest = 0.0f32;
        for line in &lines {
            let line_width = text_width(&self.font, quote_scale, line);
            draw_text(
                canvas,
                &self.font,
                quote_scale,
                (width as f32 - line_width) / 2.0,
                y,
                scheme.text(),
                line,
            );
            widest = widest.max(line_width);
            y += box_layout.line_height;
        }

        // Right-align the byline to the widest quote line, vertically
        // centered in the leftover author-row space.
        let author_width = text_width(&self.font, author_scale, &byline);
        let author_x = (width as f32 - widest) / 2.0 + widest - author_width;
        let author_y = y - (box_layout.line_height - box_layout.author_line_height) / 2.0;
        draw_text(
            canvas,
            &self.font,
            author_scale,
            author_x,
            author_y,
            scheme.text(),
            &byline,
        );
    }

    fn apply_watermark(&self, canvas: &mut RgbaImage, scheme: Scheme) {
        let place: WatermarkLayout = watermark_layout(canvas.width(), canvas.height());
        if place.edge == 0 {
            return;
        }

        let mut fitted = self
            .watermark
            .resize_to_fill(place.edge, place.edge, FilterType::Lanczos3)
            .to_rgba8();
        mask_circle(&mut fitted);
        imageops::overlay(canvas, &fitted, place.x as i64, place.y as i64);

        draw_ring(
            canvas,
            place.x as f32 + place.edge as f32 / 2.0,
            place.y as f32 + place.edge as f32 / 2.0,
            place.edge as f32 / 2.0,
            place.outline_width as f32,
            scheme.translucent(),
        );
    }
}

impl AssetComposer for Composer {
    fn compose_file(
        &self,
        image: &Path,
        quote: &str,
        author: &str,
        save: &Path,
    ) -> Result<(), ComposeError> {
        let img = image::open(image)?;
        let composed = self.compose(&img, quote, author);
        DynamicImage::ImageRgba8(composed).to_rgb8().save(save)?;
        Ok(())
    }
}

/// Mean luminance of the grayscale conversion, 0.0..=255.0.
pub fn mean_luminance(img: &DynamicImage) -> f64 {
    let gray = img.to_luma8();
    let pixels = gray.width() as u64 * gray.height() as u64;
    if pixels == 0 {
        return 0.0;
    }
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    sum as f64 / pixels as f64
}

/// Advance width of `text` at `scale`, including kerning.
fn text_width(font: &Font<'_>, scale: Scale, text: &str) -> f32 {
    let v = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, v.ascent))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Full line height: ascent to descent plus line gap.
fn line_height(font: &Font<'_>, scale: Scale) -> f32 {
    let v = font.v_metrics(scale);
    v.ascent - v.descent + v.line_gap
}

/// Source-over blend of `color` into one pixel at the given alpha.
fn blend_px(dst: &mut Rgba<u8>, color: [u8; 4], alpha: f32) {
    let inv = 1.0 - alpha;
    for c in 0..3 {
        dst.0[c] = (color[c] as f32 * alpha + dst.0[c] as f32 * inv).round() as u8;
    }
    dst.0[3] = 255;
}

/// Blend a full-width horizontal band, clipped to the canvas.
fn fill_band(img: &mut RgbaImage, top: f32, bottom: f32, color: [u8; 4]) {
    let alpha = color[3] as f32 / 255.0;
    let y0 = top.max(0.0) as u32;
    let y1 = (bottom.max(0.0).ceil() as u32).min(img.height());
    for y in y0..y1 {
        for x in 0..img.width() {
            blend_px(img.get_pixel_mut(x, y), color, alpha);
        }
    }
}

/// Rasterize one line of text with `y` as the top of the line.
fn draw_text(img: &mut RgbaImage, font: &Font<'_>, scale: Scale, x: f32, y: f32, color: [u8; 4], text: &str) {
    let v = font.v_metrics(scale);
    let coverage_scale = color[3] as f32 / 255.0;
    for glyph in font.layout(text, scale, point(x, y + v.ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= img.width() || py >= img.height() {
                    return;
                }
                blend_px(img.get_pixel_mut(px, py), color, coverage * coverage_scale);
            });
        }
    }
}

/// Zero out the alpha of every pixel outside the inscribed circle.
fn mask_circle(img: &mut RgbaImage) {
    let r = img.width() as f32 / 2.0;
    for (x, y, px) in img.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - r;
        let dy = y as f32 + 0.5 - r;
        if dx * dx + dy * dy > r * r {
            px.0[3] = 0;
        }
    }
}

/// Blend a circular outline drawn inward from `outer_radius`.
fn draw_ring(img: &mut RgbaImage, cx: f32, cy: f32, outer_radius: f32, width: f32, color: [u8; 4]) {
    let alpha = color[3] as f32 / 255.0;
    let inner = (outer_radius - width).max(0.0);
    let x0 = (cx - outer_radius).floor().max(0.0) as u32;
    let y0 = (cy - outer_radius).floor().max(0.0) as u32;
    let x1 = ((cx + outer_radius).ceil() as u32).min(img.width());
    let y1 = ((cy + outer_radius).ceil() as u32).min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist >= inner && dist <= outer_radius {
                blend_px(img.get_pixel_mut(x, y), color, alpha);
            }
        }
    }
}
