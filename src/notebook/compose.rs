//! Page composition
//!
//! Builds one notebook page bitmap: white background, note pattern, then the
//! rasterized slide fitted into its half of the canvas.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};

use super::error::{NotebookError, NotebookResult};
use super::geometry::CanvasLayout;
use super::pattern::{render_pattern, Surface};
use super::source::POINTS_PER_INCH;
use super::types::{NotebookOptions, OutputPage, PageImage, PageSize, Rect};

/// Page background
pub const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

/// Pattern ink
pub const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Upper bound on any page bitmap (~360 MB of RGB)
pub const MAX_CANVAS_PIXELS: u64 = 120_000_000;

/// Raster drawing surface addressed in page points
pub struct RasterSurface<'a> {
    image: &'a mut RgbImage,
    /// Pixels per point
    scale: f32,
    ink: Rgb<u8>,
}

impl<'a> RasterSurface<'a> {
    pub fn new(image: &'a mut RgbImage, scale: f32) -> Self {
        Self {
            image,
            scale,
            ink: INK,
        }
    }

    fn px(&self, point: (f32, f32)) -> (f32, f32) {
        (point.0 * self.scale, point.1 * self.scale)
    }
}

impl Surface for RasterSurface<'_> {
    fn line(&mut self, from: (f32, f32), to: (f32, f32)) {
        let (from, to) = (self.px(from), self.px(to));
        draw_line_segment_mut(&mut *self.image, from, to, self.ink);
    }

    fn dot(&mut self, center: (f32, f32), radius: f32) {
        let (x, y) = self.px((center.0 - radius, center.1 - radius));
        let side = (2.0 * radius * self.scale).round().max(1.0) as u32;
        let rect = imageproc::rect::Rect::at(x.round() as i32, y.round() as i32).of_size(side, side);
        draw_filled_rect_mut(&mut *self.image, rect, self.ink);
    }

    fn square(&mut self, origin: (f32, f32), side: f32) {
        let (x, y) = self.px(origin);
        let side = (side * self.scale).round().max(1.0) as u32;
        let rect = imageproc::rect::Rect::at(x.round() as i32, y.round() as i32).of_size(side, side);
        draw_hollow_rect_mut(&mut *self.image, rect, self.ink);
    }
}

/// Bitmap dimensions of `size` points rendered at `dpi`
///
/// Fails with `CompositionFailure` for `page` (1-based) when the bitmap would
/// be empty or exceed [`MAX_CANVAS_PIXELS`], before anything is allocated.
pub fn check_pixel_budget(size: PageSize, dpi: u32, page: usize) -> NotebookResult<(u32, u32)> {
    let scale = dpi as f32 / POINTS_PER_INCH;
    let width = (size.width * scale).round() as u32;
    let height = (size.height * scale).round() as u32;

    if width == 0 || height == 0 {
        return Err(NotebookError::CompositionFailure {
            page,
            reason: format!("bitmap has no area ({}x{} px)", width, height),
        });
    }
    if width as u64 * height as u64 > MAX_CANVAS_PIXELS {
        return Err(NotebookError::CompositionFailure {
            page,
            reason: format!("page too large ({}x{} px at {} dpi)", width, height, dpi),
        });
    }

    Ok((width, height))
}

/// Pixel rectangle covering `rect` at `scale`
fn pixel_rect(rect: Rect, scale: f32) -> (u32, u32, u32, u32) {
    let x0 = (rect.x * scale).round() as u32;
    let y0 = (rect.y * scale).round() as u32;
    let x1 = (rect.right() * scale).round() as u32;
    let y1 = (rect.bottom() * scale).round() as u32;
    (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
}

/// Scale `image` to fit inside `bounds` without distortion, centered
///
/// Returns the (possibly resized) image and its top-left pixel position.
fn fit_into(image: &RgbImage, bounds: (u32, u32, u32, u32)) -> (Option<RgbImage>, i64, i64) {
    let (bx, by, bw, bh) = bounds;
    let (iw, ih) = image.dimensions();

    let factor = (bw as f32 / iw as f32).min(bh as f32 / ih as f32);
    let fw = ((iw as f32 * factor).round() as u32).clamp(1, bw);
    let fh = ((ih as f32 * factor).round() as u32).clamp(1, bh);

    let resized = if (fw, fh) == (iw, ih) {
        None
    } else {
        Some(imageops::resize(image, fw, fh, FilterType::Triangle))
    };

    let x = bx as i64 + ((bw - fw) / 2) as i64;
    let y = by as i64 + ((bh - fh) / 2) as i64;
    (resized, x, y)
}

/// Compose one output page from a rasterized source page
///
/// `dpi` must match the resolution the page was rasterized at so that the
/// slide fills its rectangle at native size.
pub fn compose_page(
    page: &PageImage,
    layout: &CanvasLayout,
    options: &NotebookOptions,
    dpi: u32,
) -> NotebookResult<OutputPage> {
    let failure = |reason: String| NotebookError::CompositionFailure {
        page: page.index + 1,
        reason,
    };

    let (iw, ih) = page.image.dimensions();
    if iw == 0 || ih == 0 {
        return Err(failure(format!("empty page image ({}x{})", iw, ih)));
    }

    let scale = dpi as f32 / POINTS_PER_INCH;
    let (width, height) = check_pixel_budget(layout.canvas, dpi, page.index + 1)?;

    // 1. background
    let mut canvas = RgbImage::from_pixel(width, height, PAPER);

    // 2. pattern, exactly once
    {
        let mut surface = RasterSurface::new(&mut canvas, scale);
        render_pattern(&mut surface, layout.note, options.style, options.spacing);
    }

    // 3. slide, letterboxed on the background
    let slide_px = pixel_rect(layout.slide, scale);
    if slide_px.2 == 0 || slide_px.3 == 0 {
        return Err(failure("slide region has no area".to_string()));
    }
    let (resized, x, y) = fit_into(&page.image, slide_px);
    imageops::overlay(&mut canvas, resized.as_ref().unwrap_or(&page.image), x, y);

    Ok(OutputPage {
        index: page.index,
        size: layout.canvas,
        image: canvas,
    })
}
