//! Note area patterns
//!
//! Draws ruled lines, a dot grid or a square grid inside the note region.
//! Drawing goes through the [`Surface`] trait so the same walk feeds both the
//! raster composer and geometry checks.
//!
//! The grid starts [`TOP_MARGIN`] below the top edge and stays
//! [`SIDE_MARGIN`] away from the other three edges. Both bounds are
//! inclusive: a 800pt note area with 20pt spacing gets rows at 40, 60, ..., 780.

use super::types::{PatternStyle, Rect, Spacing};

/// Distance from the note region's top edge to the first row, in points
pub const TOP_MARGIN: f32 = 40.0;

/// Distance kept from the left, right and bottom edges, in points
pub const SIDE_MARGIN: f32 = 20.0;

/// Radius of a dot-grid marker, in points
pub const DOT_RADIUS: f32 = 0.5;

/// Drawing target for pattern primitives, in page points
pub trait Surface {
    /// Stroke a straight line
    fn line(&mut self, from: (f32, f32), to: (f32, f32));

    /// Fill a small round marker
    fn dot(&mut self, center: (f32, f32), radius: f32);

    /// Stroke an unfilled square with its top-left corner at `origin`
    fn square(&mut self, origin: (f32, f32), side: f32);
}

/// Inner bounds the pattern may occupy within a note region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PatternBounds {
    pub fn for_note(note: Rect) -> Self {
        Self {
            left: note.x + SIDE_MARGIN,
            top: note.y + TOP_MARGIN,
            right: note.right() - SIDE_MARGIN,
            bottom: note.bottom() - SIDE_MARGIN,
        }
    }
}

/// Positions `start, start + step, ...` up to and including `end`
///
/// Computed by multiplication rather than repeated addition so long runs do
/// not drift.
fn steps(start: f32, end: f32, step: f32) -> impl Iterator<Item = f32> {
    (0u32..)
        .map(move |i| start + i as f32 * step)
        .take_while(move |&v| v <= end)
}

/// Draw `style` into `note` on `surface`
pub fn render_pattern<S>(surface: &mut S, note: Rect, style: PatternStyle, spacing: Spacing)
where
    S: Surface + ?Sized,
{
    let bounds = PatternBounds::for_note(note);
    let step = spacing.as_f32();

    match style {
        PatternStyle::Lines => {
            for y in steps(bounds.top, bounds.bottom, step) {
                surface.line((bounds.left, y), (bounds.right, y));
            }
        }
        PatternStyle::Dots => {
            for y in steps(bounds.top, bounds.bottom, step) {
                for x in steps(bounds.left, bounds.right, step) {
                    surface.dot((x, y), DOT_RADIUS);
                }
            }
        }
        PatternStyle::Squares => {
            let side = step / 2.0;
            for y in steps(bounds.top, bounds.bottom - side, step) {
                for x in steps(bounds.left, bounds.right - side, step) {
                    surface.square((x, y), side);
                }
            }
        }
    }
}
