//! Canvas geometry
//!
//! Pure computation of the doubled canvas and its slide/note halves. Nothing
//! here draws; rendering happens once per page in the composer.

use serde::Serialize;

use super::types::{PageSize, Placement, Rect};

/// Doubled canvas split into slide and note regions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasLayout {
    pub canvas: PageSize,
    pub slide: Rect,
    pub note: Rect,
}

impl CanvasLayout {
    pub fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.canvas.width, self.canvas.height)
    }
}

/// Resolve the canvas for a source page size and slide placement
pub fn resolve(page: PageSize, placement: Placement) -> CanvasLayout {
    let PageSize { width: w, height: h } = page;

    let canvas = if placement.is_horizontal() {
        PageSize::new(2.0 * w, h)
    } else {
        PageSize::new(w, 2.0 * h)
    };

    let (slide, note) = match placement {
        Placement::Left => (Rect::new(w, 0.0, w, h), Rect::new(0.0, 0.0, w, h)),
        Placement::Right => (Rect::new(0.0, 0.0, w, h), Rect::new(w, 0.0, w, h)),
        Placement::Top => (Rect::new(0.0, 0.0, w, h), Rect::new(0.0, h, w, h)),
        Placement::Bottom => (Rect::new(0.0, h, w, h), Rect::new(0.0, 0.0, w, h)),
    };

    CanvasLayout { canvas, slide, note }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_placement() {
        let layout = resolve(PageSize::new(600.0, 800.0), Placement::Left);
        assert_eq!(layout.canvas, PageSize::new(1200.0, 800.0));
        assert_eq!(layout.slide, Rect::new(600.0, 0.0, 600.0, 800.0));
        assert_eq!(layout.note, Rect::new(0.0, 0.0, 600.0, 800.0));
    }

    #[test]
    fn test_vertical_placements_double_height() {
        let page = PageSize::new(720.0, 540.0);

        let top = resolve(page, Placement::Top);
        assert_eq!(top.canvas, PageSize::new(720.0, 1080.0));
        assert_eq!(top.slide, Rect::new(0.0, 0.0, 720.0, 540.0));
        assert_eq!(top.note, Rect::new(0.0, 540.0, 720.0, 540.0));

        let bottom = resolve(page, Placement::Bottom);
        assert_eq!(bottom.slide, Rect::new(0.0, 540.0, 720.0, 540.0));
        assert_eq!(bottom.note, Rect::new(0.0, 0.0, 720.0, 540.0));
    }

    #[test]
    fn test_regions_tile_canvas() {
        let page = PageSize::new(612.0, 792.0);

        for placement in Placement::ALL {
            let layout = resolve(page, placement);
            let canvas = layout.canvas_rect();

            assert!(canvas.contains_rect(&layout.slide), "{placement}");
            assert!(canvas.contains_rect(&layout.note), "{placement}");
            assert!(layout.slide.intersection(&layout.note).is_none(), "{placement}");
            let area = |r: Rect| r.width * r.height;
            assert_eq!(area(layout.slide) + area(layout.note), area(canvas), "{placement}");
        }
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let page = PageSize::new(300.5, 400.25);
        for placement in Placement::ALL {
            assert_eq!(resolve(page, placement), resolve(page, placement));
        }
    }
}
