//! Vertical layout position for paginated output.
//!
//! A `Cursor` only ever moves down its page or onto a later page. All
//! measurements are PDF points (1/72 inch).

use serde::{Deserialize, Serialize};

/// Page size and margins shared by every page of a report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Space kept free above the bottom margin for the pinned footer.
    pub footer_height: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_top: 50.0,
            margin_bottom: 50.0,
            margin_left: 50.0,
            margin_right: 50.0,
            footer_height: 40.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        (self.width - self.margin_left - self.margin_right).max(0.0)
    }

    /// Height available to body content on one page.
    pub fn content_height(&self) -> f32 {
        (self.height - self.margin_top - self.margin_bottom - self.footer_height).max(0.0)
    }

    /// PDF y coordinate (origin bottom-left) of the top of the content area.
    pub fn content_top(&self) -> f32 {
        self.height - self.margin_top
    }
}

/// Where a laid-out element landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: usize,
    /// Distance from the top of the content area to the element's top edge.
    pub offset: f32,
    pub height: f32,
}

impl Placement {
    /// Baseline for text of `font_size` placed here, in PDF coordinates.
    pub fn baseline(&self, geometry: &PageGeometry, font_size: f32) -> f32 {
        geometry.content_top() - self.offset - font_size
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    page: usize,
    offset: f32,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

impl Cursor {
    pub fn start() -> Self {
        Self {
            page: 0,
            offset: 0.0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn at_page_start(&self) -> bool {
        self.offset <= f32::EPSILON
    }

    /// Reserves `height` points and returns where the element goes plus the
    /// cursor after it. Content that does not fit moves to the next page;
    /// content taller than a whole page is placed at the top of a fresh page
    /// and allowed to overflow.
    pub fn advance(self, height: f32, geometry: &PageGeometry) -> (Placement, Cursor) {
        let height = height.max(0.0);
        let start = if !self.at_page_start() && self.offset + height > geometry.content_height()
        {
            self.page_break()
        } else {
            self
        };

        let placement = Placement {
            page: start.page,
            offset: start.offset,
            height,
        };
        let next = Cursor {
            page: start.page,
            offset: start.offset + height,
        };
        (placement, next)
    }

    /// Skips vertical space without carrying it over a page boundary.
    pub fn skip(self, height: f32, geometry: &PageGeometry) -> Cursor {
        let offset = self.offset + height.max(0.0);
        if offset >= geometry.content_height() {
            self.page_break()
        } else {
            Cursor {
                page: self.page,
                offset,
            }
        }
    }

    pub fn page_break(self) -> Cursor {
        Cursor {
            page: self.page + 1,
            offset: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_page() -> PageGeometry {
        PageGeometry {
            width: 200.0,
            height: 200.0,
            margin_top: 20.0,
            margin_bottom: 20.0,
            margin_left: 10.0,
            margin_right: 10.0,
            footer_height: 10.0,
        }
    }

    #[test]
    fn test_a4_content_area() {
        let geometry = PageGeometry::a4();
        assert!((geometry.content_width() - 495.28).abs() < 0.01);
        assert!((geometry.content_height() - 701.89).abs() < 0.01);
    }

    #[test]
    fn test_advance_moves_down_the_page() {
        let geometry = small_page();
        let (placed, next) = Cursor::start().advance(30.0, &geometry);
        assert_eq!(placed.page, 0);
        assert_eq!(placed.offset, 0.0);
        assert_eq!(next.offset(), 30.0);
        assert!(!next.at_page_start());
    }

    #[test]
    fn test_overflow_starts_a_new_page() {
        let geometry = small_page();
        // content height is 150
        let (_, cursor) = Cursor::start().advance(140.0, &geometry);
        let (placed, next) = cursor.advance(20.0, &geometry);
        assert_eq!(placed.page, 1);
        assert_eq!(placed.offset, 0.0);
        assert_eq!(next.page(), 1);
        assert_eq!(next.offset(), 20.0);
    }

    #[test]
    fn test_oversized_element_at_page_start_stays_put() {
        let geometry = small_page();
        let (placed, next) = Cursor::start().advance(400.0, &geometry);
        assert_eq!(placed.page, 0);
        assert_eq!(next.page(), 0);
    }

    #[test]
    fn test_skip_never_carries_space_to_next_page() {
        let geometry = small_page();
        let (_, cursor) = Cursor::start().advance(145.0, &geometry);
        let skipped = cursor.skip(10.0, &geometry);
        assert_eq!(skipped.page(), 1);
        assert!(skipped.at_page_start());
    }

    #[test]
    fn test_baseline_is_measured_from_content_top() {
        let geometry = small_page();
        let (placed, _) = Cursor::start().advance(12.0, &geometry);
        assert_eq!(placed.baseline(&geometry, 10.0), 170.0);
    }
}
