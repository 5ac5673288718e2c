use serde::{Deserialize, Serialize};

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// A size is usable only if both dimensions are at least one pixel.
    pub fn is_valid(&self) -> bool {
        self.w >= 1 && self.h >= 1
    }

    /// Pixel count, or zero for an invalid size.
    pub fn area(&self) -> usize {
        if self.is_valid() {
            (self.w as usize).saturating_mul(self.h as usize)
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle stored as start (inclusive) and end (exclusive) corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub start: Point,
    pub end: Point,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            start: Point::new(x0, y0),
            end: Point::new(x1, y1),
        }
    }

    /// The whole coordinate plane. Used for "catch every mouse position" areas.
    pub const fn everything() -> Self {
        Self::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX)
    }

    pub fn width(&self) -> i32 {
        self.end.x.saturating_sub(self.start.x)
    }

    pub fn height(&self) -> i32 {
        self.end.y.saturating_sub(self.start.y)
    }

    /// Non-negative extent. Inverted rectangles are empty.
    pub fn size(&self) -> Size {
        Size::new(self.width().max(0), self.height().max(0))
    }

    /// The part of the rectangle inside `(0,0)-bounds`. The start is clamped into
    /// the bounds and the extent to the room left after it, so a rectangle lying
    /// outside the bounds comes out empty.
    pub fn clamp_to(&self, bounds: Size) -> Rect {
        let (bw, bh) = (bounds.w.max(0), bounds.h.max(0));
        let x = self.start.x.clamp(0, bw);
        let y = self.start.y.clamp(0, bh);
        let w = self.end.x.saturating_sub(x).clamp(0, bw - x);
        let h = self.end.y.saturating_sub(y).clamp(0, bh - y);
        Rect::new(x, y, x + w, y + h)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.start.x && p.x < self.end.x && p.y >= self.start.y && p.y < self.end.y
    }
}

/// Target resolution handed to the renderer by the OSD compositor.
///
/// Margins describe the part of the display not covered by video; the video
/// occupies `w - ml - mr` by `h - mt - mb` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRes {
    pub w: i32,
    pub h: i32,
    pub ml: i32,
    pub mt: i32,
    pub mr: i32,
    pub mb: i32,
    /// Pixel aspect ratio of the display, 1.0 for square pixels.
    pub display_par: f64,
}

impl DisplayRes {
    pub const fn new(w: i32, h: i32) -> Self {
        Self {
            w,
            h,
            ml: 0,
            mt: 0,
            mr: 0,
            mb: 0,
            display_par: 1.0,
        }
    }

    pub const fn with_margins(mut self, ml: i32, mt: i32, mr: i32, mb: i32) -> Self {
        self.ml = ml;
        self.mt = mt;
        self.mr = mr;
        self.mb = mb;
        self
    }

    /// Area actually covered by video.
    pub fn video_area(&self) -> Size {
        Size::new(self.w - self.ml - self.mr, self.h - self.mt - self.mb)
    }
}
