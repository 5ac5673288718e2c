use std::sync::Arc;

use crate::bitmap::{Bitmap, OverlayPart};
use crate::geometry::{DisplayRes, Point, Size};
use crate::store::OsdHandle;

impl OsdHandle {
    /// Compose the navigation overlay for a display of resolution `res`.
    ///
    /// Returns up to three parts in fixed order: the synthetic highlight box, then
    /// overlay slot 0, then slot 1, all rescaled from video space to `res`. The
    /// lock is held for the whole call so the parts form a consistent snapshot.
    ///
    /// The highlight is drawn "fake": a gray block the compositor colorizes,
    /// rather than the disc's own highlight palette.
    pub fn render(&self, res: &DisplayRes) -> Vec<OverlayPart> {
        let mut osd = self.lock();

        let video = osd.video_size;
        if !video.is_valid() {
            return Vec::new();
        }

        if video != osd.rendered_size || osd.highlight_bitmap.is_none() {
            match Bitmap::try_filled(video, osd.gray) {
                Ok(bitmap) => {
                    osd.highlight_bitmap = Some(Arc::new(bitmap));
                    osd.rendered_size = video;
                }
                Err(e) => {
                    log::warn!("Skipping navigation overlay: {e}");
                    osd.highlight_bitmap = None;
                    osd.rendered_size = Size::default();
                    return Vec::new();
                }
            }
        }

        let mut parts = Vec::with_capacity(3);

        if osd.highlight_visible {
            let area = osd.highlight.clamp_to(video);
            let size = area.size();
            if size.w > 0 && size.h > 0 {
                if let Some(bitmap) = &osd.highlight_bitmap {
                    parts.push(OverlayPart::new(Arc::clone(bitmap), area.start, size));
                }
            }
        }

        parts.extend(osd.overlays.iter().flatten().map(OverlayPart::from_overlay));

        if !parts.is_empty() {
            rescale_parts(&mut parts, video, res);
        }
        parts
    }
}

/// Map parts positioned in a `frame`-sized video into display space.
///
/// The vertical scale always fills the video area; the horizontal scale is
/// corrected for the display pixel aspect and the result centered.
pub fn rescale_parts(parts: &mut [OverlayPart], frame: Size, res: &DisplayRes) {
    if !frame.is_valid() {
        return;
    }
    let area = res.video_area();
    let mut xscale = area.w as f64 / frame.w as f64;
    let yscale = area.h as f64 / frame.h as f64;

    let par = if res.display_par > 0.0 { res.display_par } else { 1.0 };
    let compensate = xscale / yscale / par;
    if compensate > 0.0 {
        xscale /= compensate;
    }
    let cx = area.w / 2 - (frame.w as f64 * xscale) as i32 / 2;

    for part in parts {
        part.x = (part.x as f64 * xscale) as i32 + cx + res.ml;
        part.y = (part.y as f64 * yscale) as i32 + res.mt;
        part.dw = (part.w as f64 * xscale + 0.5) as i32;
        part.dh = (part.h as f64 * yscale + 0.5) as i32;
    }
}

/// Map a display position back into `video` pixel coordinates.
///
/// Mouse positions on the margins map outside the video; the source decides what
/// that means. An unusable geometry leaves the point unchanged.
pub fn display_to_video(res: &DisplayRes, video: Size, p: Point) -> Point {
    let area = res.video_area();
    if !video.is_valid() || !area.is_valid() {
        return p;
    }
    let xscale = area.w as f64 / video.w as f64;
    let yscale = area.h as f64 / video.h as f64;
    Point::new(
        ((p.x - res.ml) as f64 / xscale) as i32,
        ((p.y - res.mt) as f64 / yscale) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{NEUTRAL_GRAY, OverlayImage};
    use crate::geometry::Rect;
    use crate::store::NavState;

    fn overlay(x: i32, y: i32, w: i32, h: i32) -> OverlayImage {
        OverlayImage::new(Point::new(x, y), Bitmap::try_filled(Size::new(w, h), 0xFF).unwrap())
    }

    fn state_with_video(w: i32, h: i32) -> NavState {
        let nav = NavState::new(NEUTRAL_GRAY);
        nav.osd().set_video_size(Size::new(w, h));
        nav
    }

    #[test]
    fn highlight_scaled_by_two() {
        let nav = state_with_video(640, 480);
        nav.osd().set_highlight(true, Rect::new(10, 10, 110, 60));

        let parts = nav.osd().render(&DisplayRes::new(1280, 960));

        assert_eq!(parts.len(), 1);
        let p = &parts[0];
        assert_eq!((p.x, p.y), (20, 20));
        assert_eq!((p.dw, p.dh), (200, 100));
        assert_eq!((p.w, p.h), (100, 50));
        assert_eq!(p.stride, 400);
    }

    #[test]
    fn invalid_video_size_renders_nothing() {
        let nav = state_with_video(0, 480);
        nav.osd().set_highlight(true, Rect::new(10, 10, 110, 60));
        nav.osd().replace_overlays([Some(overlay(0, 0, 4, 4)), None]);

        assert!(nav.osd().render(&DisplayRes::new(1280, 960)).is_empty());
        assert!(nav.osd().highlight_bitmap().is_none());
    }

    #[test]
    fn degenerate_highlight_keeps_overlays() {
        let nav = state_with_video(720, 576);
        nav.osd().set_highlight(true, Rect::new(100, 100, 100, 200));
        nav.osd()
            .replace_overlays([Some(overlay(0, 0, 720, 576)), Some(overlay(8, 8, 16, 16))]);

        let parts = nav.osd().render(&DisplayRes::new(720, 576));

        assert_eq!(parts.len(), 2);
        assert_eq!((parts[0].w, parts[0].h), (720, 576));
        assert_eq!((parts[1].x, parts[1].y), (8, 8));
    }

    #[test]
    fn inverted_highlight_renders_nothing() {
        let nav = state_with_video(720, 576);
        nav.osd().set_highlight(true, Rect::new(300, 300, 100, 100));
        assert!(nav.osd().render(&DisplayRes::new(720, 576)).is_empty());
    }

    #[test]
    fn hidden_highlight_is_skipped() {
        let nav = state_with_video(720, 576);
        nav.osd().set_highlight(false, Rect::new(10, 10, 50, 50));
        assert!(nav.osd().render(&DisplayRes::new(720, 576)).is_empty());
        // The backing bitmap is still built lazily.
        assert!(nav.osd().highlight_bitmap().is_some());
    }

    #[test]
    fn highlight_clamped_to_video() {
        let nav = state_with_video(640, 480);
        nav.osd().set_highlight(true, Rect::new(600, 400, 1000, 1000));
        let parts = nav.osd().render(&DisplayRes::new(640, 480));
        assert_eq!(parts.len(), 1);
        assert_eq!((parts[0].x, parts[0].y), (600, 400));
        assert_eq!((parts[0].w, parts[0].h), (40, 80));
    }

    #[test]
    fn highlight_with_negative_start_moved_inside() {
        let nav = state_with_video(640, 480);
        nav.osd().set_highlight(true, Rect::new(-50, -40, 30, 20));
        let parts = nav.osd().render(&DisplayRes::new(640, 480));
        assert_eq!(parts.len(), 1);
        assert_eq!((parts[0].x, parts[0].y, parts[0].w, parts[0].h), (0, 0, 30, 20));
    }

    #[test]
    fn highlight_outside_video_renders_nothing() {
        let nav = state_with_video(640, 480);
        nav.osd().set_highlight(true, Rect::new(700, 500, 800, 600));
        nav.osd().replace_overlays([Some(overlay(0, 0, 4, 4)), None]);
        let parts = nav.osd().render(&DisplayRes::new(640, 480));
        assert_eq!(parts.len(), 1);
        assert_eq!((parts[0].w, parts[0].h), (4, 4));
    }

    #[test]
    fn failed_allocation_only_empties_that_frame() {
        let nav = state_with_video(i32::MAX, i32::MAX);
        nav.osd().set_highlight(true, Rect::new(10, 10, 110, 60));
        assert!(nav.osd().render(&DisplayRes::new(1280, 960)).is_empty());
        assert!(nav.osd().highlight_bitmap().is_none());

        nav.osd().set_video_size(Size::new(640, 480));
        let parts = nav.osd().render(&DisplayRes::new(1280, 960));
        assert_eq!(parts.len(), 1);
        assert_eq!((parts[0].x, parts[0].y), (20, 20));
        assert_eq!(nav.osd().snapshot().rendered_size, Size::new(640, 480));
    }

    #[test]
    fn highlight_comes_first() {
        let nav = state_with_video(640, 480);
        nav.osd().replace_overlays([None, Some(overlay(1, 2, 3, 4))]);
        nav.osd().set_highlight(true, Rect::new(10, 10, 20, 20));
        let parts = nav.osd().render(&DisplayRes::new(640, 480));
        assert_eq!(parts.len(), 2);
        assert_eq!((parts[0].x, parts[0].y, parts[0].w), (10, 10, 10));
        assert_eq!((parts[1].x, parts[1].y, parts[1].w), (1, 2, 3));
    }

    #[test]
    fn bitmap_reused_while_size_unchanged() {
        let nav = state_with_video(640, 480);
        nav.osd().set_highlight(true, Rect::new(0, 0, 10, 10));
        let res = DisplayRes::new(640, 480);

        let first = nav.osd().render(&res);
        let cached = nav.osd().highlight_bitmap().unwrap();
        let second = nav.osd().render(&res);

        assert!(Arc::ptr_eq(&first[0].bitmap, &second[0].bitmap));
        assert!(Arc::ptr_eq(&cached, &second[0].bitmap));
    }

    #[test]
    fn bitmap_rebuilt_on_resize() {
        let nav = state_with_video(640, 480);
        nav.osd().set_highlight(true, Rect::new(0, 0, 10, 10));
        let res = DisplayRes::new(1280, 720);

        nav.osd().render(&res);
        let before = nav.osd().highlight_bitmap().unwrap();

        nav.osd().set_video_size(Size::new(720, 576));
        nav.osd().render(&res);
        let after = nav.osd().highlight_bitmap().unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.size(), Size::new(720, 576));
        assert!(after.as_bytes().iter().all(|&b| b == NEUTRAL_GRAY));
        assert_eq!(nav.osd().snapshot().rendered_size, Size::new(720, 576));
    }

    #[test]
    fn render_after_release_is_empty() {
        let nav = state_with_video(640, 480);
        nav.osd().set_highlight(true, Rect::new(0, 0, 10, 10));
        nav.osd().replace_overlays([Some(overlay(0, 0, 2, 2)), None]);
        assert_eq!(nav.osd().render(&DisplayRes::new(640, 480)).len(), 2);

        nav.osd().release();
        assert!(nav.osd().render(&DisplayRes::new(640, 480)).is_empty());
    }

    #[test]
    fn custom_gray_level() {
        let nav = NavState::new(0x40);
        nav.osd().set_video_size(Size::new(2, 2));
        nav.osd().render(&DisplayRes::new(2, 2));
        let bmp = nav.osd().highlight_bitmap().unwrap();
        assert!(bmp.as_bytes().iter().all(|&b| b == 0x40));
    }

    #[test]
    fn rescale_with_margins() {
        let bmp = Arc::new(Bitmap::try_filled(Size::new(1, 1), 0).unwrap());
        let mut parts = vec![OverlayPart::new(bmp, Point::new(100, 50), Size::new(20, 10))];
        let res = DisplayRes::new(1000, 600).with_margins(100, 50, 100, 70);
        // video area 800x480 for a 400x240 frame: 2x both ways
        rescale_parts(&mut parts, Size::new(400, 240), &res);
        let p = &parts[0];
        assert_eq!((p.x, p.y, p.dw, p.dh), (300, 150, 40, 20));
    }

    #[test]
    fn rescale_compensates_aspect() {
        let bmp = Arc::new(Bitmap::try_filled(Size::new(1, 1), 0).unwrap());
        let mut parts = vec![OverlayPart::new(bmp, Point::new(0, 0), Size::new(720, 480))];
        rescale_parts(&mut parts, Size::new(720, 480), &DisplayRes::new(1920, 1080));
        let p = &parts[0];
        // Height fills 1080 (2.25x); width uses the same factor and is centered.
        assert_eq!((p.x, p.y), (150, 0));
        assert_eq!((p.dw, p.dh), (1620, 1080));
    }

    #[test]
    fn display_to_video_inverts_scale() {
        let res = DisplayRes::new(1280, 960);
        let video = Size::new(640, 480);
        assert_eq!(display_to_video(&res, video, Point::new(20, 20)), Point::new(10, 10));
        assert_eq!(display_to_video(&res, video, Point::new(1279, 959)), Point::new(639, 479));
    }

    #[test]
    fn display_to_video_subtracts_margins() {
        let res = DisplayRes::new(1000, 600).with_margins(100, 50, 100, 70);
        let p = display_to_video(&res, Size::new(400, 240), Point::new(300, 150));
        assert_eq!(p, Point::new(100, 50));
    }

    #[test]
    fn display_to_video_unknown_video_passthrough() {
        let res = DisplayRes::new(1280, 960);
        let p = Point::new(42, 17);
        assert_eq!(display_to_video(&res, Size::default(), p), p);
    }

    #[test]
    fn render_from_another_thread() {
        let nav = state_with_video(640, 480);
        nav.osd().set_highlight(true, Rect::new(10, 10, 110, 60));
        let handle = nav.osd().clone();

        let renderer = std::thread::spawn(move || {
            let mut counts = Vec::new();
            for _ in 0..50 {
                counts.push(handle.render(&DisplayRes::new(1280, 960)).len());
            }
            counts
        });
        for i in 0..50 {
            nav.osd().set_highlight(i % 2 == 0, Rect::new(10, 10, 110, 60));
        }

        let counts = renderer.join().unwrap();
        assert!(counts.iter().all(|&n| n <= 1));
    }
}
