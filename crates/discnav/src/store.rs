use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::bitmap::{Bitmap, OverlayImage};
use crate::geometry::{Rect, Size};

/// Still-frame hold state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StillFrame {
    #[default]
    Idle,
    /// Source asked for a hold of this many seconds; applied at end of stream.
    Pending(u32),
    /// Hold has been applied; the source must be told to skip it.
    AppliedAwaitingSkip,
}

impl StillFrame {
    /// Legacy integer encoding: 0 idle, N pending, -2 applied.
    pub fn as_raw(&self) -> i32 {
        match *self {
            StillFrame::Idle => 0,
            StillFrame::Pending(n) => n as i32,
            StillFrame::AppliedAwaitingSkip => -2,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == StillFrame::Idle
    }
}

/// Fields shared with the OSD renderer. Only touched with the lock held.
pub(crate) struct OsdShared {
    pub(crate) highlight_visible: bool,
    pub(crate) highlight: Rect,
    pub(crate) video_size: Size,
    /// Size `highlight_bitmap` was built for.
    pub(crate) rendered_size: Size,
    pub(crate) highlight_bitmap: Option<Arc<Bitmap>>,
    pub(crate) overlays: [Option<OverlayImage>; 2],
    pub(crate) gray: u8,
}

impl OsdShared {
    fn new(gray: u8) -> Self {
        Self {
            highlight_visible: false,
            highlight: Rect::default(),
            video_size: Size::default(),
            rendered_size: Size::default(),
            highlight_bitmap: None,
            overlays: [None, None],
            gray,
        }
    }
}

/// Plain copy of the shared fields, for status displays and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsdSnapshot {
    pub highlight_visible: bool,
    pub highlight: Rect,
    pub video_size: Size,
    pub rendered_size: Size,
    pub has_bitmap: bool,
    pub overlays: [bool; 2],
}

/// Cloneable handle to the lock-protected overlay state. This is what the OSD
/// compositor holds, possibly on another thread.
#[derive(Clone)]
pub struct OsdHandle {
    shared: Arc<Mutex<OsdShared>>,
}

impl fmt::Debug for OsdHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsdHandle").finish_non_exhaustive()
    }
}

impl OsdHandle {
    pub(crate) fn new(gray: u8) -> Self {
        Self {
            shared: Arc::new(Mutex::new(OsdShared::new(gray))),
        }
    }

    /// Lock the shared fields. A panic on another thread cannot leave them
    /// half-written in a way that matters, so poisoning is cleared.
    pub(crate) fn lock(&self) -> MutexGuard<'_, OsdShared> {
        self.shared.lock().unwrap_or_else(|poisoned| {
            log::warn!("Navigation OSD lock was poisoned, recovering");
            self.shared.clear_poison();
            poisoned.into_inner()
        })
    }

    /// Same underlying state?
    pub fn ptr_eq(&self, other: &OsdHandle) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn set_highlight(&self, display: bool, rect: Rect) {
        let mut osd = self.lock();
        osd.highlight = rect;
        osd.highlight_visible = display;
    }

    pub fn hide_highlight(&self) {
        self.lock().highlight_visible = false;
    }

    /// Take ownership of new overlay images. Each slot's previous image is dropped
    /// as it is overwritten.
    pub fn replace_overlays(&self, images: [Option<OverlayImage>; 2]) {
        let mut osd = self.lock();
        for (slot, image) in osd.overlays.iter_mut().zip(images) {
            *slot = image;
        }
    }

    pub fn set_video_size(&self, size: Size) {
        self.lock().video_size = size;
    }

    /// Drop owned images and the cached bitmap. Later render calls produce nothing.
    pub fn release(&self) {
        let mut osd = self.lock();
        osd.overlays = [None, None];
        osd.highlight_bitmap = None;
        osd.highlight_visible = false;
        osd.video_size = Size::default();
        osd.rendered_size = Size::default();
    }

    pub fn snapshot(&self) -> OsdSnapshot {
        let osd = self.lock();
        OsdSnapshot {
            highlight_visible: osd.highlight_visible,
            highlight: osd.highlight,
            video_size: osd.video_size,
            rendered_size: osd.rendered_size,
            has_bitmap: osd.highlight_bitmap.is_some(),
            overlays: [osd.overlays[0].is_some(), osd.overlays[1].is_some()],
        }
    }

    /// The cached highlight bitmap, if one has been built.
    pub fn highlight_bitmap(&self) -> Option<Arc<Bitmap>> {
        self.lock().highlight_bitmap.clone()
    }
}

/// Per-session navigation state. Created when navigation is enabled, dropped when
/// the session ends.
#[derive(Debug)]
pub struct NavState {
    pub still_frame: StillFrame,
    pub eof: bool,
    pub in_menu: bool,
    pub draining: bool,
    osd: OsdHandle,
}

impl NavState {
    pub fn new(gray: u8) -> Self {
        Self {
            still_frame: StillFrame::Idle,
            eof: false,
            in_menu: false,
            draining: false,
            osd: OsdHandle::new(gray),
        }
    }

    pub fn osd(&self) -> &OsdHandle {
        &self.osd
    }
}
