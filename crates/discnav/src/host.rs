use crate::geometry::{Point, Rect, Size};
use crate::source::NavSource;
use crate::store::OsdHandle;

/// What the playback loop should do after the current iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPlay {
    KeepPlaying,
    /// Demuxer ran out of data.
    AtEndOfFile,
    /// Tear down and reopen the current source.
    ReloadSource,
}

/// Playback engine services used by the navigation controller.
pub trait PlaybackHost {
    /// Non-interactive session (e.g. encoding to a file). Menus make no sense there.
    fn is_encoding(&self) -> bool;

    /// Decoder output resolution, if a video decoder is active.
    fn video_size(&self) -> Option<Size>;

    /// Resolution the subtitle/menu decoder renders at, if any.
    fn subtitle_size(&self) -> Option<Size>;

    fn stop_play(&self) -> StopPlay;

    fn set_stop_play(&mut self, state: StopPlay);

    /// Push the next frame deadline out by `seconds` and keep the last frame on screen.
    fn extend_presentation(&mut self, seconds: f64);

    /// Tell property observers that `name` may have changed.
    fn notify_property(&mut self, name: &str);
}

/// Flags for activating an input section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionFlags {
    /// Section takes priority over every other active section.
    pub on_top: bool,
}

impl SectionFlags {
    pub const NONE: Self = Self { on_top: false };
    pub const ON_TOP: Self = Self { on_top: true };
}

/// Input router: named binding sections plus the pointer position.
pub trait InputBindings {
    fn enable_section(&mut self, name: &str, flags: SectionFlags);

    fn disable_section(&mut self, name: &str);

    /// Restrict mouse bindings of `name` to `area` (display coordinates).
    fn set_section_mouse_area(&mut self, name: &str, area: Rect);

    /// Last known pointer position in display coordinates.
    fn mouse_pos(&self) -> Point;
}

/// OSD compositor that draws navigation overlays.
pub trait OsdCompositor {
    /// Attach (`Some`) or detach (`None`) the navigation overlay source. Attaching
    /// again also marks the overlay as changed so it is re-rendered.
    fn set_nav_highlight(&mut self, source: Option<OsdHandle>);

    /// Map a display position to video pixel coordinates for a `video`-sized frame.
    fn coords_to_video(&self, video: Size, p: Point) -> Point;
}

/// Everything the navigation controller talks to, borrowed for one call.
pub struct Player<'a> {
    pub source: &'a mut dyn NavSource,
    pub playback: &'a mut dyn PlaybackHost,
    pub input: &'a mut dyn InputBindings,
    pub osd: &'a mut dyn OsdCompositor,
}

impl<'a> Player<'a> {
    pub fn new(
        source: &'a mut dyn NavSource,
        playback: &'a mut dyn PlaybackHost,
        input: &'a mut dyn InputBindings,
        osd: &'a mut dyn OsdCompositor,
    ) -> Self {
        Self {
            source,
            playback,
            input,
            osd,
        }
    }

    /// Resolution navigation coordinates refer to: the subtitle/menu resolution
    /// when valid, the decoder output otherwise, (0,0) if neither is known.
    pub fn nav_resolution(&self) -> Size {
        self.playback
            .subtitle_size()
            .filter(Size::is_valid)
            .or_else(|| self.playback.video_size())
            .unwrap_or_default()
    }
}
