use crate::bitmap::OverlayImage;
use crate::geometry::Rect;

/// Commands sent to the navigation source. Fire-and-forget apart from `Enable`,
/// whose answer decides whether navigation is available at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    Enable,
    Resume,
    MousePos { x: i32, y: i32 },
    /// Named menu action ("up", "select", "menu", ...), passed through verbatim.
    Menu(String),
    SkipStill,
    DrainOk,
}

/// Events pulled from the navigation source, one per call.
#[derive(Debug, Clone)]
pub enum NavEvent {
    /// Source wants the demuxer to run dry before continuing.
    Drain,
    /// Title or domain change: everything must be reloaded.
    ResetAll,
    Reset,
    Eof,
    StillFrame { seconds: i32 },
    MenuMode { enable: bool },
    Highlight {
        display: bool,
        sx: i32,
        sy: i32,
        ex: i32,
        ey: i32,
    },
    Overlay { images: [Option<OverlayImage>; 2] },
    /// Anything this controller does not handle. Consumed and dropped.
    Other(u32),
}

impl NavEvent {
    pub fn highlight(display: bool, rect: Rect) -> Self {
        NavEvent::Highlight {
            display,
            sx: rect.start.x,
            sy: rect.start.y,
            ex: rect.end.x,
            ey: rect.end.y,
        }
    }

    /// Short tag for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            NavEvent::Drain => "drain",
            NavEvent::ResetAll => "reset_all",
            NavEvent::Reset => "reset",
            NavEvent::Eof => "eof",
            NavEvent::StillFrame { .. } => "still_frame",
            NavEvent::MenuMode { .. } => "menu_mode",
            NavEvent::Highlight { .. } => "highlight",
            NavEvent::Overlay { .. } => "overlay",
            NavEvent::Other(_) => "other",
        }
    }
}
