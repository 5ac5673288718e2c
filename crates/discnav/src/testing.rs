//! In-memory collaborators for unit tests.

use std::collections::VecDeque;

use crate::events::{NavCommand, NavEvent};
use crate::geometry::{DisplayRes, Point, Rect, Size};
use crate::host::{InputBindings, OsdCompositor, PlaybackHost, Player, SectionFlags, StopPlay};
use crate::render::display_to_video;
use crate::source::NavSource;
use crate::store::OsdHandle;

#[derive(Default)]
pub struct MockSource {
    pub supports_navigation: bool,
    pub events: VecDeque<NavEvent>,
    pub commands: Vec<NavCommand>,
    pub cache_resumes: usize,
}

impl MockSource {
    pub fn navigable() -> Self {
        Self {
            supports_navigation: true,
            ..Self::default()
        }
    }

    pub fn queue(&mut self, events: impl IntoIterator<Item = NavEvent>) {
        self.events.extend(events);
    }

    pub fn count(&self, cmd: &NavCommand) -> usize {
        self.commands.iter().filter(|c| *c == cmd).count()
    }
}

impl NavSource for MockSource {
    fn nav_command(&mut self, cmd: NavCommand) -> bool {
        if cmd == NavCommand::Enable && !self.supports_navigation {
            return false;
        }
        self.commands.push(cmd);
        true
    }

    fn next_event(&mut self) -> Option<NavEvent> {
        self.events.pop_front()
    }

    fn resume_cache(&mut self) {
        self.cache_resumes += 1;
    }
}

pub struct MockPlayback {
    pub encoding: bool,
    pub video: Option<Size>,
    pub subtitle: Option<Size>,
    pub stop: StopPlay,
    pub extensions: Vec<f64>,
    pub notifications: Vec<String>,
    pub stop_writes: Vec<StopPlay>,
}

impl Default for MockPlayback {
    fn default() -> Self {
        Self {
            encoding: false,
            video: Some(Size::new(720, 480)),
            subtitle: None,
            stop: StopPlay::KeepPlaying,
            extensions: Vec::new(),
            notifications: Vec::new(),
            stop_writes: Vec::new(),
        }
    }
}

impl PlaybackHost for MockPlayback {
    fn is_encoding(&self) -> bool {
        self.encoding
    }

    fn video_size(&self) -> Option<Size> {
        self.video
    }

    fn subtitle_size(&self) -> Option<Size> {
        self.subtitle
    }

    fn stop_play(&self) -> StopPlay {
        self.stop
    }

    fn set_stop_play(&mut self, state: StopPlay) {
        self.stop = state;
        self.stop_writes.push(state);
    }

    fn extend_presentation(&mut self, seconds: f64) {
        self.extensions.push(seconds);
    }

    fn notify_property(&mut self, name: &str) {
        self.notifications.push(name.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCall {
    Enable(String, SectionFlags),
    Disable(String),
    MouseArea(String, Rect),
}

#[derive(Default)]
pub struct MockInput {
    pub calls: Vec<InputCall>,
    pub mouse: Point,
}

impl InputBindings for MockInput {
    fn enable_section(&mut self, name: &str, flags: SectionFlags) {
        self.calls.push(InputCall::Enable(name.to_string(), flags));
    }

    fn disable_section(&mut self, name: &str) {
        self.calls.push(InputCall::Disable(name.to_string()));
    }

    fn set_section_mouse_area(&mut self, name: &str, area: Rect) {
        self.calls.push(InputCall::MouseArea(name.to_string(), area));
    }

    fn mouse_pos(&self) -> Point {
        self.mouse
    }
}

pub struct MockOsd {
    pub res: DisplayRes,
    /// One entry per `set_nav_highlight` call: attached or detached.
    pub attached: Vec<Option<OsdHandle>>,
}

impl Default for MockOsd {
    fn default() -> Self {
        Self {
            res: DisplayRes::new(1280, 960),
            attached: Vec::new(),
        }
    }
}

impl MockOsd {
    pub fn marks(&self) -> usize {
        self.attached.iter().filter(|a| a.is_some()).count()
    }

    pub fn detaches(&self) -> usize {
        self.attached.iter().filter(|a| a.is_none()).count()
    }
}

impl OsdCompositor for MockOsd {
    fn set_nav_highlight(&mut self, source: Option<OsdHandle>) {
        self.attached.push(source);
    }

    fn coords_to_video(&self, video: Size, p: Point) -> Point {
        display_to_video(&self.res, video, p)
    }
}

/// All four collaborators, owned together.
#[derive(Default)]
pub struct Harness {
    pub source: MockSource,
    pub playback: MockPlayback,
    pub input: MockInput,
    pub osd: MockOsd,
}

impl Harness {
    pub fn navigable() -> Self {
        Self {
            source: MockSource::navigable(),
            ..Self::default()
        }
    }

    pub fn player(&mut self) -> Player<'_> {
        Player::new(
            &mut self.source,
            &mut self.playback,
            &mut self.input,
            &mut self.osd,
        )
    }
}
