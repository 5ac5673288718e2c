use crate::config::NavConfig;
use crate::dispatch::{self, DispatchOutcome};
use crate::events::NavCommand;
use crate::geometry::Rect;
use crate::host::{Player, SectionFlags};
use crate::store::{NavState, OsdHandle, StillFrame};

/// Whether the source is showing a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuStatus {
    InMenu,
    InVideo,
    /// No navigation session.
    Unavailable,
}

impl MenuStatus {
    /// 1 in a menu, 0 in video, -1 without navigation.
    pub fn as_raw(self) -> i32 {
        match self {
            MenuStatus::InMenu => 1,
            MenuStatus::InVideo => 0,
            MenuStatus::Unavailable => -1,
        }
    }
}

/// Disc navigation controller for one player.
///
/// Holds no state until [`Navigator::init`] succeeds; every other entry point is a
/// no-op (or reports [`MenuStatus::Unavailable`]) until then.
pub struct Navigator {
    state: Option<NavState>,
    config: NavConfig,
}

impl Navigator {
    pub fn new(config: NavConfig) -> Self {
        Self {
            state: None,
            config,
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Enable navigation on the current source. Must run before the source starts
    /// buffering, otherwise it may skip menu screens while reading ahead.
    ///
    /// Returns `true` when a navigation session was started.
    pub fn init(&mut self, player: &mut Player<'_>) -> bool {
        debug_assert!(self.state.is_none(), "navigation initialized twice");
        if self.state.is_some() {
            log::warn!("Navigation already initialized, ignoring");
            return false;
        }
        if !self.config.enabled {
            log::debug!("Disc navigation disabled in config");
            return false;
        }
        // Menus need a viewer.
        if player.playback.is_encoding() {
            log::debug!("Encoding session, not enabling navigation");
            return false;
        }
        if !player.source.nav_command(NavCommand::Enable) {
            log::debug!("Source does not support navigation");
            return false;
        }

        self.state = Some(NavState::new(self.config.highlight_gray));
        log::info!("Disc navigation enabled");

        player
            .input
            .enable_section(&self.config.base_section, SectionFlags::NONE);
        player
            .input
            .set_section_mouse_area(&self.config.menu_section, Rect::everything());
        player.playback.notify_property(&self.config.menu_property);
        true
    }

    /// Return to plain playback after a seek or source restart.
    pub fn reset(&mut self, player: &mut Player<'_>) {
        let Some(nav) = self.state.as_mut() else {
            return;
        };
        player.source.nav_command(NavCommand::Resume);
        player.osd.set_nav_highlight(None);
        nav.osd().hide_highlight();
        nav.in_menu = false;
        nav.draining = false;
        nav.still_frame = StillFrame::Idle;
        player.input.disable_section(&self.config.menu_section);
        player.source.resume_cache();
        player.playback.notify_property(&self.config.menu_property);
    }

    /// End the navigation session. Safe to call without one.
    pub fn destroy(&mut self, player: &mut Player<'_>) {
        player.osd.set_nav_highlight(None);
        let Some(nav) = self.state.take() else {
            return;
        };
        player.input.disable_section(&self.config.base_section);
        player.input.disable_section(&self.config.menu_section);
        nav.osd().release();
        log::info!("Disc navigation disabled");
        player.playback.notify_property(&self.config.menu_property);
    }

    /// Forward a user action. `"mouse_move"` sends the pointer position in video
    /// coordinates, anything else is passed through as a menu action.
    pub fn user_input(&mut self, player: &mut Player<'_>, command: &str) {
        if self.state.is_none() {
            return;
        }
        if command == "mouse_move" {
            let video = player.playback.video_size().unwrap_or_default();
            let p = player.osd.coords_to_video(video, player.input.mouse_pos());
            player
                .source
                .nav_command(NavCommand::MousePos { x: p.x, y: p.y });
        } else {
            player
                .source
                .nav_command(NavCommand::Menu(command.to_string()));
        }
    }

    pub fn menu_status(&self) -> MenuStatus {
        match &self.state {
            Some(nav) if nav.in_menu => MenuStatus::InMenu,
            Some(_) => MenuStatus::InVideo,
            None => MenuStatus::Unavailable,
        }
    }

    pub fn in_menu(&self) -> i32 {
        self.menu_status().as_raw()
    }

    /// Pump the source's event queue. `None` without a navigation session.
    pub fn handle_events(&mut self, player: &mut Player<'_>) -> Option<DispatchOutcome> {
        let nav = self.state.as_mut()?;
        Some(dispatch::handle_events(nav, &self.config, player))
    }

    /// Overlay source for the OSD compositor.
    pub fn osd_handle(&self) -> Option<OsdHandle> {
        self.state.as_ref().map(|nav| nav.osd().clone())
    }

    pub fn still_frame(&self) -> StillFrame {
        self.state
            .as_ref()
            .map_or(StillFrame::Idle, |nav| nav.still_frame)
    }

    pub fn is_draining(&self) -> bool {
        self.state.as_ref().is_some_and(|nav| nav.draining)
    }

    pub fn is_eof(&self) -> bool {
        self.state.as_ref().is_some_and(|nav| nav.eof)
    }
}
