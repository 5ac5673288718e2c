use crate::config::NavConfig;
use crate::events::{NavCommand, NavEvent};
use crate::geometry::Rect;
use crate::host::{Player, SectionFlags, StopPlay};
use crate::store::{NavState, StillFrame};

/// What the drain loop should do after one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    /// The source is being reloaded. Stop pulling events; anything still queued
    /// belongs to the new session.
    Reload,
}

/// Result of one `handle_events` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Queue emptied and end-of-stream handling ran.
    Drained { events: usize },
    /// A reset-all event requested a reload; the rest of the queue is untouched.
    Reloading,
}

/// Refresh the video size the overlays are laid out in.
pub(crate) fn update_resolution(nav: &NavState, player: &Player<'_>) {
    nav.osd().set_video_size(player.nav_resolution());
}

/// Apply a single navigation event.
pub fn apply_event(
    nav: &mut NavState,
    config: &NavConfig,
    event: NavEvent,
    player: &mut Player<'_>,
) -> EventFlow {
    match event {
        NavEvent::Drain => {
            nav.draining = true;
            log::debug!("drain requested");
        }
        NavEvent::ResetAll => {
            player.playback.set_stop_play(StopPlay::ReloadSource);
            log::debug!("reload");
            return EventFlow::Reload;
        }
        NavEvent::Reset => {
            nav.still_frame = StillFrame::Idle;
        }
        NavEvent::Eof => {
            nav.eof = true;
        }
        NavEvent::StillFrame { seconds } => {
            log::debug!("wait for {seconds} seconds");
            if seconds > 0 && nav.still_frame.is_idle() {
                nav.still_frame = StillFrame::Pending(seconds as u32);
            }
        }
        NavEvent::MenuMode { enable } => {
            nav.in_menu = enable;
            if enable {
                player
                    .input
                    .enable_section(&config.menu_section, SectionFlags::ON_TOP);
            } else {
                player.input.disable_section(&config.menu_section);
            }
            // Fires even when the mode did not change; observers rely on the cadence.
            player.playback.notify_property(&config.menu_property);
        }
        NavEvent::Highlight {
            display,
            sx,
            sy,
            ex,
            ey,
        } => {
            log::debug!("highlight: {display} {sx} {sy} - {ex} {ey}");
            nav.osd().set_highlight(display, Rect::new(sx, sy, ex, ey));
            update_resolution(nav, player);
            player.osd.set_nav_highlight(Some(nav.osd().clone()));
        }
        NavEvent::Overlay { images } => {
            nav.osd().replace_overlays(images);
            update_resolution(nav, player);
            player.osd.set_nav_highlight(Some(nav.osd().clone()));
        }
        NavEvent::Other(kind) => {
            log::trace!("ignoring navigation event {kind}");
        }
    }
    EventFlow::Continue
}

/// Drain all pending navigation events, then run end-of-stream handling.
///
/// Called once per playback iteration. When the demuxer hit end of file but the
/// source has not signalled a real end, playback is kept going so still frames
/// and menus stay on screen.
pub fn handle_events(
    nav: &mut NavState,
    config: &NavConfig,
    player: &mut Player<'_>,
) -> DispatchOutcome {
    let mut handled = 0;
    while let Some(event) = player.source.next_event() {
        handled += 1;
        log::trace!("navigation event: {}", event.name());
        if apply_event(nav, config, event, player) == EventFlow::Reload {
            return DispatchOutcome::Reloading;
        }
    }

    update_resolution(nav, player);

    let at_eof = player.playback.stop_play() == StopPlay::AtEndOfFile;
    if at_eof {
        match nav.still_frame {
            StillFrame::Pending(seconds) => {
                player.playback.extend_presentation(f64::from(seconds));
                nav.still_frame = StillFrame::AppliedAwaitingSkip;
            }
            StillFrame::AppliedAwaitingSkip => {
                player.source.nav_command(NavCommand::SkipStill);
            }
            StillFrame::Idle => {}
        }
    }

    if nav.draining && at_eof {
        log::debug!("execute drain");
        player.source.nav_command(NavCommand::DrainOk);
        nav.draining = false;
        player.source.resume_cache();
    }

    if at_eof && !nav.eof {
        player.playback.set_stop_play(StopPlay::KeepPlaying);
    }

    DispatchOutcome::Drained { events: handled }
}
