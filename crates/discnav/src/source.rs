use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::events::{NavCommand, NavEvent};

/// Control surface of a navigation-capable source (a disc stream).
pub trait NavSource {
    /// Send a command. Only the answer to `Enable` carries meaning: `false` means
    /// the source cannot navigate.
    fn nav_command(&mut self, cmd: NavCommand) -> bool;

    /// Pop the next pending event, `None` once the queue is empty.
    fn next_event(&mut self) -> Option<NavEvent>;

    /// Ask the source to resume a cache/buffering layer paused for a drain.
    fn resume_cache(&mut self);
}

/// What the player side sends to the disc backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMessage {
    Command(NavCommand),
    ResumeCache,
}

/// `NavSource` over a pair of channels; the disc backend lives on the other end,
/// usually on its own thread.
pub struct ChannelSource {
    supports_navigation: bool,
    to_backend: Sender<SourceMessage>,
    from_backend: Receiver<NavEvent>,
}

/// Backend half of a [`ChannelSource`].
pub struct SourceEndpoint {
    from_player: Receiver<SourceMessage>,
    to_player: Sender<NavEvent>,
}

/// Create a connected source/endpoint pair.
///
/// Both directions are unbounded: dropping a `DrainOk` or an overlay image would
/// wedge the menu state, so backpressure is left to the backend.
pub fn channel_source(supports_navigation: bool) -> (ChannelSource, SourceEndpoint) {
    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
    let (ev_tx, ev_rx) = crossbeam_channel::unbounded();
    (
        ChannelSource {
            supports_navigation,
            to_backend: cmd_tx,
            from_backend: ev_rx,
        },
        SourceEndpoint {
            from_player: cmd_rx,
            to_player: ev_tx,
        },
    )
}

impl ChannelSource {
    fn send(&self, msg: SourceMessage) -> bool {
        match self.to_backend.send(msg) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Navigation backend gone, dropping {:?}", e.into_inner());
                false
            }
        }
    }

    /// Number of events waiting to be pulled.
    pub fn pending_events(&self) -> usize {
        self.from_backend.len()
    }
}

impl NavSource for ChannelSource {
    fn nav_command(&mut self, cmd: NavCommand) -> bool {
        if cmd == NavCommand::Enable && !self.supports_navigation {
            return false;
        }
        self.send(SourceMessage::Command(cmd))
    }

    fn next_event(&mut self) -> Option<NavEvent> {
        self.from_backend.try_recv().ok()
    }

    fn resume_cache(&mut self) {
        self.send(SourceMessage::ResumeCache);
    }
}

impl SourceEndpoint {
    /// Queue an event for the player. Returns `false` if the player side is gone.
    pub fn push(&self, event: NavEvent) -> bool {
        self.to_player.send(event).is_ok()
    }

    /// Everything the player sent since the last call.
    pub fn drain(&self) -> Vec<SourceMessage> {
        self.from_player.try_iter().collect()
    }

    /// Block for the next message, up to `timeout`. `Err(true)` once the player
    /// side has disconnected, `Err(false)` on plain timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<SourceMessage, bool> {
        match self.from_player.recv_timeout(timeout) {
            Ok(msg) => Ok(msg),
            Err(RecvTimeoutError::Timeout) => Err(false),
            Err(RecvTimeoutError::Disconnected) => Err(true),
        }
    }
}
