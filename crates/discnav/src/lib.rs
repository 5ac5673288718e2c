//! Disc menu navigation for a media player.
//!
//! A navigation-capable source (DVD/Blu-ray style) emits events: menu mode
//! changes, still frames, drain requests, button highlights and subpicture
//! overlays. [`Navigator`] pumps those events once per playback iteration,
//! steers the player around them, and exposes an [`OsdHandle`] the OSD
//! compositor renders from on its own thread.

pub mod bitmap;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod geometry;
pub mod host;
pub mod render;
pub mod session;
pub mod source;
pub mod store;

#[cfg(test)]
mod testing;

pub use bitmap::{Bitmap, NEUTRAL_GRAY, OverlayImage, OverlayPart};
pub use config::NavConfig;
pub use dispatch::{DispatchOutcome, EventFlow};
pub use error::{NavError, Result};
pub use events::{NavCommand, NavEvent};
pub use geometry::{DisplayRes, Point, Rect, Size};
pub use host::{InputBindings, OsdCompositor, PlaybackHost, Player, SectionFlags, StopPlay};
pub use session::{MenuStatus, Navigator};
pub use source::{ChannelSource, NavSource, SourceEndpoint, SourceMessage, channel_source};
pub use store::{NavState, OsdHandle, OsdSnapshot, StillFrame};
