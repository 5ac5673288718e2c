//! `discnav-sim`: drives a [`Navigator`] against a scripted disc.
//!
//! The disc backend and the OSD compositor each run on their own thread, the
//! way a real player splits demuxing, playback and video output. Pass
//! `--dump <file.png>` to write the last composed menu frame, and
//! `--config <file.json>` to use a config other than the user one.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use image::{Rgba, RgbaImage};

use discnav::render::display_to_video;
use discnav::{
    Bitmap, DispatchOutcome, DisplayRes, InputBindings, NavCommand, NavConfig, NavEvent,
    Navigator, OsdCompositor, OsdHandle, OverlayImage, OverlayPart, PlaybackHost, Player, Point,
    Rect, SectionFlags, Size, SourceEndpoint, SourceMessage, StopPlay, channel_source,
};

const VIDEO: Size = Size::new(720, 480);
const DISPLAY: DisplayRes = DisplayRes::new(1280, 960);
/// Simulated time per playback iteration, in seconds.
const TICK: f64 = 0.1;
const MAX_TICKS: u32 = 400;
/// The single menu button, in video coordinates.
const BUTTON: Rect = Rect::new(260, 200, 460, 260);

/// Playback engine stand-in: a short menu stream followed by end of file.
struct SimPlayback {
    stop: StopPlay,
    position: f64,
    duration: f64,
    hold: f64,
}

impl SimPlayback {
    fn new(duration: f64) -> Self {
        Self {
            stop: StopPlay::KeepPlaying,
            position: 0.0,
            duration,
            hold: 0.0,
        }
    }

    fn advance(&mut self) {
        if self.hold > 0.0 {
            self.hold -= TICK;
            return;
        }
        self.position += TICK;
        if self.position >= self.duration {
            self.stop = StopPlay::AtEndOfFile;
        }
    }

    fn reload(&mut self) {
        log::info!("Reloading source");
        self.position = 0.0;
        self.hold = 0.0;
        self.stop = StopPlay::KeepPlaying;
    }
}

impl PlaybackHost for SimPlayback {
    fn is_encoding(&self) -> bool {
        false
    }

    fn video_size(&self) -> Option<Size> {
        Some(VIDEO)
    }

    fn subtitle_size(&self) -> Option<Size> {
        None
    }

    fn stop_play(&self) -> StopPlay {
        self.stop
    }

    fn set_stop_play(&mut self, state: StopPlay) {
        self.stop = state;
    }

    fn extend_presentation(&mut self, seconds: f64) {
        log::info!("Holding still frame for {seconds}s");
        self.hold += seconds;
    }

    fn notify_property(&mut self, name: &str) {
        log::debug!("property changed: {name}");
    }
}

#[derive(Default)]
struct SimInput {
    sections: Vec<(String, SectionFlags)>,
    mouse: Point,
}

impl InputBindings for SimInput {
    fn enable_section(&mut self, name: &str, flags: SectionFlags) {
        self.sections.retain(|(n, _)| n != name);
        self.sections.push((name.to_string(), flags));
        log::debug!("input section '{name}' enabled (on_top: {})", flags.on_top);
    }

    fn disable_section(&mut self, name: &str) {
        self.sections.retain(|(n, _)| n != name);
        log::debug!("input section '{name}' disabled");
    }

    fn set_section_mouse_area(&mut self, name: &str, area: Rect) {
        log::debug!("input section '{name}' mouse area {area:?}");
    }

    fn mouse_pos(&self) -> Point {
        self.mouse
    }
}

/// Forwards the overlay source to the compositor thread.
struct SimOsd {
    tx: Sender<Option<OsdHandle>>,
}

impl OsdCompositor for SimOsd {
    fn set_nav_highlight(&mut self, source: Option<OsdHandle>) {
        let _ = self.tx.send(source);
    }

    fn coords_to_video(&self, video: Size, p: Point) -> Point {
        display_to_video(&DISPLAY, video, p)
    }
}

/// Translucent button face with an opaque white border, as the disc would decode it.
fn button_bitmap(size: Size) -> discnav::Result<Bitmap> {
    const BORDER: i32 = 2;
    let stride = size.w.max(0) as usize * 4;
    let mut data = Vec::with_capacity(stride * size.h.max(0) as usize);
    for y in 0..size.h {
        for x in 0..size.w {
            let edge = x < BORDER || y < BORDER || x >= size.w - BORDER || y >= size.h - BORDER;
            let px: [u8; 4] = if edge { [255, 255, 255, 255] } else { [40, 60, 160, 0xC0] };
            data.extend_from_slice(&px);
        }
    }
    Bitmap::from_rgba8(size, stride, &data)
}

/// Scripted disc: a menu with one button over a still background. Selecting the
/// button drains the menu stream and ends the disc.
fn spawn_disc(endpoint: SourceEndpoint) -> Result<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("discnav-disc".into())
        .spawn(move || {
            let mut selected = false;
            loop {
                let msg = match endpoint.recv_timeout(Duration::from_millis(100)) {
                    Ok(msg) => msg,
                    Err(false) => continue,
                    Err(true) => break,
                };
                log::debug!("disc received {msg:?}");
                match msg {
                    SourceMessage::Command(NavCommand::Enable) => {
                        let button = match button_bitmap(BUTTON.clamp_to(VIDEO).size()) {
                            Ok(bitmap) => Some(OverlayImage::new(BUTTON.start, bitmap)),
                            Err(e) => {
                                log::warn!("{e}");
                                None
                            }
                        };
                        endpoint.push(NavEvent::MenuMode { enable: true });
                        endpoint.push(NavEvent::Overlay {
                            images: [button, None],
                        });
                        endpoint.push(NavEvent::StillFrame { seconds: 2 });
                    }
                    SourceMessage::Command(NavCommand::MousePos { x, y }) => {
                        let over = BUTTON.contains(Point::new(x, y));
                        endpoint.push(NavEvent::highlight(over, BUTTON));
                    }
                    SourceMessage::Command(NavCommand::Menu(action)) if action == "select" => {
                        log::info!("Button selected, leaving menu");
                        selected = true;
                        endpoint.push(NavEvent::Reset);
                        endpoint.push(NavEvent::MenuMode { enable: false });
                        endpoint.push(NavEvent::highlight(false, BUTTON));
                        endpoint.push(NavEvent::Overlay {
                            images: [None, None],
                        });
                        endpoint.push(NavEvent::Drain);
                    }
                    SourceMessage::Command(NavCommand::Menu(action)) => {
                        log::info!("Ignoring menu action '{action}'");
                    }
                    SourceMessage::Command(NavCommand::SkipStill) => {
                        log::info!("Still frame skipped");
                    }
                    SourceMessage::ResumeCache if selected => {
                        endpoint.push(NavEvent::Eof);
                    }
                    SourceMessage::Command(_) | SourceMessage::ResumeCache => {}
                }
            }
            log::info!("Disc backend shutting down");
        })?;
    Ok(handle)
}

/// Render whatever overlay source is attached. Returns the last non-empty frame.
fn spawn_compositor(rx: Receiver<Option<OsdHandle>>) -> Result<JoinHandle<Vec<OverlayPart>>> {
    let handle = thread::Builder::new()
        .name("discnav-osd".into())
        .spawn(move || {
            let mut source: Option<OsdHandle> = None;
            let mut last = Vec::new();
            let mut frames = 0u32;
            loop {
                match rx.recv_timeout(Duration::from_millis(16)) {
                    Ok(next) => source = next,
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
                let Some(osd) = &source else { continue };
                let parts = osd.render(&DISPLAY);
                frames += 1;
                if !parts.is_empty() {
                    log::trace!("composed {} overlay parts", parts.len());
                    last = parts;
                }
            }
            log::info!("Compositor rendered {frames} frames");
            last
        })?;
    Ok(handle)
}

fn blend(dst: &mut Rgba<u8>, src: &[u8]) {
    let a = u32::from(src[3]);
    for c in 0..3 {
        let mixed = (u32::from(src[c]) * a + u32::from(dst.0[c]) * (255 - a)) / 255;
        dst.0[c] = mixed as u8;
    }
}

/// Nearest-neighbour composite of `parts` over a dark background.
fn compose(parts: &[OverlayPart], res: &DisplayRes) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(res.w as u32, res.h as u32, Rgba([16, 16, 16, 255]));
    for part in parts {
        if part.w <= 0 || part.h <= 0 || part.dw <= 0 || part.dh <= 0 {
            continue;
        }
        let src = part.bitmap.as_bytes();
        for dy in 0..part.dh {
            let y = part.y + dy;
            if y < 0 || y >= res.h {
                continue;
            }
            let sy = (dy * part.h / part.dh) as usize;
            for dx in 0..part.dw {
                let x = part.x + dx;
                if x < 0 || x >= res.w {
                    continue;
                }
                let sx = (dx * part.w / part.dw) as usize;
                let off = sy * part.stride + sx * 4;
                let Some(px) = src.get(off..off + 4) else {
                    continue;
                };
                blend(canvas.get_pixel_mut(x as u32, y as u32), px);
            }
        }
    }
    canvas
}

fn arg_value(flag: &str) -> Option<String> {
    let mut args = std::env::args().skip_while(|a| a != flag);
    args.next()?;
    args.next()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = match arg_value("--config") {
        Some(path) => NavConfig::load_from(&PathBuf::from(path))?,
        None => NavConfig::load(),
    };
    let dump = arg_value("--dump").map(PathBuf::from);

    let (mut source, endpoint) = channel_source(true);
    let disc = spawn_disc(endpoint)?;
    let (osd_tx, osd_rx) = crossbeam_channel::unbounded();
    let compositor = spawn_compositor(osd_rx)?;

    let mut playback = SimPlayback::new(0.5);
    let mut input = SimInput::default();
    let mut osd = SimOsd { tx: osd_tx };
    let mut navigator = Navigator::new(config);

    if !navigator.init(&mut Player::new(&mut source, &mut playback, &mut input, &mut osd)) {
        anyhow::bail!("disc navigation could not be enabled");
    }

    let mut menu_frame = Vec::new();
    for tick in 0..MAX_TICKS {
        // Give the disc thread a moment to answer the last commands.
        thread::sleep(Duration::from_millis(5));
        playback.advance();

        // Scripted user: hover the button, then press it.
        if tick == 8 {
            input.mouse = Point::new(640, 460);
        }
        let mut player = Player::new(&mut source, &mut playback, &mut input, &mut osd);
        match tick {
            8 => navigator.user_input(&mut player, "mouse_move"),
            15 => {
                if let Some(handle) = navigator.osd_handle() {
                    menu_frame = handle.render(&DISPLAY);
                }
                navigator.user_input(&mut player, "select");
            }
            _ => {}
        }

        match navigator.handle_events(&mut player) {
            Some(DispatchOutcome::Reloading) => {
                drop(player);
                playback.reload();
                navigator.reset(&mut Player::new(&mut source, &mut playback, &mut input, &mut osd));
                continue;
            }
            Some(DispatchOutcome::Drained { events }) if events > 0 => {
                log::debug!("tick {tick}: {events} navigation events");
            }
            _ => {}
        }

        if playback.stop == StopPlay::AtEndOfFile {
            log::info!("Disc finished after {tick} ticks");
            break;
        }
    }

    navigator.destroy(&mut Player::new(&mut source, &mut playback, &mut input, &mut osd));
    if !input.sections.is_empty() {
        log::warn!("Input sections still active after destroy: {:?}", input.sections);
    }
    drop(osd);
    drop(source);

    let last = compositor
        .join()
        .map_err(|_| anyhow::anyhow!("compositor thread panicked"))?;
    disc.join()
        .map_err(|_| anyhow::anyhow!("disc thread panicked"))?;

    if let Some(path) = dump {
        let parts = if menu_frame.is_empty() { last } else { menu_frame };
        compose(&parts, &DISPLAY)
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote {} overlay parts to {}", parts.len(), path.display());
    }

    Ok(())
}
