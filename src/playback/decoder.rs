// SPDX-License-Identifier: MPL-2.0
//! FFmpeg decode loop behind an Iced subscription.
//!
//! The subscription spawns a blocking decode task which walks the media
//! file's packets, converts each frame to RGBA, paces output against the
//! stream's presentation timestamps, and sends frames back through an
//! unbounded channel. Commands (pause/resume/stop) flow the other way; a
//! paused decoder blocks on the command channel so it consumes nothing.
//!
//! Dropping the subscription closes both channels, which the decode loop
//! observes and exits.

use iced::futures::SinkExt;
use iced::stream;
use iced::widget::image;
use iced::Subscription;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Commands the UI can send into a running decode loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    Stop,
}

/// Cloneable handle for sending commands to the decoder.
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    /// Sends a command; fails if the decode loop already exited.
    pub fn send(&self, command: Command) -> Result<(), String> {
        self.tx
            .send(command)
            .map_err(|_| "decoder not running".to_string())
    }
}

impl std::fmt::Debug for CommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSender").finish()
    }
}

/// Subscription identity; a new session id recreates the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PlaybackId(u64);

static FFMPEG_INIT: Once = Once::new();

/// Initializes FFmpeg once per process, with its log level lowered so
/// container warnings do not spam stderr.
fn init_ffmpeg() -> Result<(), String> {
    let mut init_result = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(format!("FFmpeg initialization failed: {e}"));
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Creates the playback subscription for one session.
///
/// Emits `Started` with the command sender first, then frames, then exactly
/// one terminal event (`Finished` or `Error`).
pub fn subscription(session: u64, path: PathBuf) -> Subscription<super::Event> {
    Subscription::run_with((PlaybackId(session), path), |(_, path)| {
        let path = path.clone();
        stream::channel(16, move |mut output: iced::futures::channel::mpsc::Sender<super::Event>| async move {
            let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
            let (event_tx, mut event_rx) = mpsc::unbounded_channel();

            let decode_path = path.clone();
            tokio::task::spawn_blocking(move || decode_loop(&decode_path, cmd_rx, &event_tx));

            let _ = output
                .send(super::Event::Started(CommandSender { tx: cmd_tx }))
                .await;

            while let Some(event) = event_rx.recv().await {
                let terminal =
                    matches!(event, super::Event::Finished | super::Event::Error(_));
                let _ = output.send(event).await;
                if terminal {
                    break;
                }
            }

            // Keep the stream open; Iced tears it down once the session ends
            // and the subscription disappears from the batch.
            iced::futures::future::pending::<()>().await;
        })
    })
}

/// What the command handler decided the loop should do next.
enum Flow {
    Continue,
    Stop,
}

/// Entry point of the blocking decode task.
fn decode_loop(
    path: &Path,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: &mpsc::UnboundedSender<super::Event>,
) {
    match run_decoder(path, &mut commands, events) {
        Ok(()) => {
            let _ = events.send(super::Event::Finished);
        }
        Err(message) => {
            let _ = events.send(super::Event::Error(message));
        }
    }
}

/// Walks the file's packets, decoding and pacing frames until end of
/// stream, a stop command, or a dead event channel.
fn run_decoder(
    path: &Path,
    commands: &mut mpsc::UnboundedReceiver<Command>,
    events: &mpsc::UnboundedSender<super::Event>,
) -> Result<(), String> {
    init_ffmpeg()?;

    let mut ictx = ffmpeg_next::format::input(&path)
        .map_err(|e| format!("failed to open media: {e}"))?;

    let input = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or_else(|| "no video stream found".to_string())?;
    let stream_index = input.index();

    let time_base = input.time_base();
    let pts_to_secs =
        f64::from(time_base.numerator()) / f64::from(time_base.denominator());

    let frame_rate = input.avg_frame_rate();
    let frame_interval_secs = if frame_rate.numerator() > 0 {
        f64::from(frame_rate.denominator()) / f64::from(frame_rate.numerator())
    } else {
        1.0 / 30.0
    };

    let context = ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
        .map_err(|e| format!("failed to create codec context: {e}"))?;
    let mut decoder = context
        .decoder()
        .video()
        .map_err(|e| format!("failed to create video decoder: {e}"))?;

    let width = decoder.width();
    let height = decoder.height();
    if width == 0 || height == 0 {
        return Err(format!("invalid video dimensions: {width}x{height}"));
    }

    let mut scaler = ffmpeg_next::software::scaling::Context::get(
        decoder.format(),
        width,
        height,
        ffmpeg_next::format::Pixel::RGBA,
        width,
        height,
        ffmpeg_next::software::scaling::Flags::BILINEAR,
    )
    .map_err(|e| format!("failed to create scaler: {e}"))?;

    let started = Instant::now();
    let mut paused_for = Duration::ZERO;
    let mut frame_index: u64 = 0;

    for (stream, packet) in ictx.packets() {
        match handle_commands(commands, &mut paused_for) {
            Flow::Stop => return Ok(()),
            Flow::Continue => {}
        }

        if stream.index() != stream_index {
            continue;
        }

        decoder
            .send_packet(&packet)
            .map_err(|e| format!("failed to send packet: {e}"))?;

        let mut decoded = ffmpeg_next::frame::Video::empty();
        while decoder.receive_frame(&mut decoded).is_ok() {
            let pts_secs = decoded
                .pts()
                .map(|pts| pts as f64 * pts_to_secs)
                .unwrap_or(frame_index as f64 * frame_interval_secs);
            frame_index += 1;

            // Sleep until this frame's presentation time, shifted by however
            // long playback sat paused.
            let target = started + paused_for + Duration::from_secs_f64(pts_secs.max(0.0));
            let now = Instant::now();
            if target > now {
                std::thread::sleep(target - now);
            }

            match handle_commands(commands, &mut paused_for) {
                Flow::Stop => return Ok(()),
                Flow::Continue => {}
            }

            let mut rgba_frame = ffmpeg_next::frame::Video::empty();
            scaler
                .run(&decoded, &mut rgba_frame)
                .map_err(|e| format!("failed to scale frame: {e}"))?;

            let handle = frame_to_handle(&rgba_frame);
            if events.send(super::Event::Frame(handle)).is_err() {
                // Subscription dropped; nobody is watching anymore.
                return Ok(());
            }
        }
    }

    let _ = decoder.send_eof();
    let mut decoded = ffmpeg_next::frame::Video::empty();
    while decoder.receive_frame(&mut decoded).is_ok() {
        let mut rgba_frame = ffmpeg_next::frame::Video::empty();
        if scaler.run(&decoded, &mut rgba_frame).is_ok()
            && events
                .send(super::Event::Frame(frame_to_handle(&rgba_frame)))
                .is_err()
        {
            return Ok(());
        }
    }

    Ok(())
}

/// Drains pending commands. A pause blocks here until resume or stop, so the
/// paused decoder holds its position without burning CPU.
fn handle_commands(
    commands: &mut mpsc::UnboundedReceiver<Command>,
    paused_for: &mut Duration,
) -> Flow {
    loop {
        match commands.try_recv() {
            Ok(Command::Stop) => return Flow::Stop,
            Ok(Command::Pause) => {
                let pause_started = Instant::now();
                loop {
                    match commands.blocking_recv() {
                        Some(Command::Resume) => {
                            *paused_for += pause_started.elapsed();
                            break;
                        }
                        Some(Command::Stop) | None => return Flow::Stop,
                        Some(Command::Pause) => {}
                    }
                }
            }
            Ok(Command::Resume) => {}
            Err(mpsc::error::TryRecvError::Empty) => return Flow::Continue,
            Err(mpsc::error::TryRecvError::Disconnected) => return Flow::Stop,
        }
    }
}

/// Copies a scaled RGBA frame row by row (the stride may exceed the visible
/// width) into an image handle.
fn frame_to_handle(frame: &ffmpeg_next::frame::Video) -> image::Handle {
    let width = frame.width();
    let height = frame.height();
    let data = frame.data(0);
    let stride = frame.stride(0);

    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        let row_start = y as usize * stride;
        let row_end = row_start + (width * 4) as usize;
        rgba.extend_from_slice(&data[row_start..row_end]);
    }

    image::Handle::from_rgba(width, height, rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_sender_fails_after_receiver_drops() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = CommandSender { tx };
        drop(rx);
        assert!(sender.send(Command::Pause).is_err());
    }

    #[test]
    fn stop_command_halts_the_loop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(Command::Stop).expect("send");

        let mut paused_for = Duration::ZERO;
        assert!(matches!(
            handle_commands(&mut rx, &mut paused_for),
            Flow::Stop
        ));
    }

    #[test]
    fn disconnected_channel_halts_the_loop() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();
        drop(tx);

        let mut paused_for = Duration::ZERO;
        assert!(matches!(
            handle_commands(&mut rx, &mut paused_for),
            Flow::Stop
        ));
    }

    #[test]
    fn empty_channel_continues() {
        let (_tx, mut rx) = mpsc::unbounded_channel::<Command>();

        let mut paused_for = Duration::ZERO;
        assert!(matches!(
            handle_commands(&mut rx, &mut paused_for),
            Flow::Continue
        ));
    }

    #[test]
    fn pause_then_resume_accumulates_paused_time() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(Command::Pause).expect("send");
        tx.send(Command::Resume).expect("send");

        let mut paused_for = Duration::ZERO;
        assert!(matches!(
            handle_commands(&mut rx, &mut paused_for),
            Flow::Continue
        ));
        // Resume arrived immediately; the point is that pausing did not
        // terminate the loop and the clock moved forward, not by how much.
    }

    #[test]
    fn decoding_garbage_reports_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("garbage.mp4");
        std::fs::write(&path, b"this is not a video").expect("write");

        let (_cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, _event_rx) = mpsc::unbounded_channel();

        let result = run_decoder(&path, &mut cmd_rx, &event_tx);
        assert!(result.is_err());
    }
}
