// SPDX-License-Identifier: MPL-2.0
//! In-place playback of a stored record.
//!
//! One record plays at a time. Starting playback decodes the record's data
//! URL into a temporary media file (records embed their full content, they
//! have no path on disk) and hands it to the decoder subscription, which
//! streams RGBA frames back as [`Event`]s. The temp file lives as long as
//! the playback session and is removed when it ends, so deleting a playing
//! record leaves nothing behind.

pub mod decoder;

pub use decoder::{Command, CommandSender};

use crate::domain::video::{data_url, RecordId, VideoRecord};
use crate::error::Result;
use iced::widget::image;
use iced::Subscription;
use std::io::Write;
use tempfile::TempPath;

/// Messages emitted by the playback subscription.
#[derive(Debug, Clone)]
pub enum Event {
    /// Decoder is up; carries the sender for pause/resume/stop commands.
    Started(CommandSender),
    /// A decoded frame ready for display.
    Frame(image::Handle),
    /// Playback reached the end of the stream.
    Finished,
    /// Decoding failed; the message is developer-facing.
    Error(String),
}

/// Playback state for the gallery: which record plays, its latest frame,
/// and the command channel into the decoder.
#[derive(Debug, Default)]
pub struct Player {
    /// Bumped per playback session so the subscription identity changes and
    /// Iced tears the previous decoder down.
    session: u64,
    active: Option<Active>,
}

#[derive(Debug)]
struct Active {
    id: RecordId,
    /// Materialized media content; the file is deleted when this drops.
    media: TempPath,
    frame: Option<image::Handle>,
    paused: bool,
    commands: Option<CommandSender>,
}

impl Player {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts playing the given record, replacing any current session.
    pub fn start(&mut self, record: &VideoRecord) -> Result<()> {
        let (_mime, bytes) = data_url::decode(&record.data)?;

        let mut file = tempfile::Builder::new()
            .prefix("clipshelf-")
            .suffix(&suffix_for(&record.name))
            .tempfile()?;
        file.write_all(&bytes)?;

        self.session += 1;
        self.active = Some(Active {
            id: record.id.clone(),
            media: file.into_temp_path(),
            frame: None,
            paused: false,
            commands: None,
        });
        Ok(())
    }

    /// Ends the current session, if any. Safe to call when idle.
    pub fn stop(&mut self) {
        if let Some(active) = &self.active {
            if let Some(commands) = &active.commands {
                let _ = commands.send(Command::Stop);
            }
        }
        self.active = None;
    }

    /// Flips between paused and playing for the current session.
    pub fn toggle_pause(&mut self) {
        if let Some(active) = &mut self.active {
            let command = if active.paused {
                Command::Resume
            } else {
                Command::Pause
            };
            if let Some(commands) = &active.commands {
                if commands.send(command).is_ok() {
                    active.paused = !active.paused;
                }
            }
        }
    }

    /// Id of the record currently playing, if any.
    #[must_use]
    pub fn playing_id(&self) -> Option<&RecordId> {
        self.active.as_ref().map(|active| &active.id)
    }

    /// Returns `true` if the given record is the active session.
    #[must_use]
    pub fn is_active(&self, id: &RecordId) -> bool {
        self.playing_id() == Some(id)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.active.as_ref().is_some_and(|active| active.paused)
    }

    /// Latest decoded frame of the active session.
    #[must_use]
    pub fn frame(&self) -> Option<&image::Handle> {
        self.active.as_ref().and_then(|active| active.frame.as_ref())
    }

    /// Applies a subscription event. Returns a developer-facing error
    /// message when the session died and the failure should be surfaced.
    pub fn on_event(&mut self, event: Event) -> Option<String> {
        match event {
            Event::Started(sender) => {
                if let Some(active) = &mut self.active {
                    active.commands = Some(sender);
                }
                None
            }
            Event::Frame(handle) => {
                if let Some(active) = &mut self.active {
                    active.frame = Some(handle);
                }
                None
            }
            Event::Finished => {
                self.active = None;
                None
            }
            Event::Error(message) => {
                self.active = None;
                Some(message)
            }
        }
    }

    /// The decoder subscription for the active session, or none when idle.
    pub fn subscription(&self) -> Subscription<Event> {
        match &self.active {
            Some(active) => decoder::subscription(self.session, active.media.to_path_buf()),
            None => Subscription::none(),
        }
    }
}

/// Temp file suffix matching the record's original extension, so container
/// probing sees a familiar name. Falls back to `.mp4`.
fn suffix_for(name: &str) -> String {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| ".mp4".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::RecordId;

    fn record_with_payload(payload: &[u8]) -> VideoRecord {
        VideoRecord {
            id: RecordId::from("1-a"),
            name: "clip.mp4".into(),
            size: "1 KB".into(),
            mime_type: "video/mp4".into(),
            data: data_url::encode("video/mp4", payload),
            upload_date: "2026-08-07T10:00:00.000Z".into(),
        }
    }

    #[test]
    fn start_materializes_media_file() {
        let mut player = Player::new();
        let record = record_with_payload(b"fake mp4 bytes");

        player.start(&record).expect("start");

        assert!(player.is_active(&RecordId::from("1-a")));
        assert!(!player.is_paused());
        let media_path = player
            .active
            .as_ref()
            .map(|active| active.media.to_path_buf())
            .expect("active session");
        assert_eq!(
            std::fs::read(&media_path).expect("media readable"),
            b"fake mp4 bytes"
        );
    }

    #[test]
    fn stop_removes_session_and_media() {
        let mut player = Player::new();
        player
            .start(&record_with_payload(b"bytes"))
            .expect("start");
        let media_path = player
            .active
            .as_ref()
            .map(|active| active.media.to_path_buf())
            .expect("active session");

        player.stop();

        assert!(player.playing_id().is_none());
        assert!(!media_path.exists(), "temp media should be cleaned up");
    }

    #[test]
    fn start_rejects_garbled_data_url() {
        let mut player = Player::new();
        let mut record = record_with_payload(b"bytes");
        record.data = "definitely not a data url".into();

        assert!(player.start(&record).is_err());
        assert!(player.playing_id().is_none());
    }

    #[test]
    fn frame_events_update_active_session() {
        let mut player = Player::new();
        player
            .start(&record_with_payload(b"bytes"))
            .expect("start");

        let handle = image::Handle::from_rgba(1, 1, vec![0_u8; 4]);
        let surfaced = player.on_event(Event::Frame(handle));

        assert!(surfaced.is_none());
        assert!(player.frame().is_some());
    }

    #[test]
    fn error_event_ends_session_and_surfaces_message() {
        let mut player = Player::new();
        player
            .start(&record_with_payload(b"bytes"))
            .expect("start");

        let surfaced = player.on_event(Event::Error("no video stream".into()));

        assert_eq!(surfaced.as_deref(), Some("no video stream"));
        assert!(player.playing_id().is_none());
    }

    #[test]
    fn finished_event_resets_to_idle() {
        let mut player = Player::new();
        player
            .start(&record_with_payload(b"bytes"))
            .expect("start");

        assert!(player.on_event(Event::Finished).is_none());
        assert!(player.playing_id().is_none());
        assert!(player.frame().is_none());
    }

    #[test]
    fn sessions_get_distinct_identities() {
        let mut player = Player::new();
        player
            .start(&record_with_payload(b"bytes"))
            .expect("start");
        let first = player.session;
        player
            .start(&record_with_payload(b"other"))
            .expect("restart");
        assert_ne!(first, player.session);
    }

    #[test]
    fn suffix_follows_record_extension() {
        assert_eq!(suffix_for("clip.webm"), ".webm");
        assert_eq!(suffix_for("noext"), ".mp4");
    }
}
