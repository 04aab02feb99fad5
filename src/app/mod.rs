// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between capture, storage, and the
//! gallery view.
//!
//! The `App` struct wires together the domains (store, playback,
//! localization) and translates messages into side effects like slot writes
//! or file reads. This file intentionally keeps policy decisions (window
//! size, settle delay before playback, deletion confirmation) close to the
//! main update loop so it is easy to audit user-facing behavior.

pub mod paths;

use crate::capture;
use crate::config;
use crate::domain::video::{RecordId, VideoRecord, SUPPORTED_EXTENSIONS};
use crate::error::{CaptureError, Error};
use crate::i18n::fluent::I18n;
use crate::playback::{self, Player};
use crate::store::VideoStore;
use crate::ui::confirm::{self, PendingDelete};
use crate::ui::gallery;
use crate::ui::notifications::{self, Notification};
use crate::ui::theming::ThemeMode;
use iced::widget::{opaque, operation, Id, Stack};
use iced::{event, time, window, Element, Length, Subscription, Task, Theme};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub const WINDOW_DEFAULT_HEIGHT: u32 = 900;
pub const WINDOW_DEFAULT_WIDTH: u32 = 800;
pub const MIN_WINDOW_HEIGHT: u32 = 650;
pub const MIN_WINDOW_WIDTH: u32 = 720;

/// Delay between scrolling a card into view and starting playback, so the
/// scroll settles before the first frame appears.
const PLAY_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Top-level messages consumed by [`App::update`]. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Gallery(gallery::Message),
    Confirm(confirm::Message),
    Notification(notifications::NotificationMessage),
    Playback(playback::Event),
    /// Result from the native file picker.
    FilesPicked(Option<Vec<PathBuf>>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// One candidate file finished its read-and-encode unit of work.
    Captured(Result<VideoRecord, CaptureError>),
    /// The settle delay after scroll-to-card elapsed.
    PlayScrollSettled(RecordId),
    /// Periodic tick for notification auto-dismiss.
    Tick(Instant),
    /// Window close was requested (user clicked X or pressed Alt+F4).
    WindowCloseRequested(window::Id),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional data directory override (for the storage slot).
    /// Takes precedence over `CLIPSHELF_DATA_DIR` environment variable.
    pub data_dir: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `CLIPSHELF_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Video files to capture at startup, through the normal pipeline.
    pub file_paths: Vec<String>,
}

/// Root Iced application state bridging the record store, playback, and
/// localization.
pub struct App {
    pub i18n: I18n,
    store: VideoStore,
    player: Player,
    theme_mode: ThemeMode,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
    /// Deletion awaiting confirmation; renders the blocking dialog while set.
    pending_delete: Option<PendingDelete>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("records", &self.store.len())
            .field("playing", &self.player.playing_id())
            .finish()
    }
}

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy Fn trait requirement
    // while only consuming flags once (iced 0.14 requires Fn, not FnOnce)
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Initializes application state and kicks off asynchronous capture of
    /// any files passed on the command line.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        if flags.data_dir.is_some() || flags.config_dir.is_some() {
            paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());
        }

        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), &config);

        let (mut store, store_warning) = VideoStore::load();
        store.set_max_slot_bytes(config.max_slot_bytes());

        let mut app = App {
            i18n,
            store,
            player: Player::new(),
            theme_mode: config.general.theme_mode,
            notifications: notifications::Manager::new(),
            pending_delete: None,
        };

        if let Some(key) = config_warning {
            app.notifications.push(Notification::warning(key));
        }
        if let Some(key) = store_warning {
            app.notifications.push(Notification::warning(key));
        }

        let startup_captures = capture_tasks(
            flags
                .file_paths
                .iter()
                .map(PathBuf::from)
                .collect::<Vec<_>>(),
        );

        (app, startup_captures)
    }

    fn title(&self) -> String {
        self.i18n.tr("window-title")
    }

    fn theme(&self) -> Theme {
        self.theme_mode.theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        let events = event::listen_with(|event, _status, window_id| match event {
            event::Event::Window(window::Event::CloseRequested) => {
                Some(Message::WindowCloseRequested(window_id))
            }
            event::Event::Window(window::Event::FileDropped(path)) => {
                Some(Message::FileDropped(path))
            }
            _ => None,
        });

        // Only tick while a toast could expire.
        let ticks = if self.notifications.has_notifications() {
            time::every(Duration::from_millis(100)).map(Message::Tick)
        } else {
            Subscription::none()
        };

        let playback = self.player.subscription().map(Message::Playback);

        Subscription::batch([events, ticks, playback])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Gallery(gallery::Message::BrowseClicked) => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .add_filter("Video", &SUPPORTED_EXTENSIONS)
                        .pick_files()
                        .await
                        .map(|handles| {
                            handles
                                .iter()
                                .map(|handle| handle.path().to_path_buf())
                                .collect()
                        })
                },
                Message::FilesPicked,
            ),
            Message::FilesPicked(Some(paths)) => capture_tasks(paths),
            Message::FilesPicked(None) => Task::none(),
            Message::FileDropped(path) => capture_tasks(vec![path]),
            Message::Captured(result) => {
                self.handle_captured(result);
                Task::none()
            }
            Message::Gallery(gallery::Message::PlayClicked(id)) => self.handle_play_clicked(id),
            Message::PlayScrollSettled(id) => {
                self.handle_play_settled(&id);
                Task::none()
            }
            Message::Gallery(gallery::Message::PauseToggled) => {
                self.player.toggle_pause();
                Task::none()
            }
            Message::Gallery(gallery::Message::StopClicked) => {
                self.player.stop();
                Task::none()
            }
            Message::Gallery(gallery::Message::DeleteClicked(id)) => {
                if let Some(record) = self.store.get(&id) {
                    self.pending_delete = Some(PendingDelete {
                        id: record.id.clone(),
                        name: record.name.clone(),
                    });
                }
                Task::none()
            }
            Message::Confirm(confirm::Message::Cancelled) => {
                self.pending_delete = None;
                Task::none()
            }
            Message::Confirm(confirm::Message::Confirmed) => {
                self.handle_delete_confirmed();
                Task::none()
            }
            Message::Playback(event) => {
                if let Some(error) = self.player.on_event(event) {
                    tracing::warn!(error = %error, "playback failed");
                    self.notifications
                        .push(Notification::error("notification-playback-error"));
                }
                Task::none()
            }
            Message::Notification(notification_message) => {
                self.notifications.handle_message(&notification_message);
                Task::none()
            }
            Message::Tick(_instant) => {
                self.notifications.tick();
                Task::none()
            }
            Message::WindowCloseRequested(id) => {
                self.player.stop();
                window::close(id)
            }
        }
    }

    /// Applies one finished capture: append on success, log-and-skip on
    /// rejection. Store failures surface as error toasts and leave the
    /// collection unchanged.
    fn handle_captured(&mut self, result: Result<VideoRecord, CaptureError>) {
        match result {
            Ok(record) => {
                let name = record.name.clone();
                match self.store.append(record) {
                    Ok(()) => {
                        tracing::info!(name = %name, "captured video");
                        self.notifications.push(
                            Notification::success("notification-capture-added")
                                .with_arg("name", name),
                        );
                    }
                    Err(Error::Store(err)) => {
                        tracing::warn!(name = %name, error = %err, "storing record failed");
                        self.notifications
                            .push(Notification::error(err.i18n_key()).with_arg("name", name));
                    }
                    Err(err) => {
                        tracing::error!(name = %name, error = %err, "storing record failed");
                        self.notifications
                            .push(Notification::error("notification-store-write-error"));
                    }
                }
            }
            Err(err) => {
                // Rejected candidates are a developer-facing diagnostic only;
                // capture continues for the rest of the batch.
                tracing::warn!(name = %err.file_name(), error = %err, "skipping file");
            }
        }
    }

    /// Scrolls the card into view, then starts playback once the settle
    /// delay elapses.
    fn handle_play_clicked(&mut self, id: RecordId) -> Task<Message> {
        let Some(index) = self
            .store
            .records()
            .iter()
            .position(|record| record.id == id)
        else {
            return Task::none();
        };

        let scroll = operation::snap_to(
            Id::new(gallery::SCROLLABLE_ID),
            gallery::scroll_progress_for(index, self.store.len()),
        );
        let settle = Task::perform(tokio::time::sleep(PLAY_SETTLE_DELAY), move |()| {
            Message::PlayScrollSettled(id.clone())
        });

        Task::batch([scroll, settle])
    }

    /// Best-effort playback start: a no-op if the record vanished while the
    /// scroll was settling.
    fn handle_play_settled(&mut self, id: &RecordId) {
        let Some(record) = self.store.get(id) else {
            return;
        };

        if let Err(err) = self.player.start(record) {
            tracing::error!(name = %record.name, error = %err, "starting playback failed");
            self.notifications
                .push(Notification::error("notification-playback-error"));
        }
    }

    /// Removes the pending record from the store and stops its playback if
    /// it was the active session.
    fn handle_delete_confirmed(&mut self) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };

        if self.player.is_active(&pending.id) {
            self.player.stop();
        }

        match self.store.remove(&pending.id) {
            Ok(removed) => {
                if removed {
                    tracing::info!(name = %pending.name, "deleted video");
                }
            }
            Err(Error::Store(err)) => {
                tracing::error!(name = %pending.name, error = %err, "deleting record failed");
                self.notifications
                    .push(Notification::error(err.i18n_key()).with_arg("name", pending.name));
            }
            Err(err) => {
                tracing::error!(name = %pending.name, error = %err, "deleting record failed");
                self.notifications
                    .push(Notification::error("notification-store-write-error"));
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let gallery_view = gallery::view(gallery::ViewContext {
            i18n: &self.i18n,
            records: self.store.records(),
            player: &self.player,
        })
        .map(Message::Gallery);

        let toast_overlay = notifications::Toast::view_overlay(&self.notifications, &self.i18n)
            .map(Message::Notification);

        let mut stack = Stack::new().push(gallery_view).push(toast_overlay);

        if let Some(pending) = &self.pending_delete {
            // opaque() makes the dialog layer swallow events, so the gallery
            // underneath is unreachable until the user decides.
            stack = stack.push(opaque(
                confirm::view(pending, &self.i18n).map(Message::Confirm),
            ));
        }

        stack.width(Length::Fill).height(Length::Fill).into()
    }
}

/// One capture task per candidate file. Directories are rejected here with a
/// diagnostic; everything else is validated by the capture pipeline itself.
fn capture_tasks(paths: Vec<PathBuf>) -> Task<Message> {
    let tasks = paths.into_iter().filter_map(|path| {
        if path.is_dir() {
            tracing::warn!(path = %path.display(), "skipping directory: capture does not scan recursively");
            return None;
        }
        Some(Task::perform(
            capture::capture_file(path),
            Message::Captured,
        ))
    });

    Task::batch(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::data_url;
    use std::fs;
    use std::sync::{Mutex, OnceLock};
    use tempfile::tempdir;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    /// Points the data and config directories at fresh temp dirs for the
    /// duration of one test. Env vars are process-global, hence the mutex.
    fn with_temp_dirs<F>(test: F)
    where
        F: FnOnce(&std::path::Path),
    {
        let _guard = env_lock().lock().expect("failed to lock mutex");
        let data_dir = tempdir().expect("failed to create data dir");
        let config_dir = tempdir().expect("failed to create config dir");
        std::env::set_var(paths::ENV_DATA_DIR, data_dir.path());
        std::env::set_var(paths::ENV_CONFIG_DIR, config_dir.path());

        test(data_dir.path());

        std::env::remove_var(paths::ENV_DATA_DIR);
        std::env::remove_var(paths::ENV_CONFIG_DIR);
    }

    fn sample_record(id: &str, name: &str) -> VideoRecord {
        VideoRecord {
            id: RecordId::from(id),
            name: name.to_string(),
            size: "1 KB".into(),
            mime_type: "video/mp4".into(),
            data: data_url::encode("video/mp4", b"fake mp4 bytes"),
            upload_date: "2026-08-07T10:00:00.000Z".into(),
        }
    }

    #[test]
    fn new_starts_with_empty_shelf() {
        with_temp_dirs(|_| {
            let (app, _task) = App::new(Flags::default());
            assert!(app.store.is_empty());
            assert!(app.pending_delete.is_none());
            assert!(!app.notifications.has_notifications());
        });
    }

    #[test]
    fn title_is_the_app_name() {
        with_temp_dirs(|_| {
            let (app, _task) = App::new(Flags::default());
            assert_eq!(app.title(), "ClipShelf");
        });
    }

    #[test]
    fn captured_record_is_appended_and_announced() {
        with_temp_dirs(|data_dir| {
            let (mut app, _task) = App::new(Flags::default());

            let _ = app.update(Message::Captured(Ok(sample_record("1-a", "clip.mp4"))));

            assert_eq!(app.store.len(), 1);
            assert!(app.notifications.has_notifications());
            // The slot was rewritten on disk.
            let slot = data_dir.join("uploadedVideos.json");
            let contents = fs::read_to_string(slot).expect("slot readable");
            assert!(contents.contains("clip.mp4"));
        });
    }

    #[test]
    fn rejected_capture_is_logged_not_surfaced() {
        with_temp_dirs(|_| {
            let (mut app, _task) = App::new(Flags::default());

            let _ = app.update(Message::Captured(Err(CaptureError::UnsupportedType {
                name: "slides.pdf".into(),
                mime: Some("application/pdf".into()),
            })));

            assert!(app.store.is_empty());
            assert!(
                !app.notifications.has_notifications(),
                "skips must stay developer-facing"
            );
        });
    }

    #[test]
    fn delete_requires_confirmation() {
        with_temp_dirs(|_| {
            let (mut app, _task) = App::new(Flags::default());
            let _ = app.update(Message::Captured(Ok(sample_record("1-a", "clip.mp4"))));

            let _ = app.update(Message::Gallery(gallery::Message::DeleteClicked(
                RecordId::from("1-a"),
            )));

            assert!(app.pending_delete.is_some());
            assert_eq!(app.store.len(), 1, "nothing removed before confirmation");
        });
    }

    #[test]
    fn declined_delete_changes_nothing() {
        with_temp_dirs(|_| {
            let (mut app, _task) = App::new(Flags::default());
            let _ = app.update(Message::Captured(Ok(sample_record("1-a", "clip.mp4"))));
            let _ = app.update(Message::Gallery(gallery::Message::DeleteClicked(
                RecordId::from("1-a"),
            )));

            let _ = app.update(Message::Confirm(confirm::Message::Cancelled));

            assert!(app.pending_delete.is_none());
            assert_eq!(app.store.len(), 1);
        });
    }

    #[test]
    fn confirmed_delete_removes_the_record() {
        with_temp_dirs(|_| {
            let (mut app, _task) = App::new(Flags::default());
            let _ = app.update(Message::Captured(Ok(sample_record("1-a", "clip.mp4"))));
            let _ = app.update(Message::Gallery(gallery::Message::DeleteClicked(
                RecordId::from("1-a"),
            )));

            let _ = app.update(Message::Confirm(confirm::Message::Confirmed));

            assert!(app.pending_delete.is_none());
            assert!(app.store.is_empty());
        });
    }

    #[test]
    fn deleting_second_of_two_keeps_order() {
        with_temp_dirs(|_| {
            let (mut app, _task) = App::new(Flags::default());
            let _ = app.update(Message::Captured(Ok(sample_record("1-a", "first.mp4"))));
            let _ = app.update(Message::Captured(Ok(sample_record("2-b", "second.webm"))));

            let _ = app.update(Message::Gallery(gallery::Message::DeleteClicked(
                RecordId::from("1-a"),
            )));
            let _ = app.update(Message::Confirm(confirm::Message::Confirmed));

            assert_eq!(app.store.len(), 1);
            assert_eq!(app.store.records()[0].name, "second.webm");
        });
    }

    #[test]
    fn confirmed_delete_stops_active_playback() {
        with_temp_dirs(|_| {
            let (mut app, _task) = App::new(Flags::default());
            let _ = app.update(Message::Captured(Ok(sample_record("1-a", "clip.mp4"))));

            let _ = app.update(Message::PlayScrollSettled(RecordId::from("1-a")));
            assert!(app.player.is_active(&RecordId::from("1-a")));

            let _ = app.update(Message::Gallery(gallery::Message::DeleteClicked(
                RecordId::from("1-a"),
            )));
            let _ = app.update(Message::Confirm(confirm::Message::Confirmed));

            assert!(app.player.playing_id().is_none());
            assert!(app.store.is_empty());
        });
    }

    #[test]
    fn play_settled_for_missing_record_is_a_noop() {
        with_temp_dirs(|_| {
            let (mut app, _task) = App::new(Flags::default());

            let _ = app.update(Message::PlayScrollSettled(RecordId::from("gone")));

            assert!(app.player.playing_id().is_none());
            assert!(!app.notifications.has_notifications());
        });
    }

    #[test]
    fn capacity_exceeded_surfaces_error_and_leaves_store_unchanged() {
        with_temp_dirs(|_| {
            let (mut app, _task) = App::new(Flags::default());
            app.store.set_max_slot_bytes(64);

            let mut oversized = sample_record("1-a", "huge.mp4");
            oversized.data = data_url::encode("video/mp4", &vec![0_u8; 512]);
            let _ = app.update(Message::Captured(Ok(oversized)));

            assert!(app.store.is_empty());
            let surfaced: Vec<&str> = app
                .notifications
                .visible()
                .map(|n| n.message_key())
                .collect();
            assert_eq!(surfaced, ["notification-capacity-exceeded"]);
        });
    }

    #[test]
    fn garbled_slot_warns_on_startup() {
        with_temp_dirs(|data_dir| {
            fs::write(data_dir.join("uploadedVideos.json"), "not json").expect("write slot");

            let (app, _task) = App::new(Flags::default());

            assert!(app.store.is_empty());
            let surfaced: Vec<&str> = app
                .notifications
                .visible()
                .map(|n| n.message_key())
                .collect();
            assert_eq!(surfaced, ["notification-library-parse-error"]);
        });
    }

    #[test]
    fn stop_clicked_ends_playback() {
        with_temp_dirs(|_| {
            let (mut app, _task) = App::new(Flags::default());
            let _ = app.update(Message::Captured(Ok(sample_record("1-a", "clip.mp4"))));
            let _ = app.update(Message::PlayScrollSettled(RecordId::from("1-a")));
            assert!(app.player.playing_id().is_some());

            let _ = app.update(Message::Gallery(gallery::Message::StopClicked));

            assert!(app.player.playing_id().is_none());
        });
    }
}
