use iced::widget::container;
use iced::{Element, Length, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;

mod config;
mod error;
mod export;
mod process;
mod scan;
mod state;
mod ui;

use config::AppConfig;
use error::ScanError;
use process::{BatchReport, Processor, RemoteProcessor};
use scan::camera::{self, CameraHandle};
use scan::ingest::{self, IngestReport};
use state::controller::{NavAction, NavEffect, Navigator, View};
use state::index::FolderIndex;
use state::store::AssetStore;

/// Main application state
struct FilmScanner {
    /// Session store handle; None until async preparation finishes.
    /// Every store operation before that fails with `StoreNotReady`.
    store: Option<AssetStore>,
    /// Path of the prepared session database, handed to background tasks
    /// so they can open their own connections
    db_path: Option<PathBuf>,
    config: AppConfig,
    /// Screen selector and active-folder holder
    nav: Navigator,
    /// Folder view of the store, re-derived after every mutation
    index: FolderIndex,
    /// Acquired capture device while the scanning screen is up
    camera: Option<CameraHandle>,
    /// One-shot status line shown on every screen
    status: String,
    /// Folder-name input on the menu
    folder_input: String,
    /// A conversion batch is in flight
    converting: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Session store preparation finished
    StoreReady(Result<PathBuf, String>),
    FolderInputChanged(String),
    /// Create (or re-open) the folder named in the input field
    CreateFolder,
    /// Open an existing folder from the menu list
    OpenFolder(String),
    GoBack,
    StartScan,
    CaptureFrame,
    /// Pick files to upload into the active folder
    UploadFiles,
    UploadDone(IngestReport),
    PreferRemoteToggled(bool),
    ConvertFolder,
    ConversionDone(Result<BatchReport, String>),
    ExportFolder,
    /// Wipe the whole store (asks for confirmation first)
    ClearAll,
}

impl FilmScanner {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load();
        println!(
            "🎞️  Film Scanner starting (processing service at {})",
            config.processor_url
        );

        (
            FilmScanner {
                store: None,
                db_path: None,
                config,
                nav: Navigator::new(),
                index: FolderIndex::default(),
                camera: None,
                status: String::from("Preparing session store..."),
                folder_input: String::new(),
                converting: false,
            },
            Task::perform(prepare_store_async(), Message::StoreReady),
        )
    }

    /// Fetch the store, or say why we can't
    fn store(&self) -> Result<&AssetStore, ScanError> {
        self.store.as_ref().ok_or(ScanError::StoreNotReady)
    }

    /// Re-derive the folder index from the current store contents
    fn refresh_index(&mut self) {
        match self
            .store()
            .and_then(|store| store.list_all())
            .map(FolderIndex::build)
        {
            Ok(index) => self.index = index,
            Err(e) => self.report(e),
        }
    }

    /// Show a failure to the user once, keeping a diagnostic record
    fn report(&mut self, error: ScanError) {
        eprintln!("⚠️  {}", error);
        self.status = format!("⚠️ {}", error);
    }

    /// Execute the side effects of a navigation transition
    fn run_effects(&mut self, effects: Vec<NavEffect>) {
        for effect in effects {
            match effect {
                NavEffect::RefreshIndex => self.refresh_index(),
                NavEffect::AcquireCamera => match camera::acquire(&self.config.camera) {
                    Ok(handle) => {
                        self.camera = Some(handle);
                        self.status = String::from("📷 Ready to capture");
                    }
                    Err(e) => {
                        self.report(e);
                        let fallback = self.nav.apply(NavAction::CameraFailed);
                        self.run_effects(fallback);
                    }
                },
                // Dropping the handle stops the underlying stream
                NavEffect::ReleaseCamera => {
                    self.camera = None;
                }
            }
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::StoreReady(Ok(db_path)) => {
                match AssetStore::attach(&db_path) {
                    Ok(store) => {
                        let count = store.count().unwrap_or(0);
                        println!("🎨 Session store ready with {} images", count);
                        self.store = Some(store);
                        self.db_path = Some(db_path);
                        self.status = String::from("Ready. Create or open a folder to begin.");
                        self.refresh_index();
                    }
                    Err(e) => self.report(e),
                }
                Task::none()
            }
            Message::StoreReady(Err(e)) => {
                eprintln!("⚠️  Store initialization failed: {}", e);
                self.status = format!("⚠️ Store initialization failed: {}", e);
                Task::none()
            }
            Message::FolderInputChanged(value) => {
                self.folder_input = value;
                Task::none()
            }
            Message::CreateFolder => {
                let name = self.folder_input.trim().to_string();
                if name.is_empty() {
                    // Empty input aborts the action with no state change
                    return Task::none();
                }
                self.folder_input.clear();
                let effects = self.nav.apply(NavAction::OpenFolder(name));
                self.run_effects(effects);
                Task::none()
            }
            Message::OpenFolder(name) => {
                let effects = self.nav.apply(NavAction::OpenFolder(name));
                self.run_effects(effects);
                Task::none()
            }
            Message::GoBack => {
                let effects = self.nav.apply(NavAction::GoBack);
                self.run_effects(effects);
                Task::none()
            }
            Message::StartScan => {
                let effects = self.nav.apply(NavAction::StartScan);
                self.run_effects(effects);
                Task::none()
            }
            Message::CaptureFrame => {
                let grabbed = match self.camera.as_mut() {
                    Some(device) => device.grab_frame(),
                    None => Err(ScanError::CameraAccessFailure(
                        "no device is acquired".to_string(),
                    )),
                };

                match grabbed {
                    Ok(frame) => {
                        let stored = self.store().and_then(|store| {
                            ingest::capture_frame(store, self.nav.active_folder(), frame)
                        });
                        match stored {
                            Ok(id) => {
                                self.status = format!("📸 Captured frame #{}", id);
                                self.refresh_index();
                            }
                            Err(e) => self.report(e),
                        }
                    }
                    Err(e) => self.report(e),
                }
                Task::none()
            }
            Message::UploadFiles => {
                let Some(db_path) = self.db_path.clone() else {
                    self.report(ScanError::StoreNotReady);
                    return Task::none();
                };
                let Some(folder) = self.nav.active_folder().map(str::to_string) else {
                    self.report(ScanError::NoActiveFolder);
                    return Task::none();
                };

                // Show the native file picker dialog
                let picked = FileDialog::new()
                    .set_title("Select film frame images")
                    .add_filter("Images", ingest::IMAGE_EXTENSIONS)
                    .pick_files();

                match picked {
                    Some(paths) if !paths.is_empty() => {
                        self.status = format!("⏳ Importing {} selections...", paths.len());
                        Task::perform(
                            ingest::ingest_paths(db_path, folder, paths),
                            Message::UploadDone,
                        )
                    }
                    _ => Task::none(),
                }
            }
            Message::UploadDone(report) => {
                self.status = format!(
                    "✅ Import complete: {} added, {} skipped, {} failed",
                    report.added, report.skipped, report.failed
                );
                self.refresh_index();
                Task::none()
            }
            Message::PreferRemoteToggled(value) => {
                self.config.prefer_remote = value;
                self.config.save();
                Task::none()
            }
            Message::ConvertFolder => {
                if self.converting {
                    return Task::none();
                }
                let Some(db_path) = self.db_path.clone() else {
                    self.report(ScanError::StoreNotReady);
                    return Task::none();
                };
                let Some(folder) = self.nav.active_folder().map(str::to_string) else {
                    self.report(ScanError::NoActiveFolder);
                    return Task::none();
                };

                let processor = if self.config.prefer_remote {
                    match RemoteProcessor::new(self.config.processor_url.clone()) {
                        Ok(service) => Processor::Remote(service),
                        Err(e) => {
                            self.report(e);
                            return Task::none();
                        }
                    }
                } else {
                    Processor::Local
                };

                self.converting = true;
                self.status = format!("⏳ Converting '{}'...", folder);
                Task::perform(
                    convert_folder_task(db_path, folder, processor),
                    Message::ConversionDone,
                )
            }
            Message::ConversionDone(Ok(report)) => {
                self.converting = false;
                self.status = format!(
                    "✅ Conversion complete → '{}' ({} converted, {} failed)",
                    report.destination, report.converted, report.failed
                );
                self.refresh_index();
                Task::none()
            }
            Message::ConversionDone(Err(e)) => {
                self.converting = false;
                eprintln!("⚠️  {}", e);
                self.status = format!("⚠️ {}", e);
                Task::none()
            }
            Message::ExportFolder => {
                self.export_active_folder();
                Task::none()
            }
            Message::ClearAll => {
                self.clear_all();
                Task::none()
            }
        }
    }

    /// Bundle the active folder and let the user pick where to save it
    fn export_active_folder(&mut self) {
        let bundled = self.store().and_then(|store| {
            let folder = self.nav.active_folder().ok_or(ScanError::NoActiveFolder)?;
            let index = FolderIndex::build(store.list_all()?);
            let bundle = export::bundle_folder(folder, index.assets_in(folder))?;
            Ok((folder.to_string(), bundle))
        });

        match bundled {
            Ok((folder, bundle)) => {
                let mut dialog = FileDialog::new()
                    .set_title("Save export bundle")
                    .set_file_name(export::bundle_file_name(&folder));
                if let Some(downloads) = dirs_next::download_dir() {
                    dialog = dialog.set_directory(downloads);
                }

                if let Some(path) = dialog.save_file() {
                    match std::fs::write(&path, &bundle) {
                        Ok(()) => {
                            println!("📦 Exported '{}' to {}", folder, path.display());
                            self.status = format!("📦 Exported to {}", path.display());
                        }
                        Err(e) => self.report(ScanError::ExportFailure(e.to_string())),
                    }
                }
            }
            Err(e) => self.report(e),
        }
    }

    /// Wipe the session store after an explicit confirmation
    fn clear_all(&mut self) {
        if self.store.is_none() {
            self.report(ScanError::StoreNotReady);
            return;
        }

        let confirmed = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Delete all images")
            .set_description("Remove every captured and uploaded frame from this session?")
            .set_buttons(MessageButtons::YesNo)
            .show();

        if confirmed != MessageDialogResult::Yes {
            // Declining leaves the store untouched
            return;
        }

        match self.store().and_then(|store| store.clear()) {
            Ok(()) => {
                self.status = String::from("🗑️ All images deleted");
                self.refresh_index();
            }
            Err(e) => self.report(e),
        }
    }

    /// Build the user interface for the current screen
    fn view(&self) -> Element<Message> {
        let screen = match self.nav.view() {
            View::Menu => ui::views::menu(&self.index, &self.folder_input, &self.status),
            View::FolderContents => {
                let folder = self.nav.active_folder().unwrap_or("");
                ui::views::folder_contents(
                    folder,
                    self.index.assets_in(folder),
                    self.config.prefer_remote,
                    self.converting,
                    &self.status,
                )
            }
            View::Scanning => {
                let folder = self.nav.active_folder().unwrap_or("");
                ui::views::scanning(folder, &self.status)
            }
        };

        container(screen)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application("Film Scanner", FilmScanner::update, FilmScanner::view)
        .theme(FilmScanner::theme)
        .centered()
        .run_with(FilmScanner::new)
}

/// Prepare the session database off the UI thread.
///
/// The connection is opened and dropped inside the blocking task; only the
/// path crosses back to the UI thread.
async fn prepare_store_async() -> Result<PathBuf, String> {
    tokio::task::spawn_blocking(AssetStore::prepare_session)
        .await
        .map_err(|e| format!("task join error: {}", e))?
        .map_err(|e| e.to_string())
}

/// Run one conversion batch in the background
async fn convert_folder_task(
    db_path: PathBuf,
    folder: String,
    processor: Processor,
) -> Result<BatchReport, String> {
    process::convert_folder(&db_path, &folder, &processor)
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_operations_fail_before_initialization() {
        let (app, _task) = FilmScanner::new();
        assert!(matches!(app.store(), Err(ScanError::StoreNotReady)));
    }
}
