use iced::widget::{self, button, column, container, scrollable, slider, text, Column};
use iced::{event, window, Alignment, Color, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod compress;
mod error;
mod files;
mod state;

use error::{CompressError, FileError};
use state::data::{CompressedImage, QualityLevel, SourceImage, DOWNLOAD_FILE_NAME};
use state::panel::{LoadId, PanelState, RunId};
use state::settings::CompressionSettings;

/// Main application state
struct ImageCompressor {
    /// Engine configuration loaded at startup
    settings: CompressionSettings,
    /// The compression workflow
    panel: PanelState,
    /// Outcome of the last download, shown under the result block
    save_status: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Choose Image"
    PickSource,
    /// A file was chosen in the picker or dropped on the window
    SourcePicked(PathBuf),
    /// Background file read finished for the tagged load
    SourceLoaded(LoadId, Result<SourceImage, FileError>),
    /// Slider moved
    QualityChanged(f32),
    /// User clicked the trigger button
    Compress,
    /// Background compression finished for the tagged run
    CompressionFinished(RunId, Result<CompressedImage, CompressError>),
    /// User clicked "Download Compressed Image"
    Download,
    /// Background write finished
    Saved(Result<PathBuf, FileError>),
}

impl ImageCompressor {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = CompressionSettings::default_path()
            .map(|path| CompressionSettings::load_or_init(&path))
            .unwrap_or_default();

        info!(
            "🎨 Image Compressor ready (max {} MB, max edge {}px)",
            settings.max_size_mb, settings.max_width_or_height
        );

        (
            ImageCompressor {
                panel: PanelState::new(settings.default_quality),
                settings,
                save_status: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickSource => {
                let file = FileDialog::new()
                    .set_title("Select an Image")
                    .add_filter("Images", &files::IMAGE_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => Task::done(Message::SourcePicked(path)),
                    None => Task::none(),
                }
            }
            Message::SourcePicked(path) => {
                if !files::is_image_path(&path) {
                    warn!("Ignoring non-image file: {}", path.display());
                    return Task::none();
                }
                let id = self.panel.load_start();
                Task::perform(files::load_source(path), move |loaded| {
                    Message::SourceLoaded(id, loaded)
                })
            }
            Message::SourceLoaded(id, Ok(source)) => {
                if self.panel.load_complete(id, source) {
                    self.save_status = None;
                }
                Task::none()
            }
            Message::SourceLoaded(_, Err(e)) => {
                // Same as cancelling the picker: keep the current selection
                warn!("⚠️  {}", e);
                Task::none()
            }
            Message::QualityChanged(value) => {
                self.panel.set_quality(value);
                Task::none()
            }
            Message::Compress => {
                let Some(run) = self.panel.run_start() else {
                    return Task::none();
                };

                self.save_status = None;
                let id = run.id;
                let options = self.settings.options(run.quality);

                Task::perform(compress::compress(run.source, options), move |outcome| {
                    Message::CompressionFinished(id, outcome)
                })
            }
            Message::CompressionFinished(id, outcome) => {
                self.panel.run_complete(id, outcome);
                Task::none()
            }
            Message::Download => {
                let Some(result) = self.panel.result() else {
                    return Task::none();
                };

                let mut dialog = FileDialog::new()
                    .set_title("Save Compressed Image")
                    .set_file_name(DOWNLOAD_FILE_NAME)
                    .add_filter("JPEG", &["jpg", "jpeg"]);
                if let Some(dir) = dirs::download_dir() {
                    dialog = dialog.set_directory(dir);
                }

                match dialog.save_file() {
                    Some(path) => Task::perform(
                        files::save_result(path, Arc::clone(&result.bytes)),
                        Message::Saved,
                    ),
                    None => Task::none(),
                }
            }
            Message::Saved(Ok(path)) => {
                self.save_status = Some(format!("Saved to {}", path.display()));
                Task::none()
            }
            Message::Saved(Err(e)) => {
                warn!("⚠️  {}", e);
                self.save_status = Some("Could not save the compressed image.".to_string());
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut content: Column<Message> = column![
            text("Image Compressor").size(32),
            button("Choose Image")
                .on_press(Message::PickSource)
                .padding(10),
        ]
        .spacing(20)
        .padding(40)
        .max_width(560.0)
        .align_x(Alignment::Center);

        if let Some(source) = self.panel.source() {
            content = content
                .push(text(&source.name).size(14))
                .push(widget::image(source.preview.clone()).width(Length::Fill));
        }

        content = content.push(
            column![
                text(self.panel.quality_label()),
                slider(
                    QualityLevel::MIN..=QualityLevel::MAX,
                    self.panel.quality().value(),
                    Message::QualityChanged,
                )
                .step(QualityLevel::STEP),
            ]
            .spacing(8),
        );

        content = content.push(
            button(text(self.panel.trigger_label()).width(Length::Fill).center())
                .on_press_maybe(self.panel.can_compress().then_some(Message::Compress))
                .padding(10)
                .width(Length::Fill),
        );

        if let Some(message) = self.panel.error() {
            content = content.push(text(message).color(Color::from_rgb(0.94, 0.27, 0.27)));
        }

        if let (Some(original), Some(compressed)) = (
            self.panel.original_size_label(),
            self.panel.compressed_size_label(),
        ) {
            let mut block = column![
                text(format!("Original size: {}", original)),
                text(format!("Compressed size: {}", compressed)),
                button(text("Download Compressed Image").width(Length::Fill).center())
                    .on_press(Message::Download)
                    .style(button::success)
                    .padding(10)
                    .width(Length::Fill),
            ]
            .spacing(10);

            if let Some(status) = &self.save_status {
                block = block.push(text(status).size(14));
            }

            content = content.push(
                container(block)
                    .padding(16)
                    .width(Length::Fill)
                    .style(container::rounded_box),
            );
        }

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Accept images dropped onto the window
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::SourcePicked(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    iced::application(
        "Image Compressor",
        ImageCompressor::update,
        ImageCompressor::view,
    )
    .subscription(ImageCompressor::subscription)
    .theme(ImageCompressor::theme)
    .window_size((560.0, 780.0))
    .centered()
    .run_with(ImageCompressor::new)
}
