use iced::widget::{button, checkbox, column, image, row, scrollable, text, text_input, Column};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::state::data::ImageAsset;
use crate::state::index::FolderIndex;
use crate::Message;

/// Height of a frame thumbnail in the folder grid
const THUMBNAIL_HEIGHT: f32 = 140.0;

/// Landing screen: create a folder or open an existing one.
pub fn menu<'a>(index: &'a FolderIndex, folder_input: &'a str, status: &'a str) -> Element<'a, Message> {
    let mut folders: Column<Message> = Column::new().spacing(8).align_x(Alignment::Center);
    if index.is_empty() {
        folders = folders.push(text("No folders yet. Name one above to start.").size(14));
    }
    for name in index.folder_names() {
        let count = index.assets_in(name).len();
        folders = folders.push(
            button(text(format!("{} ({})", name, count)))
                .on_press(Message::OpenFolder(name.to_string()))
                .padding(8),
        );
    }

    column![
        text("Film Scanner").size(48),
        text("Organize, invert and export your film frames").size(16),
        row![
            text_input("New folder name", folder_input)
                .on_input(Message::FolderInputChanged)
                .on_submit(Message::CreateFolder)
                .padding(8)
                .width(Length::Fixed(260.0)),
            button("Create").on_press(Message::CreateFolder).padding(8),
        ]
        .spacing(8),
        scrollable(folders).height(Length::Fill),
        button("Delete all images")
            .on_press(Message::ClearAll)
            .padding(8),
        text(status).size(16),
    ]
    .spacing(20)
    .padding(40)
    .align_x(Alignment::Center)
    .into()
}

/// Contents of the active folder: the frame grid and every folder-scoped
/// operation.
pub fn folder_contents<'a>(
    folder: &'a str,
    assets: &'a [ImageAsset],
    prefer_remote: bool,
    converting: bool,
    status: &'a str,
) -> Element<'a, Message> {
    let cells: Vec<Element<'a, Message>> = assets
        .iter()
        .map(|asset| {
            let handle = image::Handle::from_bytes(asset.payload.clone());
            column![
                image(handle).height(Length::Fixed(THUMBNAIL_HEIGHT)),
                text(asset.name.as_str()).size(12),
            ]
            .spacing(4)
            .align_x(Alignment::Center)
            .into()
        })
        .collect();

    let grid = Wrap::with_elements(cells).spacing(10.0).line_spacing(10.0);

    let convert_label = if converting {
        "Converting..."
    } else {
        "Convert negatives"
    };

    column![
        row![
            button("← Back").on_press(Message::GoBack).padding(8),
            text(folder).size(32),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        text(format!("{} frames", assets.len())).size(14),
        scrollable(grid).width(Length::Fill).height(Length::Fill),
        checkbox("Convert through the processing service", prefer_remote)
            .on_toggle(Message::PreferRemoteToggled),
        row![
            button("Start scan").on_press(Message::StartScan).padding(8),
            button("Upload images")
                .on_press(Message::UploadFiles)
                .padding(8),
            button(convert_label)
                .on_press_maybe((!converting).then_some(Message::ConvertFolder))
                .padding(8),
            button("Export folder")
                .on_press(Message::ExportFolder)
                .padding(8),
        ]
        .spacing(8),
        text(status).size(16),
    ]
    .spacing(14)
    .padding(30)
    .align_x(Alignment::Center)
    .into()
}

/// Scanning screen. The live preview surface is drawn by the capture
/// backend; this screen only hosts the capture controls.
pub fn scanning<'a>(folder: &'a str, status: &'a str) -> Element<'a, Message> {
    column![
        text(format!("Scanning into '{}'", folder)).size(32),
        text("Live preview is provided by the capture backend").size(14),
        row![
            button("Capture frame")
                .on_press(Message::CaptureFrame)
                .padding(10),
            button("← Back").on_press(Message::GoBack).padding(10),
        ]
        .spacing(12),
        text(status).size(16),
    ]
    .spacing(20)
    .padding(40)
    .align_x(Alignment::Center)
    .into()
}
