use std::path::{Path, PathBuf};

use egui::{Align2, Color32, Context, DroppedFile, FontId, Id, LayerId, Order};
use image::ImageFormat;

use crate::command::Command;

/// Turns image files dropped on the window into `OpenBackground` commands.
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    /// Command for the image files dropped this frame. Only the last image
    /// counts, since each one replaces the whole document.
    pub fn take_dropped_files(&mut self, ctx: &Context) -> Option<Command> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        dropped
            .iter()
            .filter_map(|file| self.image_path(file))
            .last()
            .map(Command::OpenBackground)
    }

    fn image_path(&self, file: &DroppedFile) -> Option<PathBuf> {
        let Some(path) = &file.path else {
            log::warn!("Dropped file has no path: {}", file.name);
            return None;
        };
        if is_image_file(path) {
            log::info!("Image dropped: {}", path.display());
            Some(path.clone())
        } else {
            log::warn!("Dropped file is not a supported image: {}", path.display());
            None
        }
    }

    /// Darkens the window while files are dragged over it.
    pub fn preview_files_being_dropped(&self, ctx: &Context) {
        let text = ctx.input(|i| {
            i.raw.hovered_files.iter().fold(String::new(), |mut text, file| {
                match &file.path {
                    Some(path) => text += &format!("\n{}", path.display()),
                    None => text += "\n(path not available)",
                }
                text
            })
        });
        if text.is_empty() {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            format!("Open as background:{text}"),
            FontId::proportional(20.0),
            Color32::WHITE,
        );
    }
}

/// True if the extension names a format the image decoder knows.
pub fn is_image_file(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("photo.png")));
        assert!(is_image_file(Path::new("photo.jpeg")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn test_dropped_image_becomes_open_command() {
        let ctx = Context::default();
        let mut input = egui::RawInput::default();
        input.dropped_files = vec![
            DroppedFile {
                path: Some(PathBuf::from("a.png")),
                ..Default::default()
            },
            DroppedFile {
                path: Some(PathBuf::from("b.txt")),
                ..Default::default()
            },
        ];

        let mut handler = FileHandler::new();
        let mut command = None;
        let _ = ctx.run(input, |ctx| command = handler.take_dropped_files(ctx));

        assert_eq!(command, Some(Command::OpenBackground(PathBuf::from("a.png"))));
    }
}
