#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod command;
pub mod compositor;
pub mod config;
pub mod document;
pub mod eraser;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod geometry;
pub mod panels;
pub mod raster;
pub mod stroke;
pub mod texture_manager;
pub mod tools;

pub use app::PaintApp;
pub use color::{ColorSelection, ColorWheel, Hsv};
pub use command::{Command, CommandOutcome, DocumentContext, History};
pub use compositor::Framebuffer;
pub use config::CanvasConfig;
pub use document::{CanvasDocument, DocumentSnapshot};
pub use error::{CanvasError, CanvasResult};
pub use raster::BackgroundRaster;
pub use stroke::Stroke;
pub use tools::{Tool, ToolType};
