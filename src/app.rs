use std::path::PathBuf;

use egui::{Color32, Key, Modifiers, Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::color::{ColorSelection, Hsv};
use crate::command::{Command, CommandOutcome, DocumentContext};
use crate::config::CanvasConfig;
use crate::file_handler::FileHandler;
use crate::panels::{central_panel, menu_bar, tools_panel};
use crate::texture_manager::TextureManager;
use crate::tools::{Tool, ToolBox, ToolSettings, ToolType};

/// What survives a restart. The drawing itself is never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PersistedSettings {
    pub color: ColorSelection,
    pub tools: ToolSettings,
}

/// The desktop shell around a [`DocumentContext`].
pub struct PaintApp {
    config: CanvasConfig,
    context: DocumentContext,
    tools: ToolBox,
    color: ColorSelection,
    textures: TextureManager,
    file_handler: FileHandler,
    /// Path typed into the menu bar, used by open and export
    path_input: String,
    status: Option<String>,
    /// Screen rect the canvas occupied last frame
    canvas_rect: Rect,
    /// A press landed on the canvas and has not been released yet
    gesture_active: bool,
    last_pointer: Pos2,
}

/// Primary-button pointer state for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerFrame {
    /// Latest pointer position, if the pointer is over the window
    pub pos: Option<Pos2>,
    /// The pointer is over the canvas and not covered by another widget
    pub on_canvas: bool,
    pub pressed: bool,
    pub down: bool,
    pub released: bool,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: CanvasConfig) -> Self {
        let settings = cc
            .storage
            .and_then(|storage| eframe::get_value::<PersistedSettings>(storage, eframe::APP_KEY))
            .unwrap_or_else(|| PersistedSettings {
                color: ColorSelection::default(),
                tools: ToolSettings::from_config(&config),
            });
        Self::with_settings(config, settings)
    }

    pub fn with_settings(config: CanvasConfig, settings: PersistedSettings) -> Self {
        let tools = ToolBox::new(&settings.tools, &config, settings.color.color());
        Self {
            context: DocumentContext::new(config.history_capacity),
            tools,
            color: settings.color,
            textures: TextureManager::new(),
            file_handler: FileHandler::new(),
            path_input: String::new(),
            status: None,
            canvas_rect: Rect::NOTHING,
            gesture_active: false,
            last_pointer: Pos2::ZERO,
            config,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn context(&self) -> &DocumentContext {
        &self.context
    }

    pub fn tools(&self) -> &ToolBox {
        &self.tools
    }

    pub fn active_tool(&self) -> &ToolType {
        self.tools.active()
    }

    pub fn active_tool_mut(&mut self) -> &mut ToolType {
        self.tools.active_mut()
    }

    pub fn set_active_tool_by_name(&mut self, name: &str) -> bool {
        self.tools.select_by_name(name)
    }

    pub fn color(&self) -> ColorSelection {
        self.color
    }

    pub fn path_input_mut(&mut self) -> &mut String {
        &mut self.path_input
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn settings(&self) -> PersistedSettings {
        PersistedSettings {
            color: self.color,
            tools: self.tools.settings(),
        }
    }

    /// Records where the canvas is on screen; background pixels are placed
    /// relative to its top-left corner.
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
        self.context.origin = rect.min.to_vec2();
    }

    /// Selects `color` and forwards it to every tool. Fully transparent
    /// samples are ignored.
    pub fn pick_color(&mut self, color: Color32) {
        if self.color.pick(color) {
            self.tools.set_color(self.color.color());
        }
    }

    pub fn set_hsv(&mut self, hsv: Hsv) {
        self.color.set_hsv(hsv);
        self.tools.set_color(self.color.color());
    }

    /// Executes a command, routing picked colours to the selection and
    /// failures to the status line.
    pub fn execute(&mut self, command: Command) {
        match command.execute(&mut self.context) {
            Ok(CommandOutcome::ColorPicked(color)) => self.pick_color(color),
            Ok(CommandOutcome::Changed | CommandOutcome::NoOp) => {}
            Err(err) => {
                log::error!("{err}");
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn undo(&mut self) {
        self.execute(Command::Undo);
    }

    pub fn redo(&mut self) {
        self.execute(Command::Redo);
    }

    /// The path typed in the menu bar, or an error in the status line.
    fn typed_path(&mut self) -> Option<PathBuf> {
        let path = self.path_input.trim();
        if path.is_empty() {
            self.status = Some("Enter a file path first".to_owned());
            None
        } else {
            Some(PathBuf::from(path))
        }
    }

    pub fn open_background(&mut self) {
        if let Some(path) = self.typed_path() {
            self.execute(Command::OpenBackground(path));
        }
    }

    /// Exports at the size the canvas currently has on screen.
    pub fn export(&mut self) {
        if let Some(path) = self.typed_path() {
            self.status = None;
            let size = self.canvas_rect.size();
            self.execute(Command::Export {
                path: path.clone(),
                width: size.x.max(0.0) as u32,
                height: size.y.max(0.0) as u32,
            });
            if self.status.is_none() {
                self.status = Some(format!("Exported to {}", path.display()));
            }
        }
    }

    /// Forwards this frame's pointer state to the active tool.
    ///
    /// Presses only start a gesture on the canvas and held frames are only
    /// forwarded while on it. A release always ends the gesture, at the
    /// last known pointer position if the pointer has left the window.
    pub fn handle_pointer(&mut self, frame: PointerFrame) {
        if let Some(pos) = frame.pos {
            self.last_pointer = pos;
        }
        let pos = self.last_pointer;
        let mut commands = Vec::new();
        let tool = self.tools.active_mut();

        if frame.pressed {
            if frame.on_canvas {
                self.gesture_active = true;
                commands.extend(tool.on_pointer_down(pos, &mut self.context));
            }
        } else if frame.down && self.gesture_active && frame.on_canvas {
            commands.extend(tool.on_pointer_held(pos, &mut self.context));
        }

        if frame.released && self.gesture_active {
            self.gesture_active = false;
            commands.extend(tool.on_pointer_up(pos, &mut self.context));
        }

        for command in commands {
            self.execute(command);
        }
    }

    /// Undo/redo and tool size shortcuts. Skipped while a text field has
    /// keyboard focus.
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        // Ctrl+Shift+Z has to be consumed before Ctrl+Z, which also matches it
        let (redo, undo) = ctx.input_mut(|i| {
            let redo = i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z)
                || i.consume_key(Modifiers::COMMAND, Key::Y);
            let undo = i.consume_key(Modifiers::COMMAND, Key::Z);
            (redo, undo)
        });
        if redo {
            self.redo();
        }
        if undo {
            self.undo();
        }

        let (shrink, grow) = ctx.input(|i| (i.key_down(Key::OpenBracket), i.key_down(Key::CloseBracket)));
        let step = self.config.size_step;
        if shrink {
            self.tools.active_mut().adjust_size(-step);
        }
        if grow {
            self.tools.active_mut().adjust_size(step);
        }
        if shrink || grow {
            ctx.request_repaint();
        }
    }

    /// Everything the canvas panel paints: the document, its background
    /// texture (uploaded if stale) and the active tool for the preview.
    pub(crate) fn canvas_parts(
        &mut self,
        ctx: &egui::Context,
    ) -> (&DocumentContext, Option<&egui::TextureHandle>, &ToolType) {
        let texture = self.textures.background_texture(ctx, &self.context.document);
        (&self.context, texture, self.tools.active())
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.file_handler.preview_files_being_dropped(ctx);
        if let Some(command) = self.file_handler.take_dropped_files(ctx) {
            self.execute(command);
        }

        self.handle_shortcuts(ctx);
        let modifiers = ctx.input(|i| i.modifiers);
        self.tools.active_mut().set_modifiers(modifiers);

        menu_bar(self, ctx);
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
