use egui::{Color32, Modifiers, Painter, Pos2, Ui};
use serde::{Deserialize, Serialize};

use crate::command::{Command, DocumentContext};
use crate::config::CanvasConfig;

mod circle;
mod dropper;
mod eraser;
mod pencil;
mod square;

pub use circle::CircleTool;
pub use dropper::DropperTool;
pub use eraser::EraserTool;
pub use pencil::PencilTool;
pub use square::SquareTool;

/// Outline colour for tool cursors.
pub(crate) const PREVIEW_COLOR: Color32 = Color32::GRAY;

/// Tool trait defines the interface for all drawing tools.
///
/// The UI layer resolves hit-testing and only forwards points that fall on
/// the canvas, in screen space. Tools mutate the document through the
/// context and take their own undo snapshot before the first mutation of a
/// gesture.
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Handle pointer press on the canvas.
    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command>;

    /// Handle every following frame while the pointer stays pressed.
    fn on_pointer_held(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command>;

    /// Handle pointer release.
    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command>;

    fn set_color(&mut self, _color: Color32) {}

    /// Keyboard modifiers currently held, refreshed every frame.
    fn set_modifiers(&mut self, _modifiers: Modifiers) {}

    /// The tool's size parameter (width, radius or thickness), if it has one.
    fn size(&self) -> Option<f32> {
        None
    }

    /// Nudges the size parameter, clamped to the tool's range.
    fn adjust_size(&mut self, _delta: f32) {}

    /// Show tool-specific controls in the tool panel.
    fn ui(&mut self, _ui: &mut Ui) {}

    /// Draw the cursor outline or in-progress shape.
    fn preview(&self, _painter: &Painter, _pointer: Pos2) {}
}

/// Size slider shared by the tools that have one. The slider range may be
/// narrower than what `[`/`]` reach, so it never clamps the value itself.
pub(crate) fn size_slider(
    ui: &mut Ui,
    label: &str,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
) {
    ui.label(format!("{label}: {}px", *value as i32));
    ui.add(
        egui::Slider::new(value, range)
            .show_value(false)
            .clamp_to_range(false),
    );
}

/// Enum representing all available tool types
/// This allows us to avoid using Box<dyn Tool> and keeps per-tool drag state owned by its variant
#[derive(Debug, Clone)]
pub enum ToolType {
    Pencil(PencilTool),
    Eraser(EraserTool),
    Dropper(DropperTool),
    Square(SquareTool),
    Circle(CircleTool),
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Pencil(tool) => tool.name(),
            Self::Eraser(tool) => tool.name(),
            Self::Dropper(tool) => tool.name(),
            Self::Square(tool) => tool.name(),
            Self::Circle(tool) => tool.name(),
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        match self {
            Self::Pencil(tool) => tool.on_pointer_down(pos, ctx),
            Self::Eraser(tool) => tool.on_pointer_down(pos, ctx),
            Self::Dropper(tool) => tool.on_pointer_down(pos, ctx),
            Self::Square(tool) => tool.on_pointer_down(pos, ctx),
            Self::Circle(tool) => tool.on_pointer_down(pos, ctx),
        }
    }

    fn on_pointer_held(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        match self {
            Self::Pencil(tool) => tool.on_pointer_held(pos, ctx),
            Self::Eraser(tool) => tool.on_pointer_held(pos, ctx),
            Self::Dropper(tool) => tool.on_pointer_held(pos, ctx),
            Self::Square(tool) => tool.on_pointer_held(pos, ctx),
            Self::Circle(tool) => tool.on_pointer_held(pos, ctx),
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut DocumentContext) -> Option<Command> {
        match self {
            Self::Pencil(tool) => tool.on_pointer_up(pos, ctx),
            Self::Eraser(tool) => tool.on_pointer_up(pos, ctx),
            Self::Dropper(tool) => tool.on_pointer_up(pos, ctx),
            Self::Square(tool) => tool.on_pointer_up(pos, ctx),
            Self::Circle(tool) => tool.on_pointer_up(pos, ctx),
        }
    }

    fn set_color(&mut self, color: Color32) {
        match self {
            Self::Pencil(tool) => tool.set_color(color),
            Self::Eraser(tool) => tool.set_color(color),
            Self::Dropper(tool) => tool.set_color(color),
            Self::Square(tool) => tool.set_color(color),
            Self::Circle(tool) => tool.set_color(color),
        }
    }

    fn set_modifiers(&mut self, modifiers: Modifiers) {
        match self {
            Self::Pencil(tool) => tool.set_modifiers(modifiers),
            Self::Eraser(tool) => tool.set_modifiers(modifiers),
            Self::Dropper(tool) => tool.set_modifiers(modifiers),
            Self::Square(tool) => tool.set_modifiers(modifiers),
            Self::Circle(tool) => tool.set_modifiers(modifiers),
        }
    }

    fn size(&self) -> Option<f32> {
        match self {
            Self::Pencil(tool) => tool.size(),
            Self::Eraser(tool) => tool.size(),
            Self::Dropper(tool) => tool.size(),
            Self::Square(tool) => tool.size(),
            Self::Circle(tool) => tool.size(),
        }
    }

    fn adjust_size(&mut self, delta: f32) {
        match self {
            Self::Pencil(tool) => tool.adjust_size(delta),
            Self::Eraser(tool) => tool.adjust_size(delta),
            Self::Dropper(tool) => tool.adjust_size(delta),
            Self::Square(tool) => tool.adjust_size(delta),
            Self::Circle(tool) => tool.adjust_size(delta),
        }
    }

    fn ui(&mut self, ui: &mut Ui) {
        match self {
            Self::Pencil(tool) => tool.ui(ui),
            Self::Eraser(tool) => tool.ui(ui),
            Self::Dropper(tool) => tool.ui(ui),
            Self::Square(tool) => tool.ui(ui),
            Self::Circle(tool) => tool.ui(ui),
        }
    }

    fn preview(&self, painter: &Painter, pointer: Pos2) {
        match self {
            Self::Pencil(tool) => tool.preview(painter, pointer),
            Self::Eraser(tool) => tool.preview(painter, pointer),
            Self::Dropper(tool) => tool.preview(painter, pointer),
            Self::Square(tool) => tool.preview(painter, pointer),
            Self::Circle(tool) => tool.preview(painter, pointer),
        }
    }
}

/// Tool sizes and colour that survive restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub pencil_width: f32,
    pub eraser_radius: f32,
    pub square_thickness: f32,
    pub circle_thickness: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}

impl ToolSettings {
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            pencil_width: config.pencil_width,
            eraser_radius: config.eraser_radius,
            square_thickness: config.shape_thickness,
            circle_thickness: config.shape_thickness,
        }
    }
}

/// The full tool palette, in toolbar order.
#[derive(Debug, Clone)]
pub struct ToolBox {
    tools: Vec<ToolType>,
    active: usize,
}

impl ToolBox {
    pub fn new(settings: &ToolSettings, config: &CanvasConfig, color: Color32) -> Self {
        let mut tools = vec![
            ToolType::Pencil(PencilTool::new(settings.pencil_width)),
            ToolType::Eraser(EraserTool::new(settings.eraser_radius)),
            ToolType::Dropper(DropperTool::new()),
            ToolType::Square(SquareTool::new(settings.square_thickness)),
            ToolType::Circle(CircleTool::new(
                settings.circle_thickness,
                config.circle_segments,
            )),
        ];
        for tool in &mut tools {
            tool.set_color(color);
        }
        Self { tools, active: 0 }
    }

    pub fn tools(&self) -> &[ToolType] {
        &self.tools
    }

    pub fn active(&self) -> &ToolType {
        &self.tools[self.active]
    }

    pub fn active_mut(&mut self) -> &mut ToolType {
        &mut self.tools[self.active]
    }

    pub fn select(&mut self, index: usize) {
        if index < self.tools.len() {
            self.active = index;
            log::debug!("Selected tool {}", self.tools[index].name());
        }
    }

    pub fn select_by_name(&mut self, name: &str) -> bool {
        match self.tools.iter().position(|tool| tool.name() == name) {
            Some(index) => {
                self.select(index);
                true
            }
            None => false,
        }
    }

    /// Forwards a colour to every tool so switching tools keeps it.
    pub fn set_color(&mut self, color: Color32) {
        for tool in &mut self.tools {
            tool.set_color(color);
        }
    }

    pub fn settings(&self) -> ToolSettings {
        let mut settings = ToolSettings::default();
        for tool in &self.tools {
            match tool {
                ToolType::Pencil(t) => settings.pencil_width = t.width(),
                ToolType::Eraser(t) => settings.eraser_radius = t.radius(),
                ToolType::Square(t) => settings.square_thickness = t.thickness(),
                ToolType::Circle(t) => settings.circle_thickness = t.thickness(),
                ToolType::Dropper(_) => {}
            }
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbox_selection_and_settings() {
        let config = CanvasConfig::default();
        let mut toolbox = ToolBox::new(&ToolSettings::default(), &config, Color32::RED);
        assert_eq!(toolbox.active().name(), "Pencil");

        assert!(toolbox.select_by_name("Eraser"));
        assert_eq!(toolbox.active().size(), Some(20.0));
        toolbox.active_mut().adjust_size(1000.0);
        assert_eq!(toolbox.active().size(), Some(150.0));
        assert_eq!(toolbox.settings().eraser_radius, 150.0);

        assert!(!toolbox.select_by_name("Lasso"));
        assert_eq!(toolbox.active().name(), "Eraser");
    }
}
