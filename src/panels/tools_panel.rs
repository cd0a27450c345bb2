use egui::epaint::{Mesh, Vertex};
use egui::{Color32, Pos2, Sense, Stroke, Vec2};

use crate::PaintApp;
use crate::color::{ColorWheel, Hsv};
use crate::tools::Tool;

const WHEEL_RADIUS: f32 = 60.0;
const WHEEL_SEGMENTS: usize = 72;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .exact_width(app.config().toolbar_width)
        .show(ctx, |ui| {
            ui.heading("Tools");

            // Collect tool names first to avoid borrowing issues
            let active_tool_name = app.active_tool().name();
            let tool_names: Vec<&'static str> =
                app.tools().tools().iter().map(|tool| tool.name()).collect();

            for tool_name in tool_names {
                let is_selected = active_tool_name == tool_name;
                if ui.selectable_label(is_selected, tool_name).clicked() {
                    log::info!("Tool selected from UI: {}", tool_name);
                    app.set_active_tool_by_name(tool_name);
                }
            }
            ui.separator();

            app.active_tool_mut().ui(ui);
            ui.separator();

            color_picker(app, ui);
            ui.separator();

            ui.horizontal(|ui| {
                let history = &app.context().history;
                let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                let (undo_len, redo_len) = (history.undo_len(), history.redo_len());

                if ui
                    .add_enabled(can_undo, egui::Button::new(format!("Undo ({undo_len})")))
                    .clicked()
                {
                    app.undo();
                }
                if ui
                    .add_enabled(can_redo, egui::Button::new(format!("Redo ({redo_len})")))
                    .clicked()
                {
                    app.redo();
                }
            });
        });
}

/// HSV wheel for hue and saturation, a slider for value and a swatch.
fn color_picker(app: &mut PaintApp, ui: &mut egui::Ui) {
    let selection = app.color();
    let mut hsv = selection.hsv();

    let (response, painter) =
        ui.allocate_painter(Vec2::splat(WHEEL_RADIUS * 2.0), Sense::click_and_drag());
    let wheel = ColorWheel::new(response.rect.center(), WHEEL_RADIUS);

    painter.add(wheel_mesh(&wheel, hsv.val));
    let marker = wheel.position_of(hsv.hue, hsv.sat);
    painter.circle_stroke(marker, 4.0, Stroke::new(2.0, Color32::WHITE));
    painter.circle_stroke(marker, 5.0, Stroke::new(1.0, Color32::BLACK));

    let mut changed = false;
    if let Some(pos) = response.interact_pointer_pos() {
        // Presses must land on the wheel; drags may leave it
        if response.dragged() || wheel.contains(pos) {
            let (hue, sat) = wheel.hue_sat_at(pos);
            hsv = Hsv::new(hue, sat, hsv.val);
            changed = true;
        }
    }

    ui.label("Value");
    changed |= ui
        .add(egui::Slider::new(&mut hsv.val, 0.0..=1.0).show_value(false))
        .changed();

    if changed {
        app.set_hsv(hsv);
    }

    let (swatch, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), 20.0), Sense::hover());
    ui.painter().rect_filled(swatch, 2.0, app.color().color());
}

/// Triangle fan from the centre (white at `val`) to fully saturated hues on
/// the rim; vertex colour interpolation approximates the saturation ramp.
fn wheel_mesh(wheel: &ColorWheel, val: f32) -> Mesh {
    let mut mesh = Mesh::default();
    let center_color = Hsv::new(0.0, 0.0, val).to_color(255);
    mesh.vertices.push(Vertex {
        pos: wheel.center,
        uv: egui::epaint::WHITE_UV,
        color: center_color,
    });

    for i in 0..=WHEEL_SEGMENTS {
        let hue = 360.0 * i as f32 / WHEEL_SEGMENTS as f32;
        let pos: Pos2 = wheel.position_of(hue, 1.0);
        mesh.vertices.push(Vertex {
            pos,
            uv: egui::epaint::WHITE_UV,
            color: Hsv::new(hue, 1.0, val).to_color(255),
        });
    }
    for i in 1..=WHEEL_SEGMENTS as u32 {
        mesh.add_triangle(0, i, i + 1);
    }
    mesh
}
