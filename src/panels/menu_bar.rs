use crate::PaintApp;
use crate::command::Command;

pub fn menu_bar(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar")
        .exact_height(app.config().menu_bar_height)
        .show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New").clicked() {
                        app.execute(Command::NewCanvas);
                        ui.close_menu();
                    }
                    if ui.button("Open background").clicked() {
                        app.open_background();
                        ui.close_menu();
                    }
                    if ui.button("Export").clicked() {
                        app.export();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let history = &app.context().history;
                    let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                    if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                        app.undo();
                        ui.close_menu();
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                        app.redo();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Canvas", |ui| {
                    let has_background = app.context().document.background().is_some();
                    if ui
                        .add_enabled(has_background, egui::Button::new("Clear background"))
                        .clicked()
                    {
                        app.execute(Command::ClearBackground);
                        ui.close_menu();
                    }
                });

                ui.separator();
                ui.label("Path:");
                ui.add(
                    egui::TextEdit::singleline(app.path_input_mut())
                        .hint_text("image.png")
                        .desired_width(240.0),
                );

                if let Some(status) = app.status() {
                    ui.separator();
                    ui.label(status);
                }
            });
        });
}
