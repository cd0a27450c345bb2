use crate::PaintApp;
use crate::app::PointerFrame;
use crate::compositor;
use crate::tools::Tool;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;
            app.set_canvas_rect(canvas_rect);

            // Handle input
            let frame = ctx.input(|i| PointerFrame {
                pos: i.pointer.latest_pos(),
                on_canvas: response.contains_pointer(),
                pressed: i.pointer.primary_pressed(),
                down: i.pointer.primary_down(),
                released: i.pointer.primary_released(),
            });
            app.handle_pointer(frame);

            // Render the canvas
            let (context, background, tool) = app.canvas_parts(ctx);
            compositor::paint_background(&painter, canvas_rect, background);
            compositor::paint_strokes(&painter, context.document.strokes());

            // Shape previews keep following the drag off the canvas
            if let Some(pointer) = frame.pos {
                tool.preview(&painter, pointer);
            }

            if frame.down || response.hovered() {
                ctx.request_repaint();
            }
        });
}
