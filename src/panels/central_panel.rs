use crate::NotesApp;

pub fn central_panel(app: &mut NotesApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.label(&app.status);

        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::drag());
        let canvas_rect = response.rect;

        // Keep the backing buffer matched to the layout box. Resizing
        // reloads the last committed snapshot, so this is cheap to gate on
        // an actual change.
        let width = canvas_rect.width().max(1.0) as usize;
        let height = canvas_rect.height().max(1.0) as usize;
        if [width, height] != app.canvas.size() {
            app.canvas.resize(width, height);
        }

        app.translator.set_canvas_rect(canvas_rect);
        for event in app.translator.process_input(ctx) {
            app.apply_pointer_event(&event);
        }

        let texture_id = app.refresh_canvas_texture(ctx);
        painter.image(
            texture_id,
            canvas_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    });
}
