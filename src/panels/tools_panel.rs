use crate::NotesApp;
use crate::canvas::Tool;
use crate::pressure::PressureSource;

pub fn tools_panel(app: &mut NotesApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            for (tool, label) in [(Tool::Pen, "Pen"), (Tool::Eraser, "Eraser")] {
                if ui.selectable_label(app.canvas.tool() == tool, label).clicked() {
                    log::info!("tool selected from UI: {label}");
                    app.canvas.set_tool(tool);
                    app.status = format!("{label} selected - use the pen on the canvas");
                }
            }

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Color:");
                let mut color = app.canvas.color();
                if egui::color_picker::color_edit_button_srgba(
                    ui,
                    &mut color,
                    egui::color_picker::Alpha::Opaque,
                )
                .changed()
                {
                    app.canvas.set_color(color);
                }
            });

            ui.horizontal(|ui| {
                ui.label("Brush:");
                let mut size = app.canvas.brush_size();
                if ui
                    .add(egui::Slider::new(&mut size, 1.0..=20.0).suffix("px"))
                    .changed()
                {
                    app.canvas.set_brush_size(size);
                }
            });

            // Spacing-based estimate for styli that report no pressure.
            let mut simulate = app.canvas.pressure_source() == PressureSource::Simulated;
            if ui.checkbox(&mut simulate, "Simulate pressure").changed() {
                app.canvas.set_pressure_source(if simulate {
                    PressureSource::Simulated
                } else {
                    PressureSource::Hardware
                });
            }

            ui.separator();

            if ui.button("Clear canvas").clicked() {
                app.canvas.clear();
                app.status = "Canvas cleared - ready for new notes".to_owned();
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                ui.separator();
                if ui.button("Export session").clicked() {
                    app.export_session();
                }
            }
        });
}
