use crate::NotesApp;
use crate::rubric;

pub fn indicators_panel(app: &mut NotesApp, ctx: &egui::Context) {
    egui::SidePanel::right("indicators_panel")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading("Indicators");
            ui.label(app.progress_label());
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                let mut clicked = None;

                for area in rubric::areas() {
                    ui.strong(area);
                    for indicator in rubric::in_area(area) {
                        let has_note = app
                            .store
                            .borrow()
                            .note(indicator.id)
                            .is_some_and(|note| note.has_content());
                        let selected =
                            app.selected_indicator.map(|sel| sel.id) == Some(indicator.id);
                        let marker = if has_note { " ✓" } else { "" };
                        let label = format!("{} {}{marker}", indicator.id, indicator.title);
                        if ui.selectable_label(selected, label).clicked() {
                            clicked = Some(indicator);
                        }
                    }
                    ui.add_space(6.0);
                }

                if let Some(indicator) = clicked {
                    app.select_indicator(indicator);
                }

                if let Some(indicator) = app.selected_indicator {
                    ui.separator();
                    ui.strong(format!("{} {}", indicator.id, indicator.title));
                    ui.label(indicator.explanation);

                    let current = app
                        .store
                        .borrow()
                        .note(indicator.id)
                        .and_then(|note| note.performance.clone());
                    ui.horizontal(|ui| {
                        if ui
                            .selectable_label(current.as_deref() == Some("good"), "Good")
                            .clicked()
                        {
                            app.toggle_performance(indicator, "good");
                        }
                        if ui
                            .selectable_label(current.as_deref() == Some("growth"), "Growth")
                            .clicked()
                        {
                            app.toggle_performance(indicator, "growth");
                        }
                    });

                    if ui.button("Add quick comment").clicked() {
                        app.store
                            .borrow_mut()
                            .set_auto_comment(indicator.id, indicator.auto_comment);
                        app.status = "Comment added".to_owned();
                    }
                }
            });
        });
}
