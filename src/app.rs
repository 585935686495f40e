use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::{CanvasConfig, NoteCanvas};
use crate::input::{PointerDevice, PointerEvent, PointerPhase, PointerTranslator};
use crate::panels;
use crate::rubric::{self, Indicator};
use crate::store::NoteStore;

/// The observation note-taking application: one drawing canvas, the rubric
/// indicator list, and the note store they hand snapshots to.
pub struct NotesApp {
    pub(crate) canvas: NoteCanvas,
    pub(crate) store: Rc<RefCell<NoteStore>>,
    pub(crate) translator: PointerTranslator,
    pub(crate) selected_indicator: Option<&'static Indicator>,
    pub(crate) status: String,
    canvas_texture: Option<egui::TextureHandle>,
    uploaded_revision: Option<u64>,
}

impl NotesApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let store: NoteStore = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        let store = Rc::new(RefCell::new(store));

        // The canvas gets its save callback injected; it never reaches into
        // the store directly.
        let sink = Rc::clone(&store);
        let canvas = NoteCanvas::new(
            CanvasConfig::default(),
            Box::new(move |indicator_id, content, hint| {
                sink.borrow_mut().record_drawing(indicator_id, content, hint);
            }),
        );

        Self {
            canvas,
            store,
            translator: PointerTranslator::new(egui::Rect::NOTHING),
            selected_indicator: None,
            status: "Select an indicator, then draw with the pen".to_owned(),
            canvas_texture: None,
            uploaded_revision: None,
        }
    }

    /// Switch the canvas to another rubric indicator: flush the old one,
    /// then reload whatever the store has for the new one.
    pub(crate) fn select_indicator(&mut self, indicator: &'static Indicator) {
        let hint = self
            .store
            .borrow()
            .note(indicator.id)
            .and_then(|note| note.performance.clone());
        self.canvas
            .set_current_indicator(indicator.id, Some(indicator.title.to_owned()), hint);

        let drawing = self
            .store
            .borrow()
            .drawing(indicator.id)
            .map(|bytes| bytes.to_vec());
        if drawing.is_some() {
            self.canvas.load_snapshot(drawing.as_deref());
        }

        self.selected_indicator = Some(indicator);
        self.status = format!("Annotating {} {}", indicator.id, indicator.title);
    }

    /// Toggle a performance mark for an indicator and keep the canvas hint
    /// in sync so subsequent saves echo it.
    pub(crate) fn toggle_performance(&mut self, indicator: &'static Indicator, mark: &str) {
        let next = {
            let mut store = self.store.borrow_mut();
            let current = store
                .note(indicator.id)
                .and_then(|note| note.performance.clone());
            let next = if current.as_deref() == Some(mark) {
                None
            } else {
                Some(mark)
            };
            store.set_performance(indicator.id, next);
            next.map(str::to_owned)
        };

        if self.canvas.current_indicator() == Some(indicator.id) {
            self.canvas.set_performance_hint(next);
        }
    }

    pub(crate) fn apply_pointer_event(&mut self, event: &PointerEvent) {
        match (event.device, event.phase) {
            (PointerDevice::Pen, PointerPhase::Down) => {
                self.status = "Pen detected - drawing".to_owned();
            }
            (PointerDevice::Pen, PointerPhase::Up) => {
                self.status = "Pen ready - continue drawing".to_owned();
            }
            (PointerDevice::Touch | PointerDevice::Mouse, PointerPhase::Down) => {
                self.status = "Input ignored - use the pen to draw".to_owned();
            }
            _ => {}
        }
        self.canvas.handle_pointer_event(event);
    }

    /// Re-upload the canvas buffer as a texture when its revision moved.
    pub(crate) fn refresh_canvas_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        let revision = self.canvas.revision();
        let options = egui::TextureOptions::NEAREST;
        match &mut self.canvas_texture {
            Some(texture) => {
                if self.uploaded_revision != Some(revision) {
                    texture.set(self.canvas.image().clone(), options);
                    self.uploaded_revision = Some(revision);
                }
                texture.id()
            }
            None => {
                let texture = ctx.load_texture("note_canvas", self.canvas.image().clone(), options);
                self.uploaded_revision = Some(revision);
                let id = texture.id();
                self.canvas_texture = Some(texture);
                id
            }
        }
    }

    /// Flush the canvas and write the whole session next to the binary.
    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn export_session(&mut self) {
        self.canvas.save_snapshot();
        let store = self.store.borrow();
        let path = std::path::PathBuf::from(format!("observation-{}.json", store.session_id()));
        match store.export_to_file(&path) {
            Ok(()) => {
                self.status = format!("Session exported to {}", path.display());
            }
            Err(err) => {
                log::error!("session export failed: {err}");
                self.status = "Session export failed".to_owned();
            }
        }
    }
}

impl eframe::App for NotesApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &*self.store.borrow());
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::tools_panel(self, ctx);
        panels::indicators_panel(self, ctx);
        panels::central_panel(self, ctx);
    }
}

impl NotesApp {
    /// How many of the rubric's indicators carry notes so far.
    pub(crate) fn progress_label(&self) -> String {
        format!(
            "{}/{} indicators noted",
            self.store.borrow().noted_count(),
            rubric::INDICATORS.len()
        )
    }
}
