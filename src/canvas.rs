use egui::{Color32, ColorImage, Pos2};

use crate::freehand;
use crate::input::{PointerDevice, PointerEvent, PointerPhase};
use crate::pressure::PressureSource;
use crate::raster::RasterBuffer;
use crate::snapshot;

/// The eraser paints wider than the pen so corrections do not need pixel
/// accuracy.
const ERASER_WIDTH_FACTOR: f32 = 3.0;

/// Capacity of the sliding window of recent stroke points. Three points are
/// enough for the quadratic smoother and keep latency low.
const STROKE_WINDOW_CAPACITY: usize = 3;

/// Invoked whenever the canvas flushes content: on pointer-up, on explicit
/// clear (`content = None`), and on indicator switch-out. Arguments are
/// `(indicator_id, content, performance_hint)`.
pub type SaveCallback = Box<dyn FnMut(&str, Option<&[u8]>, Option<&str>)>;

/// Paint tool selected in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Pen,
    Eraser,
}

/// The stroke state machine. Only a pointer from the accepted device may
/// open a stroke; once drawing, only the owning device is heard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrokeState {
    Idle,
    Drawing { device: PointerDevice },
}

#[derive(Debug, Clone, Copy)]
struct StrokePoint {
    pos: Pos2,
    pressure: Option<f32>,
}

#[derive(Debug, Clone)]
struct IndicatorBinding {
    id: String,
    performance_hint: Option<String>,
}

/// Construction parameters for a [`NoteCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
    pub background: Color32,
    /// The only device type allowed to open or continue a stroke.
    pub accepted_device: PointerDevice,
    pub brush_size: f32,
    pub color: Color32,
    /// Thinning factor applied when mapping live pressure to brush width.
    pub pressure_thinning: f32,
    pub pressure_source: PressureSource,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Color32::WHITE,
            accepted_device: PointerDevice::Pen,
            brush_size: 4.0,
            color: Color32::BLACK,
            pressure_thinning: 0.5,
            pressure_source: PressureSource::Hardware,
        }
    }
}

/// A drawing surface bound to one annotation area.
///
/// Owns tool and brush state, the pointer state machine, and a persistent
/// pixel buffer that strokes rasterize into immediately; there is no
/// retained vector history. Snapshots travel through the save callback
/// injected at construction, keyed by the bound rubric indicator.
pub struct NoteCanvas {
    buffer: RasterBuffer,
    state: StrokeState,
    window: Vec<StrokePoint>,
    tool: Tool,
    color: Color32,
    base_brush_size: f32,
    /// Pressure-modulated width for the current sample. Reset to the base
    /// size between strokes, never below the freehand width floor.
    effective_brush_size: f32,
    pressure_source: PressureSource,
    pressure_thinning: f32,
    accepted_device: PointerDevice,
    binding: Option<IndicatorBinding>,
    /// Last committed snapshot, reloaded when a resize destroys the buffer.
    committed_snapshot: Option<Vec<u8>>,
    on_save: SaveCallback,
    /// Bumped on every visible change; the UI re-uploads the texture when
    /// it observes a new revision.
    revision: u64,
}

impl std::fmt::Debug for NoteCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteCanvas")
            .field("size", &self.buffer.size())
            .field("state", &self.state)
            .field("tool", &self.tool)
            .field("indicator", &self.binding.as_ref().map(|b| b.id.as_str()))
            .field("revision", &self.revision)
            .finish()
    }
}

impl NoteCanvas {
    pub fn new(config: CanvasConfig, on_save: SaveCallback) -> Self {
        Self {
            buffer: RasterBuffer::new(config.width, config.height, config.background),
            state: StrokeState::Idle,
            window: Vec::with_capacity(STROKE_WINDOW_CAPACITY),
            tool: Tool::Pen,
            color: config.color,
            base_brush_size: config.brush_size,
            effective_brush_size: config.brush_size,
            pressure_source: config.pressure_source,
            pressure_thinning: config.pressure_thinning,
            accepted_device: config.accepted_device,
            binding: None,
            committed_snapshot: None,
            on_save,
            revision: 0,
        }
    }

    pub fn size(&self) -> [usize; 2] {
        self.buffer.size()
    }

    pub fn image(&self) -> &ColorImage {
        self.buffer.image()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn brush_size(&self) -> f32 {
        self.base_brush_size
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    pub fn current_indicator(&self) -> Option<&str> {
        self.binding.as_ref().map(|binding| binding.id.as_str())
    }

    /// Whether any non-background pixel exists. Scans the buffer itself, so
    /// programmatic loads count just like strokes.
    pub fn has_visible_content(&self) -> bool {
        self.buffer.has_content()
    }

    // Setters affect subsequent strokes only; rasterized content is final.

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.base_brush_size = size.max(freehand::MIN_STROKE_WIDTH);
        if !self.is_drawing() {
            self.effective_brush_size = self.base_brush_size;
        }
    }

    pub fn pressure_source(&self) -> PressureSource {
        self.pressure_source
    }

    pub fn set_pressure_source(&mut self, source: PressureSource) {
        self.pressure_source = source;
    }

    /// Keep the hint echoed through the save callback in sync with the
    /// external controller. No effect when no indicator is bound.
    pub fn set_performance_hint(&mut self, hint: Option<String>) {
        if let Some(binding) = &mut self.binding {
            binding.performance_hint = hint;
        }
    }

    /// Bind the canvas to a rubric indicator.
    ///
    /// Switching away from another indicator flushes its content through the
    /// save callback first, then clears the buffer; content from the old
    /// indicator never remains visible under the new one. Reloading stored
    /// content for the new indicator is the controller's job (via
    /// [`Self::load_snapshot`]), preserving strict flush-then-load order.
    pub fn set_current_indicator(
        &mut self,
        id: impl Into<String>,
        label: Option<String>,
        performance_hint: Option<String>,
    ) {
        let id = id.into();
        if let Some(binding) = &mut self.binding {
            if binding.id == id {
                binding.performance_hint = performance_hint;
                return;
            }
        }

        self.abort_stroke();
        if self.binding.is_some() {
            self.save_snapshot();
        }

        log::info!(
            "canvas bound to indicator {} ({})",
            id,
            label.as_deref().unwrap_or("unlabeled")
        );
        self.binding = Some(IndicatorBinding {
            id,
            performance_hint,
        });
        self.buffer.clear();
        self.committed_snapshot = None;
        self.revision += 1;
    }

    /// Replace the buffer content with a decoded snapshot; `None` clears to
    /// background. A corrupt snapshot is logged and falls back to a clear,
    /// so the buffer is never left half-painted.
    pub fn load_snapshot(&mut self, content: Option<&[u8]>) {
        self.abort_stroke();
        self.revision += 1;

        let Some(bytes) = content else {
            self.buffer.clear();
            self.committed_snapshot = None;
            return;
        };

        match snapshot::decode_png(bytes) {
            Ok(image) => {
                self.buffer.clear();
                self.buffer.blit(&image);
                self.committed_snapshot = Some(bytes.to_vec());
            }
            Err(err) => {
                log::warn!("discarding unreadable snapshot: {err}");
                self.buffer.clear();
                self.committed_snapshot = None;
            }
        }
    }

    /// Encode the buffer and hand it to the save callback. Skipped with a
    /// log line when no indicator is bound; persistence is the store's
    /// concern, this surface makes no durability guarantee.
    pub fn save_snapshot(&mut self) {
        let Some((id, hint)) = self.binding_parts() else {
            log::debug!("no indicator bound, skipping snapshot save");
            return;
        };

        match snapshot::encode_png(self.buffer.image()) {
            Ok(bytes) => {
                (self.on_save)(&id, Some(&bytes), hint.as_deref());
                self.committed_snapshot = Some(bytes);
            }
            Err(err) => {
                log::error!("snapshot encode failed for indicator {id}: {err}");
            }
        }
    }

    /// Reset the buffer to background. An explicit clear is persisted, not
    /// just visual: the save callback fires once with a `None` payload.
    pub fn clear(&mut self) {
        self.abort_stroke();
        self.buffer.clear();
        self.committed_snapshot = None;
        self.revision += 1;

        let Some((id, hint)) = self.binding_parts() else {
            return;
        };
        (self.on_save)(&id, None, hint.as_deref());
    }

    /// Resize the backing buffer to a new layout box.
    ///
    /// Reallocation destroys raster content, so the last committed snapshot
    /// is reloaded afterwards (clipped if the box shrank); with no snapshot
    /// the buffer comes up blank. A stroke in progress is aborted without a
    /// save, since the geometry it was painted against no longer exists.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.abort_stroke();
        self.buffer = RasterBuffer::new(width, height, self.buffer.background());
        self.revision += 1;

        if let Some(bytes) = self.committed_snapshot.take() {
            match snapshot::decode_png(&bytes) {
                Ok(image) => {
                    self.buffer.blit(&image);
                    self.committed_snapshot = Some(bytes);
                }
                Err(err) => {
                    log::warn!("could not restore snapshot after resize: {err}");
                }
            }
        }
    }

    /// Feed one pointer event through the state machine. Events from
    /// non-accepted devices are policy-filtered, not errors: nothing is
    /// painted and no signal is raised.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match (self.state, event.phase) {
            (StrokeState::Idle, PointerPhase::Down)
                if event.device == self.accepted_device =>
            {
                self.begin_stroke(event);
            }
            (StrokeState::Drawing { device }, PointerPhase::Move)
                if event.device == device =>
            {
                self.extend_stroke(event);
            }
            (
                StrokeState::Drawing { device },
                PointerPhase::Up | PointerPhase::Cancel | PointerPhase::Leave,
            ) if event.device == device => {
                self.finish_stroke();
            }
            _ => {}
        }
    }

    fn begin_stroke(&mut self, event: &PointerEvent) {
        self.window.clear();
        self.window.push(StrokePoint {
            pos: event.pos,
            pressure: event.pressure,
        });
        self.update_effective_size(event.pressure, None);

        // An initial dot so taps leave a mark.
        let (color, width) = self.paint_style();
        self.buffer.fill_dot(event.pos, width / 2.0, color);

        self.state = StrokeState::Drawing {
            device: event.device,
        };
        self.revision += 1;
    }

    fn extend_stroke(&mut self, event: &PointerEvent) {
        let travel = self.window.last().map(|point| point.pos.distance(event.pos));
        self.window.push(StrokePoint {
            pos: event.pos,
            pressure: event.pressure,
        });
        if self.window.len() > STROKE_WINDOW_CAPACITY {
            self.window.remove(0);
        }

        self.update_effective_size(event.pressure, travel);
        self.paint_window();
        self.revision += 1;
    }

    fn finish_stroke(&mut self) {
        self.state = StrokeState::Idle;
        self.window.clear();
        self.effective_brush_size = self.base_brush_size;
        self.save_snapshot();
    }

    /// Drop an in-progress stroke without committing it. Whatever was
    /// already rasterized stays; the state machine returns to idle.
    fn abort_stroke(&mut self) {
        if self.is_drawing() {
            self.state = StrokeState::Idle;
            self.window.clear();
            self.effective_brush_size = self.base_brush_size;
        }
    }

    fn update_effective_size(&mut self, reported: Option<f32>, travel: Option<f32>) {
        if let Some(pressure) = self.pressure_source.sample(reported, travel) {
            self.effective_brush_size = freehand::pressure_to_width(
                self.base_brush_size,
                self.pressure_thinning,
                pressure,
            );
        }
    }

    fn paint_style(&self) -> (Color32, f32) {
        match self.tool {
            Tool::Pen => (self.color, self.effective_brush_size),
            Tool::Eraser => (
                self.buffer.background(),
                self.effective_brush_size * ERASER_WIDTH_FACTOR,
            ),
        }
    }

    /// Paint the newest piece of the stroke from the sliding window: a
    /// straight segment for two points, a quadratic through the middle
    /// point ending at the midpoint of the trailing pair for three.
    fn paint_window(&mut self) {
        let (color, width) = self.paint_style();
        match *self.window.as_slice() {
            [a, b] => {
                self.buffer.stroke_segment(a.pos, b.pos, width, color);
            }
            [a, b, c] => {
                let end = b.pos.lerp(c.pos, 0.5);
                self.buffer.stroke_quadratic(a.pos, b.pos, end, width, color);
            }
            _ => {}
        }
    }

    fn binding_parts(&self) -> Option<(String, Option<String>)> {
        self.binding
            .as_ref()
            .map(|binding| (binding.id.clone(), binding.performance_hint.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type SaveLog = Rc<RefCell<Vec<(String, Option<Vec<u8>>, Option<String>)>>>;

    fn test_canvas(width: usize, height: usize) -> (NoteCanvas, SaveLog) {
        let log: SaveLog = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let canvas = NoteCanvas::new(
            CanvasConfig {
                width,
                height,
                ..Default::default()
            },
            Box::new(move |id, content, hint| {
                sink.borrow_mut().push((
                    id.to_owned(),
                    content.map(|bytes| bytes.to_vec()),
                    hint.map(str::to_owned),
                ));
            }),
        );
        (canvas, log)
    }

    fn pen(phase: PointerPhase, x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(PointerDevice::Pen, phase, Pos2::new(x, y))
    }

    #[test]
    fn stroke_window_never_exceeds_capacity() {
        let (mut canvas, _log) = test_canvas(64, 64);
        canvas.handle_pointer_event(&pen(PointerPhase::Down, 5.0, 5.0));
        for i in 0..50 {
            canvas.handle_pointer_event(&pen(PointerPhase::Move, 5.0 + i as f32, 5.0));
            assert!(canvas.window.len() <= STROKE_WINDOW_CAPACITY);
        }
    }

    #[test]
    fn foreign_device_events_do_not_close_a_pen_stroke() {
        let (mut canvas, _log) = test_canvas(64, 64);
        canvas.handle_pointer_event(&pen(PointerPhase::Down, 5.0, 5.0));
        assert!(canvas.is_drawing());

        // A finger lifting mid-stroke is ignored entirely.
        canvas.handle_pointer_event(&PointerEvent::new(
            PointerDevice::Touch,
            PointerPhase::Up,
            Pos2::new(5.0, 5.0),
        ));
        assert!(canvas.is_drawing());

        canvas.handle_pointer_event(&pen(PointerPhase::Up, 6.0, 5.0));
        assert!(!canvas.is_drawing());
    }

    #[test]
    fn eraser_paints_background_over_strokes() {
        let (mut canvas, _log) = test_canvas(64, 64);
        canvas.set_brush_size(6.0);
        canvas.handle_pointer_event(&pen(PointerPhase::Down, 20.0, 20.0));
        canvas.handle_pointer_event(&pen(PointerPhase::Move, 40.0, 20.0));
        canvas.handle_pointer_event(&pen(PointerPhase::Up, 40.0, 20.0));
        assert!(canvas.has_visible_content());

        canvas.set_tool(Tool::Eraser);
        canvas.handle_pointer_event(&pen(PointerPhase::Down, 10.0, 20.0));
        canvas.handle_pointer_event(&pen(PointerPhase::Move, 50.0, 20.0));
        canvas.handle_pointer_event(&pen(PointerPhase::Up, 50.0, 20.0));
        assert!(!canvas.has_visible_content());
    }

    #[test]
    fn cancel_behaves_like_pointer_up() {
        let (mut canvas, log) = test_canvas(64, 64);
        canvas.set_current_indicator("2.2", None, None);
        canvas.handle_pointer_event(&pen(PointerPhase::Down, 5.0, 5.0));
        canvas.handle_pointer_event(&pen(PointerPhase::Move, 15.0, 5.0));
        canvas.handle_pointer_event(&pen(PointerPhase::Cancel, 15.0, 5.0));

        assert!(!canvas.is_drawing());
        assert_eq!(log.borrow().len(), 1);
        assert!(log.borrow()[0].1.is_some());
    }

    #[test]
    fn rebinding_same_indicator_only_updates_hint() {
        let (mut canvas, log) = test_canvas(64, 64);
        canvas.set_current_indicator("4.1", None, None);
        canvas.set_current_indicator("4.1", None, Some("good".to_owned()));
        // No flush: the indicator never changed.
        assert!(log.borrow().is_empty());

        canvas.handle_pointer_event(&pen(PointerPhase::Down, 5.0, 5.0));
        canvas.handle_pointer_event(&pen(PointerPhase::Up, 5.0, 5.0));
        assert_eq!(log.borrow()[0].2.as_deref(), Some("good"));
    }

    #[test]
    fn fixed_pressure_drives_effective_width() {
        let (mut canvas, _log) = test_canvas(64, 64);
        canvas.set_brush_size(8.0);
        canvas.set_pressure_source(PressureSource::Fixed(0.0));

        canvas.handle_pointer_event(&pen(PointerPhase::Down, 32.0, 32.0));
        // Zero pressure at the default thinning halves the width.
        assert_eq!(canvas.effective_brush_size, 4.0);

        canvas.handle_pointer_event(&pen(PointerPhase::Up, 32.0, 32.0));
        assert_eq!(canvas.effective_brush_size, 8.0);
    }

    #[test]
    fn resize_mid_stroke_aborts_without_saving() {
        let (mut canvas, log) = test_canvas(64, 64);
        canvas.set_current_indicator("1.2", None, None);
        canvas.handle_pointer_event(&pen(PointerPhase::Down, 5.0, 5.0));
        canvas.handle_pointer_event(&pen(PointerPhase::Move, 15.0, 5.0));

        canvas.resize(128, 128);
        assert!(!canvas.is_drawing());
        assert!(log.borrow().is_empty());

        // A pointer-up arriving after the abort is a no-op.
        canvas.handle_pointer_event(&pen(PointerPhase::Up, 15.0, 5.0));
        assert!(log.borrow().is_empty());
    }
}
