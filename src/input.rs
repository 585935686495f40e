use egui::{Context, Pos2, Rect};

/// The kind of device behind a pointer event. Only the pen may draw; the
/// surface filters the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDevice {
    Pen,
    Touch,
    Mouse,
}

/// Lifecycle phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
    Leave,
}

/// A pointer event in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub device: PointerDevice,
    pub phase: PointerPhase,
    pub pos: Pos2,
    /// Device-reported pressure in `[0, 1]`, if available.
    pub pressure: Option<f32>,
}

impl PointerEvent {
    pub fn new(device: PointerDevice, phase: PointerPhase, pos: Pos2) -> Self {
        Self {
            device,
            phase,
            pos,
            pressure: None,
        }
    }

    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }
}

/// Converts raw egui input into domain pointer events.
///
/// Touch events carrying a force reading are treated as stylus input;
/// forceless touches are fingers. Mouse buttons map to a mouse device. A
/// pointer that exits the canvas rect (or the window) while it owns a
/// gesture produces a synthetic `Leave`.
pub struct PointerTranslator {
    canvas_rect: Rect,
    /// Device of the gesture currently in flight, if any.
    active_device: Option<PointerDevice>,
}

impl PointerTranslator {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            active_device: None,
        }
    }

    /// Update the canvas rectangle (e.g. after a layout change).
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    fn to_local(&self, pos: Pos2) -> Pos2 {
        pos - self.canvas_rect.min.to_vec2()
    }

    /// Process raw egui input and generate domain events.
    pub fn process_input(&mut self, ctx: &Context) -> Vec<PointerEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            for event in &input.raw.events {
                match event {
                    egui::Event::Touch {
                        pos, force, phase, ..
                    } => {
                        let device = if force.is_some() {
                            PointerDevice::Pen
                        } else {
                            PointerDevice::Touch
                        };
                        self.translate_touch(device, *phase, *pos, *force, &mut events);
                    }
                    egui::Event::PointerButton {
                        pos,
                        button: egui::PointerButton::Primary,
                        pressed,
                        ..
                    } => {
                        if *pressed {
                            if self.canvas_rect.contains(*pos) && self.active_device.is_none() {
                                self.active_device = Some(PointerDevice::Mouse);
                                events.push(PointerEvent::new(
                                    PointerDevice::Mouse,
                                    PointerPhase::Down,
                                    self.to_local(*pos),
                                ));
                            }
                        } else if self.active_device == Some(PointerDevice::Mouse) {
                            self.active_device = None;
                            events.push(PointerEvent::new(
                                PointerDevice::Mouse,
                                PointerPhase::Up,
                                self.to_local(*pos),
                            ));
                        }
                    }
                    egui::Event::PointerMoved(pos) => {
                        if self.active_device == Some(PointerDevice::Mouse) {
                            self.push_move(PointerDevice::Mouse, *pos, None, &mut events);
                        }
                    }
                    egui::Event::PointerGone => {
                        if let Some(device) = self.active_device.take() {
                            events.push(PointerEvent::new(device, PointerPhase::Leave, Pos2::ZERO));
                        }
                    }
                    _ => {}
                }
            }
        });

        events
    }

    fn translate_touch(
        &mut self,
        device: PointerDevice,
        phase: egui::TouchPhase,
        pos: Pos2,
        force: Option<f32>,
        events: &mut Vec<PointerEvent>,
    ) {
        match phase {
            egui::TouchPhase::Start => {
                if self.canvas_rect.contains(pos) && self.active_device.is_none() {
                    self.active_device = Some(device);
                    let mut event =
                        PointerEvent::new(device, PointerPhase::Down, self.to_local(pos));
                    if let Some(force) = force {
                        event = event.with_pressure(force);
                    }
                    events.push(event);
                }
            }
            egui::TouchPhase::Move => {
                if self.active_device == Some(device) {
                    self.push_move(device, pos, force, events);
                }
            }
            egui::TouchPhase::End => {
                if self.active_device == Some(device) {
                    self.active_device = None;
                    events.push(PointerEvent::new(device, PointerPhase::Up, self.to_local(pos)));
                }
            }
            egui::TouchPhase::Cancel => {
                if self.active_device == Some(device) {
                    self.active_device = None;
                    events.push(PointerEvent::new(
                        device,
                        PointerPhase::Cancel,
                        self.to_local(pos),
                    ));
                }
            }
        }
    }

    /// Moves inside the rect continue the gesture; a move that escapes the
    /// rect ends it with a `Leave`.
    fn push_move(
        &mut self,
        device: PointerDevice,
        pos: Pos2,
        force: Option<f32>,
        events: &mut Vec<PointerEvent>,
    ) {
        if self.canvas_rect.contains(pos) {
            let mut event = PointerEvent::new(device, PointerPhase::Move, self.to_local(pos));
            if let Some(force) = force {
                event = event.with_pressure(force);
            }
            events.push(event);
        } else {
            self.active_device = None;
            events.push(PointerEvent::new(
                device,
                PointerPhase::Leave,
                self.to_local(pos),
            ));
        }
    }
}
