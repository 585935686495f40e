use crate::freehand;

/// Where live pressure comes from while a stroke is in progress.
///
/// Hardware pressure is preferred when the stylus reports it; surfaces
/// without it fall back to the geometric estimate, and a fixed source pins
/// the width for testing or accessibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressureSource {
    /// Use the pressure reported by the input device.
    Hardware,
    /// Estimate pressure from the distance travelled since the last point.
    Simulated,
    /// Report a constant pressure.
    Fixed(f32),
}

impl Default for PressureSource {
    fn default() -> Self {
        Self::Hardware
    }
}

impl PressureSource {
    /// Resolve the pressure for the next sample. `reported` is the value
    /// from the device, `travel` the distance since the previous point.
    /// `None` means "no opinion" and the caller keeps its base width.
    pub fn sample(&self, reported: Option<f32>, travel: Option<f32>) -> Option<f32> {
        match *self {
            Self::Hardware => reported.map(|p| p.clamp(0.0, 1.0)),
            Self::Simulated => travel.map(freehand::simulate_pressure),
            Self::Fixed(value) => Some(value.clamp(0.0, 1.0)),
        }
    }
}
