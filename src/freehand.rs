use egui::Pos2;

/// Widths produced by this module never drop below this value, regardless of
/// pressure or thinning input.
pub const MIN_STROKE_WIDTH: f32 = 0.5;

/// Simulated pressure is clamped to this floor so sparse input never makes a
/// stroke vanish.
const MIN_SIMULATED_PRESSURE: f32 = 0.25;

/// Distance (in surface units) over which simulated pressure falls from full
/// to the floor. Slow, tightly spaced points read as firm pressure.
const PRESSURE_FALLOFF_DISTANCE: f32 = 10.0;

/// Upper bound on the interpolation parameter step between two input points.
const MAX_INTERPOLATION_STEP: f32 = 0.5;

/// Fraction by which `streamline = 1.0` pulls a point toward its predecessor.
const STREAMLINE_PULL: f32 = 0.15;

/// Pressure assumed when nothing better is known (endpoints, simulation off).
const NEUTRAL_PRESSURE: f32 = 0.5;

/// A raw point captured from the input device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputPoint {
    pub pos: Pos2,
    /// Device-reported pressure in `[0, 1]`, if the device provides one.
    pub pressure: Option<f32>,
}

impl InputPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Pos2::new(x, y),
            pressure: None,
        }
    }

    pub fn with_pressure(x: f32, y: f32, pressure: f32) -> Self {
        Self {
            pos: Pos2::new(x, y),
            pressure: Some(pressure),
        }
    }
}

/// Options controlling outline generation. Defaults match the classic
/// freehand parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeOptions {
    /// Base stroke diameter at full pressure.
    pub size: f32,
    /// How strongly low pressure narrows the stroke, 0..1.
    pub thinning: f32,
    /// Strength of the corner-rounding pass, 0..1.
    pub smoothing: f32,
    /// How aggressively points are pulled toward a smoothed path, 0..1.
    pub streamline: f32,
    /// Estimate pressure from point spacing when the device reports none.
    pub simulate_pressure: bool,
    /// Whether the stroke is finished; appends a terminating cap sample.
    pub last: bool,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            size: 16.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
            simulate_pressure: true,
            last: false,
        }
    }
}

/// A sample on the generated stroke outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlinePoint {
    pub pos: Pos2,
    pub pressure: f32,
    /// Paint width at this sample, already floored to [`MIN_STROKE_WIDTH`].
    pub width: f32,
}

/// Convert a sequence of input points into a renderable outline.
///
/// Pure and deterministic: no shared state, safe to call from any number of
/// surfaces at once. Fewer than two points yield an empty outline; a single
/// dot is the caller's job.
pub fn compute_stroke(points: &[InputPoint], options: &StrokeOptions) -> Vec<OutlinePoint> {
    if points.len() < 2 {
        return Vec::new();
    }

    let resolved = resolve_pressures(points, options.simulate_pressure);
    let path = streamline_path(&resolved, options.streamline);

    let mut outline: Vec<OutlinePoint> = Vec::new();
    for pair in path.windows(2) {
        let (from, from_pressure) = pair[0];
        let (to, to_pressure) = pair[1];

        let distance = from.distance(to);
        // Long jumps get denser sampling.
        let step = MAX_INTERPOLATION_STEP.min(1.0 / (distance + 1.0));

        let mut t = 0.0;
        while t < 1.0 {
            let pos = from.lerp(to, t);
            let pressure = from_pressure + (to_pressure - from_pressure) * t;
            let width = pressure_to_width(options.size, options.thinning, pressure);

            // Skip samples that land inside the previous sample's footprint.
            if let Some(last) = outline.last() {
                if last.pos.distance(pos) < width / 4.0 {
                    t += step;
                    continue;
                }
            }

            outline.push(OutlinePoint {
                pos,
                pressure,
                width,
            });
            t += step;
        }
    }

    if options.last {
        // Terminate exactly at the true final input point so finished
        // strokes get a clean cap.
        let (pos, pressure) = resolved[resolved.len() - 1];
        outline.push(OutlinePoint {
            pos,
            pressure,
            width: pressure_to_width(options.size, options.thinning, pressure),
        });
    }

    if outline.len() >= 3 {
        smooth_outline(&mut outline, options.smoothing);
    }
    outline
}

/// Render an outline as SVG-style path data (`M x y L x y ...`), for vector
/// export and debugging.
pub fn stroke_to_path_data(outline: &[OutlinePoint]) -> String {
    use std::fmt::Write as _;

    let mut data = String::new();
    for (i, point) in outline.iter().enumerate() {
        if i > 0 {
            data.push(' ');
        }
        let op = if i == 0 { 'M' } else { 'L' };
        let _ = write!(data, "{} {} {}", op, point.pos.x, point.pos.y);
    }
    data
}

/// Map pressure to a paint width: `size * (1 - thinning * (1 - pressure))`,
/// floored so strokes never vanish.
pub fn pressure_to_width(size: f32, thinning: f32, pressure: f32) -> f32 {
    (size * (1.0 - thinning * (1.0 - pressure))).max(MIN_STROKE_WIDTH)
}

/// Spacing-based pressure estimate: tight spacing reads as firm pressure,
/// long jumps as a light touch. Always within `[0.25, 1.0]`.
pub fn simulate_pressure(distance: f32) -> f32 {
    (1.0 - distance / PRESSURE_FALLOFF_DISTANCE).clamp(MIN_SIMULATED_PRESSURE, 1.0)
}

fn resolve_pressures(points: &[InputPoint], simulate: bool) -> Vec<(Pos2, f32)> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let pressure = point.pressure.unwrap_or_else(|| {
                if simulate && i > 0 && i + 1 < points.len() {
                    simulate_pressure(points[i - 1].pos.distance(points[i + 1].pos))
                } else {
                    NEUTRAL_PRESSURE
                }
            });
            (point.pos, pressure.clamp(0.0, 1.0))
        })
        .collect()
}

/// Pull each point toward its predecessor by the streamline factor. The
/// first point is kept exact.
fn streamline_path(resolved: &[(Pos2, f32)], streamline: f32) -> Vec<(Pos2, f32)> {
    let keep = 1.0 - STREAMLINE_PULL * streamline.clamp(0.0, 1.0);
    let mut path = Vec::with_capacity(resolved.len());
    path.push(resolved[0]);
    let mut prev = resolved[0].0;
    for &(pos, pressure) in &resolved[1..] {
        let pulled = prev.lerp(pos, keep);
        path.push((pulled, pressure));
        prev = pulled;
    }
    path
}

/// One pass of three-point moving-average smoothing, blended by `smoothing`.
/// The first and last samples are preserved exactly.
fn smooth_outline(outline: &mut [OutlinePoint], smoothing: f32) {
    let smoothing = smoothing.clamp(0.0, 1.0);
    if smoothing <= 0.0 {
        return;
    }

    let source: Vec<Pos2> = outline.iter().map(|p| p.pos).collect();
    for i in 1..source.len() - 1 {
        let average = Pos2::new(
            (source[i - 1].x + source[i].x + source[i + 1].x) / 3.0,
            (source[i - 1].y + source[i].y + source[i + 1].y) / 3.0,
        );
        outline[i].pos = source[i].lerp(average, smoothing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_pressure_stays_in_bounds() {
        for distance in [0.0, 0.1, 1.0, 5.0, 10.0, 50.0, 1000.0] {
            let pressure = simulate_pressure(distance);
            assert!((MIN_SIMULATED_PRESSURE..=1.0).contains(&pressure));
        }
    }

    #[test]
    fn tight_spacing_means_firm_pressure() {
        assert!(simulate_pressure(0.5) > simulate_pressure(8.0));
    }

    #[test]
    fn width_never_collapses() {
        // Exhaustive-ish sweep over the parameter space.
        for thinning_step in 0..=10 {
            for pressure_step in 0..=20 {
                let thinning = thinning_step as f32 / 10.0;
                let pressure = pressure_step as f32 / 20.0;
                for size in [0.01, 1.0, 16.0] {
                    let width = pressure_to_width(size, thinning, pressure);
                    assert!(width >= MIN_STROKE_WIDTH, "width {width} too small");
                }
            }
        }
    }

    #[test]
    fn streamline_keeps_first_point() {
        let resolved = vec![
            (Pos2::new(3.0, 4.0), 0.5),
            (Pos2::new(10.0, 4.0), 0.5),
        ];
        let path = streamline_path(&resolved, 1.0);
        assert_eq!(path[0].0, Pos2::new(3.0, 4.0));
        assert!(path[1].0.x < 10.0);
    }
}
