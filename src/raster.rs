use egui::{Color32, ColorImage, Pos2};

/// Dab spacing along a painted path, as a fraction of the dab radius.
const DAB_SPACING: f32 = 0.5;

/// A software RGBA pixel buffer that strokes are rasterized into.
///
/// Painting is done by stamping filled circles along the path, which gives
/// round caps and joins by construction. The buffer is sized explicitly and
/// never rescales its content; callers reallocate on layout changes.
pub struct RasterBuffer {
    image: ColorImage,
    background: Color32,
}

impl RasterBuffer {
    pub fn new(width: usize, height: usize, background: Color32) -> Self {
        Self {
            image: ColorImage::new([width.max(1), height.max(1)], background),
            background,
        }
    }

    pub fn size(&self) -> [usize; 2] {
        self.image.size
    }

    pub fn width(&self) -> usize {
        self.image.size[0]
    }

    pub fn height(&self) -> usize {
        self.image.size[1]
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn image(&self) -> &ColorImage {
        &self.image
    }

    /// Reset every pixel to the background color.
    pub fn clear(&mut self) {
        for pixel in &mut self.image.pixels {
            *pixel = self.background;
        }
    }

    /// Whether any pixel differs from the background. Scans the actual
    /// buffer; programmatic blits count just like strokes.
    pub fn has_content(&self) -> bool {
        self.image.pixels.iter().any(|pixel| *pixel != self.background)
    }

    /// Stamp a filled circle. Hard-edged on purpose: solid pixels survive a
    /// snapshot round trip exactly.
    pub fn fill_dot(&mut self, center: Pos2, radius: f32, color: Color32) {
        // A dot must cover at least one pixel center to be visible at all.
        let radius = radius.max(0.75);

        let width = self.width();
        let min_x = ((center.x - radius).floor() as i32).max(0);
        let max_x = ((center.x + radius).ceil() as i32).min(width as i32 - 1);
        let min_y = ((center.y - radius).floor() as i32).max(0);
        let max_y = ((center.y + radius).ceil() as i32).min(self.height() as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= radius * radius {
                    self.image.pixels[y as usize * width + x as usize] = color;
                }
            }
        }
    }

    /// Paint a straight segment as a run of dabs.
    pub fn stroke_segment(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        let radius = width / 2.0;
        let spacing = (radius * DAB_SPACING).max(0.5);
        let steps = ((from.distance(to) / spacing).ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.fill_dot(from.lerp(to, t), radius, color);
        }
    }

    /// Paint a quadratic curve from `from` through `control` to `to`,
    /// flattened into dabs. The control polygon length bounds the arc
    /// length, so the dab spacing stays dense enough.
    pub fn stroke_quadratic(&mut self, from: Pos2, control: Pos2, to: Pos2, width: f32, color: Color32) {
        let radius = width / 2.0;
        let spacing = (radius * DAB_SPACING).max(0.5);
        let estimated = from.distance(control) + control.distance(to);
        let steps = ((estimated / spacing).ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.fill_dot(quadratic_point(from, control, to, t), radius, color);
        }
    }

    /// Copy `source` into the top-left corner, clipping whatever does not
    /// fit. Pixels outside the copied region keep their current content.
    pub fn blit(&mut self, source: &ColorImage) {
        let dest_width = self.width();
        let copy_width = dest_width.min(source.size[0]);
        let copy_height = self.height().min(source.size[1]);
        for y in 0..copy_height {
            for x in 0..copy_width {
                self.image.pixels[y * dest_width + x] = source.pixels[y * source.size[0] + x];
            }
        }
    }
}

fn quadratic_point(from: Pos2, control: Pos2, to: Pos2, t: f32) -> Pos2 {
    from.lerp(control, t).lerp(control.lerp(to, t), t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> RasterBuffer {
        RasterBuffer::new(32, 32, Color32::WHITE)
    }

    #[test]
    fn fresh_buffer_is_blank() {
        assert!(!buffer().has_content());
    }

    #[test]
    fn dot_paints_and_clear_erases() {
        let mut buffer = buffer();
        buffer.fill_dot(Pos2::new(16.0, 16.0), 3.0, Color32::BLACK);
        assert!(buffer.has_content());
        assert_eq!(buffer.image().pixels[16 * 32 + 16], Color32::BLACK);

        buffer.clear();
        assert!(!buffer.has_content());
    }

    #[test]
    fn tiny_dot_still_marks_a_pixel() {
        let mut buffer = buffer();
        buffer.fill_dot(Pos2::new(10.2, 10.8), 0.1, Color32::BLACK);
        assert!(buffer.has_content());
    }

    #[test]
    fn dot_near_edge_does_not_panic() {
        let mut buffer = buffer();
        buffer.fill_dot(Pos2::new(-5.0, -5.0), 3.0, Color32::BLACK);
        buffer.fill_dot(Pos2::new(40.0, 40.0), 3.0, Color32::BLACK);
        assert!(!buffer.has_content());
    }

    #[test]
    fn segment_is_gap_free() {
        let mut buffer = buffer();
        buffer.stroke_segment(Pos2::new(2.0, 16.0), Pos2::new(30.0, 16.0), 4.0, Color32::BLACK);
        // Every column along the centerline is covered.
        for x in 2..30 {
            assert_eq!(
                buffer.image().pixels[16 * 32 + x],
                Color32::BLACK,
                "gap at column {x}"
            );
        }
    }

    #[test]
    fn blit_clips_oversized_source() {
        let mut buffer = RasterBuffer::new(8, 8, Color32::WHITE);
        let source = ColorImage::new([16, 16], Color32::BLACK);
        buffer.blit(&source);
        assert!(buffer.image().pixels.iter().all(|p| *p == Color32::BLACK));
    }
}
