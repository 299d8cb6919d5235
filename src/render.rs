use crate::Color;
use image::RgbaImage;
use std::rc::Rc;

// ============================================================================
// GEOMETRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

/// One drawing operation. Angles are in degrees, 0° at 3 o'clock, clockwise.
#[derive(Clone, Debug)]
pub enum DrawCommand {
    Clear(Color),
    FillCircle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
    },
    StrokeArc {
        oval: RectF,
        start_angle: f32,
        sweep_angle: f32,
        stroke_width: f32,
        color: Color,
    },
    Bitmap {
        left: f32,
        top: f32,
        image: Rc<RgbaImage>,
    },
}

/// Ordered list of draw commands; later commands paint over earlier ones.
#[derive(Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn render(&self, canvas: &mut Canvas) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::FillCircle {
                    cx,
                    cy,
                    radius,
                    color,
                } => fill_circle(canvas, *cx, *cy, *radius, *color),
                DrawCommand::StrokeArc {
                    oval,
                    start_angle,
                    sweep_angle,
                    stroke_width,
                    color,
                } => stroke_arc(canvas, oval, *start_angle, *sweep_angle, *stroke_width, *color),
                DrawCommand::Bitmap { left, top, image } => {
                    draw_bitmap(canvas, *left, *top, image)
                }
            }
        }
    }
}

// ============================================================================
// CANVAS
// ============================================================================

/// RGBA8 frame buffer with a drawing origin.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    origin: (i32, i32),
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            origin: (0, 0),
        }
    }

    /// Offsets all subsequent drawing by `(x, y)` pixels.
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Reads back a pixel in frame coordinates (ignores the origin).
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Blends `color` at local coordinates with the given coverage.
    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        let alpha = coverage * color.opacity();
        if alpha <= 0.0 {
            return;
        }
        let (px, py) = (x + self.origin.0, y + self.origin.1);
        if px < 0 || py < 0 || px as usize >= self.width || py as usize >= self.height {
            return;
        }
        set_pixel(self.frame, self.width, px as usize, py as usize, color, alpha);
    }

    /// Local-space pixel bounds `(min_x, min_y, max_x, max_y)` of the frame.
    fn local_bounds(&self) -> (i32, i32, i32, i32) {
        (
            -self.origin.0,
            -self.origin.1,
            self.width as i32 - self.origin.0 - 1,
            self.height as i32 - self.origin.1 - 1,
        )
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, color: Color, alpha: f32) {
    let idx = (y * width + x) * 4;
    let Some(dst) = frame.get_mut(idx..idx + 4) else {
        return;
    };
    let a = alpha.clamp(0.0, 1.0);
    let src = [color.r as f32, color.g as f32, color.b as f32];
    for (channel, s) in dst.iter_mut().zip(src) {
        *channel = (s * a + *channel as f32 * (1.0 - a)).round() as u8;
    }
    dst[3] = 0xff;
}

fn fill_circle(canvas: &mut Canvas, cx: f32, cy: f32, radius: f32, color: Color) {
    if radius <= 0.0 || color.a == 0 {
        return;
    }
    let (min_x, min_y, max_x, max_y) = canvas.local_bounds();
    let x0 = ((cx - radius).floor() as i32 - 1).max(min_x);
    let x1 = ((cx + radius).ceil() as i32 + 1).min(max_x);
    let y0 = ((cy - radius).floor() as i32 - 1).max(min_y);
    let y1 = ((cy + radius).ceil() as i32 + 1).min(max_y);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
            if aa > 0.0 {
                canvas.blend(x, y, color, aa);
            }
        }
    }
}

/// Normalizes degrees into `[0, 360)`.
fn normalize_degrees(angle: f32) -> f32 {
    let a = angle % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// Whether `angle` lies on the clockwise arc starting at `start` spanning `sweep`.
fn in_sweep(angle: f32, start: f32, sweep: f32) -> bool {
    if sweep >= 360.0 {
        return true;
    }
    normalize_degrees(angle - start) <= sweep
}

fn stroke_arc(
    canvas: &mut Canvas,
    oval: &RectF,
    start_angle: f32,
    sweep_angle: f32,
    stroke_width: f32,
    color: Color,
) {
    // A negative sweep runs counter-clockwise from the start angle.
    let (start, sweep) = if sweep_angle < 0.0 {
        (start_angle + sweep_angle, -sweep_angle)
    } else {
        (start_angle, sweep_angle)
    };
    if sweep <= 0.0 || color.a == 0 {
        return;
    }

    let cx = oval.center_x();
    let cy = oval.center_y();
    let radius = (oval.width().min(oval.height()) / 2.0).max(0.0);
    // Zero-width strokes are drawn as hairlines.
    let half = (stroke_width / 2.0).max(0.5);
    let outer = radius + half;
    let inner = (radius - half).max(0.0);

    let (min_x, min_y, max_x, max_y) = canvas.local_bounds();
    let x0 = ((cx - outer).floor() as i32 - 1).max(min_x);
    let x1 = ((cx + outer).ceil() as i32 + 1).min(max_x);
    let y0 = ((cy - outer).floor() as i32 - 1).max(min_y);
    let y1 = ((cy + outer).ceil() as i32 + 1).min(max_y);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let aa = if dist > outer {
                1.0 - (dist - outer).min(1.0)
            } else if dist < inner {
                1.0 - (inner - dist).min(1.0)
            } else {
                1.0
            };
            if aa <= 0.0 {
                continue;
            }
            // Screen y grows downwards, so atan2 already measures clockwise.
            let angle = dy.atan2(dx).to_degrees();
            if in_sweep(angle, start, sweep) {
                canvas.blend(x, y, color, aa);
            }
        }
    }
}

fn draw_bitmap(canvas: &mut Canvas, left: f32, top: f32, image: &RgbaImage) {
    let left = left.round() as i32;
    let top = top.round() as i32;
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }
        canvas.blend(
            left + x as i32,
            top + y as i32,
            Color::rgba(r, g, b, a),
            1.0,
        );
    }
}
