use crate::animation::{Repeat, ValueAnimator};
use crate::config::{LogoSource, WidgetConfig};
use crate::lifecycle::{Lifecycle, LifecycleEvent, LifecycleObserver};
use crate::render::{DrawCommand, RectF, Scene};
use crate::Color;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

// ============================================================================
// PUBLIC TYPES
// ============================================================================

/// Which value the live animation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationMode {
    /// Spins the arc by rotating its start angle, forever.
    Loop,
    /// Grows the arc's sweep to the target fraction once.
    OneShot,
}

/// Commands a host can forward to the widget, e.g. from a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetCommand {
    SetProgress(f32),
    SetAnimating(bool),
    StartLoop,
    StartProgress,
    Cancel,
}

/// Geometry and animated values read by [`CircularProgressWidget::draw`].
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub center_x: f32,
    pub center_y: f32,
    pub bounding_rect: RectF,
    pub scaled_logo: Option<Rc<RgbaImage>>,
    pub progress_fraction: f32,
    pub sweep_angle_degrees: f32,
    pub start_angle_degrees: f32,
    pub is_animating: bool,
}

#[derive(Debug)]
struct ActiveAnimation {
    mode: AnimationMode,
    target: f32,
    driver: ValueAnimator,
}

// ============================================================================
// WIDGET
// ============================================================================

/// Circular progress / loading indicator.
///
/// Layers, bottom to top: inner disc, background ring, progress arc, logo.
#[derive(Debug)]
pub struct CircularProgressWidget {
    ring_width: f32,
    inner_circle_color: Color,
    ring_background_color: Color,
    progress_ring_color: Color,
    logo: Option<Rc<RgbaImage>>,
    logo_margin_border: f32,
    auto_rotate: bool,
    animation_duration: Duration,

    size: Option<u32>,
    state: RenderState,
    animation: Option<ActiveAnimation>,
    redraw_requested: bool,
}

fn clamp_fraction(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

fn resolve_logo(source: Option<&LogoSource>) -> Option<Rc<RgbaImage>> {
    match source?.resolve() {
        Ok(image) => Some(Rc::new(image)),
        Err(err) => {
            log::warn!("logo unavailable, drawing without it: {err}");
            None
        }
    }
}

impl CircularProgressWidget {
    pub fn new(config: WidgetConfig) -> Self {
        let progress = clamp_fraction(config.initial_progress_fraction);
        let state = RenderState {
            progress_fraction: progress,
            sweep_angle_degrees: progress * 360.0,
            start_angle_degrees: config.progress_start_angle_degrees,
            is_animating: config.animating_initially,
            ..RenderState::default()
        };

        Self {
            ring_width: non_negative(config.ring_width),
            inner_circle_color: config.inner_circle_color,
            ring_background_color: config.ring_background_color,
            progress_ring_color: config.progress_ring_color,
            logo: resolve_logo(config.logo.as_ref()),
            logo_margin_border: non_negative(config.logo_margin_border),
            auto_rotate: config.auto_rotate,
            animation_duration: config.animation_duration,
            size: None,
            state,
            animation: None,
            redraw_requested: true,
        }
    }

    /// Creates a shared widget and subscribes it to `lifecycle`.
    ///
    /// The notifier only keeps a weak reference to the widget.
    pub fn new_observed(config: WidgetConfig, lifecycle: &mut Lifecycle) -> Rc<RefCell<Self>> {
        let widget = Rc::new(RefCell::new(Self::new(config)));
        lifecycle.observe(&widget);
        widget
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn ring_width(&self) -> f32 {
        self.ring_width
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// The square side picked by the last layout pass.
    pub fn measured_size(&self) -> Option<u32> {
        self.size
    }

    pub fn animation_mode(&self) -> Option<AnimationMode> {
        self.animation.as_ref().map(|a| a.mode)
    }

    pub fn is_animation_running(&self) -> bool {
        self.animation.is_some()
    }

    /// Returns whether a redraw was requested since the last call.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn invalidate(&mut self) {
        self.redraw_requested = true;
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    /// The widget is always square: the smaller proposed side wins.
    pub fn measure(proposed_width: u32, proposed_height: u32) -> u32 {
        proposed_width.min(proposed_height)
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        let size = Self::measure(width, height);
        let size_changed = self.size != Some(size);
        self.size = Some(size);
        log::debug!("resize {width}x{height} -> {size}x{size}");

        self.update_geometry(size);
        if size_changed {
            self.rescale_logo(size);
        }
        self.invalidate();
    }

    fn update_geometry(&mut self, size: u32) {
        let side = size as f32;
        self.state.center_x = side / 2.0;
        self.state.center_y = side / 2.0;
        let inset = self.ring_width / 2.0;
        self.state.bounding_rect = RectF::new(inset, inset, side - inset, side - inset);
    }

    fn rescale_logo(&mut self, size: u32) {
        self.state.scaled_logo = self.logo.as_ref().and_then(|logo| {
            let target = (size as f32 - self.logo_margin_border).floor();
            if target < 1.0 {
                return None;
            }
            let side = target as u32;
            Some(Rc::new(imageops::resize(
                &**logo,
                side,
                side,
                FilterType::Triangle,
            )))
        });
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Appends the widget's four layers to `scene` in paint order.
    pub fn draw(&self, scene: &mut Scene) {
        let state = &self.state;

        // The +1 closes the hairline seam against the ring's inner edge.
        scene.add_command(DrawCommand::FillCircle {
            cx: state.center_x,
            cy: state.center_y,
            radius: (state.center_x - self.ring_width + 1.0).max(0.0),
            color: self.inner_circle_color,
        });
        scene.add_command(DrawCommand::StrokeArc {
            oval: state.bounding_rect,
            start_angle: 0.0,
            sweep_angle: 360.0,
            stroke_width: self.ring_width,
            color: self.ring_background_color,
        });
        scene.add_command(DrawCommand::StrokeArc {
            oval: state.bounding_rect,
            start_angle: state.start_angle_degrees,
            sweep_angle: state.sweep_angle_degrees,
            stroke_width: self.ring_width,
            color: self.progress_ring_color,
        });
        if let Some(logo) = &state.scaled_logo {
            scene.add_command(DrawCommand::Bitmap {
                left: state.center_x - logo.width() as f32 / 2.0,
                top: state.center_y - logo.height() as f32 / 2.0,
                image: Rc::clone(logo),
            });
        }
    }

    // ------------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------------

    fn start_animation(&mut self, mode: AnimationMode) {
        self.cancel_animation();

        let target = self.state.progress_fraction;
        let repeat = match mode {
            AnimationMode::Loop => {
                self.state.sweep_angle_degrees = target * 360.0;
                Repeat::Forever
            }
            AnimationMode::OneShot => Repeat::Once,
        };
        log::debug!("starting {mode:?} animation towards {target}");
        self.animation = Some(ActiveAnimation {
            mode,
            target,
            driver: ValueAnimator::new(0.0, target, self.animation_duration, repeat),
        });
        self.invalidate();
    }

    /// Rotates the arc continuously, one full turn per period.
    pub fn start_loop_animation(&mut self) {
        self.start_animation(AnimationMode::Loop);
    }

    /// Grows the arc from nothing to the current progress fraction once.
    pub fn start_progress_animation(&mut self) {
        self.start_animation(AnimationMode::OneShot);
    }

    /// Stops the live driver, leaving the last geometry in place.
    pub fn cancel_animation(&mut self) {
        if let Some(mut active) = self.animation.take() {
            active.driver.cancel();
            log::debug!("cancelled {:?} animation", active.mode);
        }
    }

    pub fn set_animating(&mut self, animating: bool) {
        if self.state.is_animating == animating {
            return;
        }
        self.state.is_animating = animating;
        if animating {
            self.start_loop_animation();
        } else {
            self.cancel_animation();
        }
    }

    /// Applies an optional binding value; `None` leaves the widget alone.
    pub fn bind_animating(&mut self, animating: Option<bool>) {
        if let Some(animating) = animating {
            self.set_animating(animating);
        }
    }

    pub fn set_progress_fraction(&mut self, value: f32) {
        self.state.progress_fraction = clamp_fraction(value);
        self.auto_rotate = false;
        self.start_progress_animation();
    }

    /// Advances the live animation by `dt`. Returns whether a redraw is due.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(active) = self.animation.as_mut() else {
            return false;
        };

        let state = &mut self.state;
        let (mode, target) = (active.mode, active.target);
        let ticked = active
            .driver
            .tick(dt, |value| match mode {
                AnimationMode::Loop => {
                    // A zero target has nothing to rotate; keep the angle.
                    if target > 0.0 {
                        state.start_angle_degrees = 360.0 * (value / target);
                    }
                }
                AnimationMode::OneShot => state.sweep_angle_degrees = 360.0 * value,
            })
            .is_some();

        if !active.driver.is_running() {
            self.animation = None;
        }
        if ticked {
            self.invalidate();
        }
        ticked
    }

    pub fn apply(&mut self, command: WidgetCommand) {
        match command {
            WidgetCommand::SetProgress(value) => self.set_progress_fraction(value),
            WidgetCommand::SetAnimating(animating) => self.set_animating(animating),
            WidgetCommand::StartLoop => self.start_loop_animation(),
            WidgetCommand::StartProgress => self.start_progress_animation(),
            WidgetCommand::Cancel => self.cancel_animation(),
        }
    }

    // ------------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------------

    pub fn set_ring_width(&mut self, ring_width: f32) {
        self.ring_width = non_negative(ring_width);
        if let Some(size) = self.size {
            self.update_geometry(size);
        }
        self.invalidate();
    }

    pub fn set_inner_circle_color(&mut self, color: Color) {
        self.inner_circle_color = color;
        self.invalidate();
    }

    pub fn set_ring_background_color(&mut self, color: Color) {
        self.ring_background_color = color;
        self.invalidate();
    }

    pub fn set_progress_ring_color(&mut self, color: Color) {
        self.progress_ring_color = color;
        self.invalidate();
    }

    pub fn set_progress_start_angle(&mut self, degrees: f32) {
        self.state.start_angle_degrees = degrees;
        self.invalidate();
    }

    pub fn set_logo(&mut self, source: Option<LogoSource>) {
        self.logo = resolve_logo(source.as_ref());
        match self.size {
            Some(size) => self.rescale_logo(size),
            None => self.state.scaled_logo = None,
        }
        self.invalidate();
    }

    pub fn set_logo_margin_border(&mut self, margin: f32) {
        self.logo_margin_border = non_negative(margin);
        if let Some(size) = self.size {
            self.rescale_logo(size);
        }
        self.invalidate();
    }

    pub fn set_auto_rotate(&mut self, auto_rotate: bool) {
        self.auto_rotate = auto_rotate;
    }
}

// ============================================================================
// LIFECYCLE
// ============================================================================

impl LifecycleObserver for CircularProgressWidget {
    fn on_lifecycle_event(&mut self, event: LifecycleEvent) {
        log::debug!("lifecycle: {event:?}");
        match event {
            LifecycleEvent::Attached => {
                if self.animation.is_none() && (self.state.is_animating || self.auto_rotate) {
                    self.start_loop_animation();
                }
            }
            LifecycleEvent::Detached => self.cancel_animation(),
            LifecycleEvent::Destroyed => {
                self.cancel_animation();
                self.state.is_animating = false;
            }
        }
    }
}
