use crate::lifecycle::{Lifecycle, LifecycleEvent};
use crate::render::{Canvas, DrawCommand, Scene};
use crate::widget::{CircularProgressWidget, WidgetCommand};
use crate::{Color, WidgetConfig};
use bon::Builder;
use pixels::{Pixels, SurfaceTexture};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

/// Lifecycle signal implied by a window event, if any.
fn lifecycle_event_for(event: &WindowEvent) -> Option<LifecycleEvent> {
    match event {
        WindowEvent::CloseRequested => Some(LifecycleEvent::Destroyed),
        WindowEvent::Occluded(true) => Some(LifecycleEvent::Detached),
        WindowEvent::Occluded(false) => Some(LifecycleEvent::Attached),
        _ => None,
    }
}

/// Time between frames; rates below 1 fps or not finite fall back to 1 fps.
fn frame_interval(max_framerate: f64) -> Duration {
    let rate = if max_framerate.is_finite() && max_framerate > 0.0 {
        max_framerate.max(1.0)
    } else {
        1.0
    };
    Duration::from_secs_f64(1.0 / rate)
}

#[derive(Debug, Clone, Builder)]
pub struct HostConfig {
    #[builder(default = "Circular Progress".to_string(), into)]
    pub title: String,
    #[builder(default = 300)]
    pub window_width: u32,
    #[builder(default = 300)]
    pub window_height: u32,
    #[builder(default = Color::WHITE)]
    pub background: Color,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
}

/// A trivial screen hosting one widget.
///
/// The screen owns the lifecycle notifier; the widget only observes it.
pub struct HostScreen {
    config: HostConfig,
    lifecycle: Lifecycle,
    widget: Rc<RefCell<CircularProgressWidget>>,
}

impl HostScreen {
    pub fn new(config: HostConfig, widget: WidgetConfig) -> Self {
        let mut lifecycle = Lifecycle::new();
        let widget = CircularProgressWidget::new_observed(widget, &mut lifecycle);
        Self {
            config,
            lifecycle,
            widget,
        }
    }

    pub fn show(self) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(None)
    }

    /// Like [`HostScreen::show`], draining `receiver` once per frame.
    pub fn show_with_commands(
        self,
        receiver: Receiver<WidgetCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(Some(receiver))
    }

    fn run_window(
        self,
        receiver: Option<Receiver<WidgetCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let Self {
            config,
            mut lifecycle,
            widget,
        } = self;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();
        let size = window.inner_size();
        let mut fb_width = size.width;
        let mut fb_height = size.height;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        widget.borrow_mut().on_resize(fb_width, fb_height);
        lifecycle.dispatch(LifecycleEvent::Attached);

        let frame_duration = frame_interval(config.max_framerate);
        let mut last_frame = Instant::now();
        let mut last_tick = Instant::now();
        let mut scene = Scene::new();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::WaitUntil(last_frame + frame_duration));
            match event {
                Event::WindowEvent { event, .. } => {
                    if let Some(lifecycle_event) = lifecycle_event_for(&event) {
                        lifecycle.dispatch(lifecycle_event);
                    }
                    match event {
                        WindowEvent::CloseRequested => window_target.exit(),
                        WindowEvent::Resized(new_size) => {
                            if new_size.width == 0 || new_size.height == 0 {
                                return;
                            }
                            fb_width = new_size.width;
                            fb_height = new_size.height;
                            if let Err(err) = pixels
                                .resize_buffer(fb_width, fb_height)
                                .and_then(|_| pixels.resize_surface(fb_width, fb_height))
                            {
                                log::error!("failed to resize surface: {err}");
                                window_target.exit();
                                return;
                            }
                            widget.borrow_mut().on_resize(fb_width, fb_height);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = Instant::now();
                            let dt = now - last_tick;
                            last_tick = now;

                            let mut widget = widget.borrow_mut();
                            if let Some(ref receiver) = receiver {
                                while let Ok(command) = receiver.try_recv() {
                                    widget.apply(command);
                                }
                            }
                            widget.tick(dt);

                            scene.clear();
                            scene.add_command(DrawCommand::Clear(config.background));
                            widget.draw(&mut scene);

                            // Center the square widget inside the window.
                            let side = widget.measured_size().unwrap_or(0);
                            let origin_x = (fb_width.saturating_sub(side) / 2) as i32;
                            let origin_y = (fb_height.saturating_sub(side) / 2) as i32;
                            let mut canvas =
                                Canvas::new(pixels.frame_mut(), fb_width as usize, fb_height as usize)
                                    .with_origin(origin_x, origin_y);
                            scene.render(&mut canvas);

                            if let Err(err) = pixels.render() {
                                log::error!("failed to present frame: {err}");
                                window_target.exit();
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        let wants_frame = receiver.is_some() || {
                            let mut widget = widget.borrow_mut();
                            widget.take_redraw_request() || widget.is_animation_running()
                        };
                        if wants_frame {
                            window_clone.request_redraw();
                        }
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_events_map_to_lifecycle() {
        assert_eq!(
            lifecycle_event_for(&WindowEvent::CloseRequested),
            Some(LifecycleEvent::Destroyed)
        );
        assert_eq!(
            lifecycle_event_for(&WindowEvent::Occluded(true)),
            Some(LifecycleEvent::Detached)
        );
        assert_eq!(
            lifecycle_event_for(&WindowEvent::Occluded(false)),
            Some(LifecycleEvent::Attached)
        );
        assert_eq!(lifecycle_event_for(&WindowEvent::Focused(true)), None);
    }

    #[test]
    fn frame_interval_survives_bad_rates() {
        assert_eq!(frame_interval(50.0), Duration::from_millis(20));
        assert_eq!(frame_interval(0.0), Duration::from_secs(1));
        assert_eq!(frame_interval(-30.0), Duration::from_secs(1));
        assert_eq!(frame_interval(f64::NAN), Duration::from_secs(1));
        assert_eq!(frame_interval(f64::INFINITY), Duration::from_secs(1));
    }
}
