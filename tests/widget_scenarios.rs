use circular_progress::{
    AnimationMode, Canvas, CircularProgressWidget, Color, DrawCommand, Lifecycle, LifecycleEvent,
    RectF, Scene, WidgetConfig,
};
use std::rc::Rc;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn run_for(widget: &mut CircularProgressWidget, total: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        widget.tick(FRAME);
        elapsed += FRAME;
    }
}

fn quarter_widget() -> CircularProgressWidget {
    CircularProgressWidget::new(
        WidgetConfig::builder()
            .ring_width(10.0)
            .initial_progress_fraction(0.25)
            .progress_start_angle_degrees(-90.0)
            .inner_circle_color(Color::rgb(0, 0, 0xff))
            .auto_rotate(false)
            .build(),
    )
}

#[test]
fn quarter_ring_layers_and_geometry() {
    let mut widget = quarter_widget();
    widget.on_resize(200, 200);

    let mut scene = Scene::new();
    widget.draw(&mut scene);
    let commands = scene.commands();
    assert_eq!(commands.len(), 3);

    match &commands[0] {
        DrawCommand::FillCircle { cx, cy, radius, .. } => {
            assert!(approx(*cx, 100.0));
            assert!(approx(*cy, 100.0));
            assert!(approx(*radius, 91.0));
        }
        other => panic!("expected inner disc, got {other:?}"),
    }
    match &commands[1] {
        DrawCommand::StrokeArc {
            oval,
            start_angle,
            sweep_angle,
            stroke_width,
            color,
        } => {
            assert_eq!(*oval, RectF::new(5.0, 5.0, 195.0, 195.0));
            assert_eq!((*start_angle, *sweep_angle), (0.0, 360.0));
            assert_eq!(*stroke_width, 10.0);
            assert_eq!(*color, Color::LIGHT_GRAY);
        }
        other => panic!("expected background ring, got {other:?}"),
    }
    match &commands[2] {
        DrawCommand::StrokeArc {
            start_angle,
            sweep_angle,
            color,
            ..
        } => {
            assert!(approx(*start_angle, -90.0));
            assert!(approx(*start_angle + *sweep_angle, 0.0));
            assert_eq!(*color, Color::RED);
        }
        other => panic!("expected progress arc, got {other:?}"),
    }
}

#[test]
fn quarter_ring_rasterizes() {
    let mut widget = quarter_widget();
    widget.on_resize(200, 200);
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(Color::WHITE));
    widget.draw(&mut scene);

    let mut frame = vec![0u8; 200 * 200 * 4];
    let mut canvas = Canvas::new(&mut frame, 200, 200);
    scene.render(&mut canvas);

    // Centre: inner disc.
    assert_eq!(canvas.pixel(100, 100), Some([0, 0, 0xff, 0xff]));
    // 12 o'clock -> 3 o'clock quadrant of the ring is red.
    assert_eq!(canvas.pixel(165, 34), Some([0xff, 0, 0, 0xff]));
    // The opposite quadrant shows the background ring.
    assert_eq!(canvas.pixel(34, 165), Some([0xcc, 0xcc, 0xcc, 0xff]));
    // Corners stay clear.
    assert_eq!(canvas.pixel(0, 0), Some([0xff, 0xff, 0xff, 0xff]));
}

#[test]
fn progress_converges_for_every_fraction() {
    for step in 0..=10 {
        let p = step as f32 / 10.0;
        let mut widget = quarter_widget();
        widget.set_progress_fraction(p);
        run_for(&mut widget, Duration::from_millis(1100));
        assert!(!widget.is_animation_running());
        assert!(approx(widget.state().sweep_angle_degrees, 360.0 * p), "p = {p}");
    }
}

#[test]
fn out_of_range_progress_is_clamped() {
    let mut widget = quarter_widget();
    widget.set_progress_fraction(1.95);
    assert_eq!(widget.state().progress_fraction, 1.0);
    run_for(&mut widget, Duration::from_millis(1100));
    assert!(approx(widget.state().sweep_angle_degrees, 360.0));

    widget.set_progress_fraction(-0.4);
    assert_eq!(widget.state().progress_fraction, 0.0);
    run_for(&mut widget, Duration::from_millis(1100));
    assert!(approx(widget.state().sweep_angle_degrees, 0.0));
}

#[test]
fn cancel_then_ticks_never_mutate() {
    let mut widget = quarter_widget();
    widget.start_loop_animation();
    run_for(&mut widget, Duration::from_millis(160));
    widget.cancel_animation();

    let start = widget.state().start_angle_degrees;
    let sweep = widget.state().sweep_angle_degrees;
    run_for(&mut widget, Duration::from_secs(3));
    assert_eq!(widget.state().start_angle_degrees, start);
    assert_eq!(widget.state().sweep_angle_degrees, sweep);
}

#[test]
fn square_clamp_uses_smaller_side() {
    let mut widget = quarter_widget();
    widget.on_resize(300, 200);
    assert_eq!(widget.measured_size(), Some(200));
    let rect = widget.state().bounding_rect;
    assert_eq!(rect, RectF::new(5.0, 5.0, 195.0, 195.0));
}

#[test]
fn lifecycle_drives_animation_without_owning_widget() {
    let mut lifecycle = Lifecycle::new();
    let widget = CircularProgressWidget::new_observed(
        WidgetConfig::builder().animating_initially(true).build(),
        &mut lifecycle,
    );
    assert_eq!(Rc::strong_count(&widget), 1);

    lifecycle.dispatch(LifecycleEvent::Attached);
    assert_eq!(widget.borrow().animation_mode(), Some(AnimationMode::Loop));

    lifecycle.dispatch(LifecycleEvent::Destroyed);
    assert!(!widget.borrow().is_animation_running());
    assert!(!widget.borrow().state().is_animating);

    drop(widget);
    lifecycle.dispatch(LifecycleEvent::Attached);
    assert_eq!(lifecycle.observer_count(), 0);
}
