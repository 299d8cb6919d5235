use circular_progress::{HostConfig, HostScreen, WidgetCommand, WidgetConfig};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let widget = WidgetConfig::builder()
        .ring_width(12.0)
        .initial_progress_fraction(0.3)
        .auto_rotate(false)
        .build();
    let host = HostConfig::builder().title("Random progress").build();

    let (sender, receiver) = mpsc::channel();

    // Alternate between spinning and jumping to random fractions.
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let command = if rng.random_bool(0.25) {
                WidgetCommand::SetAnimating(rng.random_bool(0.5))
            } else {
                WidgetCommand::SetProgress(rng.random_range(-0.2..1.2))
            };
            if sender.send(command).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(1500));
        }
    });

    println!("Displaying a circular progress widget driven by random commands.");
    println!("Values outside 0..1 are clamped by the widget.");
    println!("Press Ctrl+C or close the window to exit");

    HostScreen::new(host, widget).show_with_commands(receiver)
}
