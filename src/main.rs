use circular_progress::{Color, HostConfig, HostScreen, WidgetCommand, WidgetConfig};
use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

/// Maps one line of stdin to a widget command.
///
/// A number sets the progress fraction; `on`/`off` toggle the spinner;
/// `cancel` stops whatever is running.
fn parse_line(line: &str) -> Option<WidgetCommand> {
    match line.trim() {
        "on" => Some(WidgetCommand::SetAnimating(true)),
        "off" => Some(WidgetCommand::SetAnimating(false)),
        "cancel" => Some(WidgetCommand::Cancel),
        "loop" => Some(WidgetCommand::StartLoop),
        other => other.parse::<f32>().ok().map(WidgetCommand::SetProgress),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut style = None;
    let mut title = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--style" {
            style = args.next();
        } else if arg == "--title" {
            title = args.next();
        }
    }

    let widget = match style {
        Some(path) => WidgetConfig::from_toml_file(path)?,
        None => WidgetConfig::builder()
            .ring_width(16.0)
            .inner_circle_color(Color::rgb(0xf4, 0xf4, 0xf4))
            .progress_ring_color(Color::rgb(0xe5, 0x39, 0x35))
            .initial_progress_fraction(0.25)
            .animating_initially(true)
            .build(),
    };
    let host = HostConfig::builder()
        .maybe_title(title)
        .build();

    // Read commands from stdin so the widget can be driven from a pipe.
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines().map_while(Result::ok) {
            match parse_line(&line) {
                Some(command) => {
                    if sender.send(command).is_err() {
                        break;
                    }
                }
                None => log::warn!("ignoring unrecognised input {line:?}"),
            }
        }
    });

    HostScreen::new(host, widget).show_with_commands(receiver)
}
