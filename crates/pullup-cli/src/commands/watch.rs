use std::time::Duration;

use chrono::Local;
use pullup_core::alert::{AlertSink, NotificationPolicy};
use pullup_core::{App, Event};

/// Prints the event feed. The terminal running `watch` counts as the
/// visible UI, so per policy the bell rings and desktop notifications
/// stay suppressed (unless configured otherwise).
struct ConsoleSink {
    policy: NotificationPolicy,
}

impl AlertSink for ConsoleSink {
    fn deliver(&mut self, event: &Event) {
        let delivery = self.policy.delivery(event, true);
        if delivery.sound {
            print!("\x07");
        }
        let line = serde_json::to_string(event).unwrap_or_else(|_| format!("{event:?}"));
        let now = Local::now().format("%H:%M:%S");
        if delivery.notification {
            println!("[{now}] (notify) {line}");
        } else {
            println!("[{now}] {line}");
        }
    }
}

pub fn run(interval_secs: u64, ticks: u64) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::open(Local::now().naive_local())?;
    let mut sink = ConsoleSink {
        policy: NotificationPolicy::new(app.config().notifications.clone()),
    };
    let mut rng = rand::thread_rng();
    let interval = Duration::from_secs(interval_secs.max(1));

    println!(
        "watching {} workout(s); stand-up reminder {}",
        app.scheduler().len(),
        if app.config().standup.enabled {
            "on"
        } else {
            "off"
        }
    );

    let mut elapsed_ticks = 0u64;
    loop {
        let now = Local::now().naive_local();
        for event in app.tick(now, &mut rng) {
            sink.deliver(&event);
        }
        if let Some(event) = app.tick_timer(now) {
            sink.deliver(&event);
        }
        elapsed_ticks += 1;
        if ticks != 0 && elapsed_ticks >= ticks {
            break;
        }
        std::thread::sleep(interval);
    }
    Ok(())
}
