//! Alert delivery seam.
//!
//! The core emits [`Event`]s; a sink turns alert-worthy ones into sound,
//! a blinking title, or a desktop notification. Delivery is best-effort
//! everywhere: a sink that fails to play or notify logs and moves on.

use crate::events::Event;
use crate::storage::NotificationsConfig;

/// Receives every event produced by the pollers. Implementations are
/// UI-specific (the CLI prints, a desktop shell would notify).
pub trait AlertSink {
    fn deliver(&mut self, event: &Event);
}

/// Channels an event should use, as decided by [`NotificationPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub sound: bool,
    pub notification: bool,
}

impl Delivery {
    pub const SILENT: Delivery = Delivery {
        sound: false,
        notification: false,
    };
}

/// Uniform suppression policy for all alert kinds (workout, timer,
/// stand-up): sound plays only while the UI is visible, and desktop
/// notifications are suppressed while visible when
/// `suppress_when_visible` is set.
#[derive(Debug, Clone)]
pub struct NotificationPolicy {
    config: NotificationsConfig,
}

impl NotificationPolicy {
    pub fn new(config: NotificationsConfig) -> Self {
        Self { config }
    }

    pub fn delivery(&self, event: &Event, ui_visible: bool) -> Delivery {
        if !event.is_alert() {
            return Delivery::SILENT;
        }
        let notification =
            self.config.enabled && !(self.config.suppress_when_visible && ui_visible);
        Delivery {
            sound: ui_visible,
            notification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn due_event() -> Event {
        Event::WorkoutDue {
            workout_id: "w".to_string(),
            title: "Pullups".to_string(),
            take_focus: true,
            at: NaiveDate::from_ymd_opt(2026, 3, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    fn rollover_event() -> Event {
        Event::DayRolledOver {
            day: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
            at: NaiveDate::from_ymd_opt(2026, 3, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn bookkeeping_events_are_silent() {
        let policy = NotificationPolicy::new(NotificationsConfig::default());
        assert_eq!(policy.delivery(&rollover_event(), true), Delivery::SILENT);
        assert_eq!(policy.delivery(&rollover_event(), false), Delivery::SILENT);
    }

    #[test]
    fn visible_ui_gets_sound_but_no_notification() {
        let policy = NotificationPolicy::new(NotificationsConfig::default());
        let d = policy.delivery(&due_event(), true);
        assert!(d.sound);
        assert!(!d.notification);
    }

    #[test]
    fn hidden_ui_gets_notification_but_no_sound() {
        let policy = NotificationPolicy::new(NotificationsConfig::default());
        let d = policy.delivery(&due_event(), false);
        assert!(!d.sound);
        assert!(d.notification);
    }

    #[test]
    fn disabling_suppression_notifies_even_when_visible() {
        let policy = NotificationPolicy::new(NotificationsConfig {
            enabled: true,
            suppress_when_visible: false,
        });
        assert!(policy.delivery(&due_event(), true).notification);
    }

    #[test]
    fn disabled_notifications_never_fire() {
        let policy = NotificationPolicy::new(NotificationsConfig {
            enabled: false,
            suppress_when_visible: true,
        });
        assert!(!policy.delivery(&due_event(), false).notification);
    }
}
