//! Integration tests: end-to-end arbitration sequences through the facades.
//!
//! These tests exercise open → set_state flows against a `MockSink`,
//! verifying the exact control-point write sequences, the priority
//! invariant, and serialization under concurrent callers.

use breathlight_lib::arbiter::{BreathSource, LightState};
use breathlight_lib::hal::LightHal;
use breathlight_lib::paths;
use breathlight_lib::sink::mock::{MockSink, SinkWrite};

fn hal() -> LightHal<MockSink> {
    LightHal::with_sinks(MockSink::new(), MockSink::new())
}

fn lit(color: u32) -> LightState {
    LightState::new(color)
}

fn off_sequence() -> Vec<SinkWrite> {
    vec![
        SinkWrite::int(paths::BREATH_OUTN, paths::CHANNEL_BUTTONS),
        SinkWrite::str(paths::BREATH_BLINK_MODE, paths::BLINK_MODE_OFF),
        SinkWrite::int(paths::BREATH_OUTN, paths::CHANNEL_RED),
        SinkWrite::str(paths::BREATH_BLINK_MODE, paths::BLINK_MODE_OFF),
    ]
}

fn breathing_sequence() -> Vec<SinkWrite> {
    vec![
        SinkWrite::int(paths::BREATH_OUTN, paths::CHANNEL_RED),
        SinkWrite::str(paths::BREATH_BLINK_MODE, paths::BLINK_MODE_BREATH),
    ]
}

fn buttons_on_sequence() -> Vec<SinkWrite> {
    vec![
        SinkWrite::int(paths::BREATH_OUTN, paths::CHANNEL_BUTTONS),
        SinkWrite::int(paths::BREATH_GRADE, paths::GRADE_BUTTONS),
        SinkWrite::str(paths::BREATH_BLINK_MODE, paths::BLINK_MODE_ON),
        SinkWrite::int(paths::BREATH_OUTN, paths::CHANNEL_RED),
        SinkWrite::int(paths::BREATH_GRADE, paths::GRADE_RED),
        SinkWrite::str(paths::BREATH_BLINK_MODE, paths::BLINK_MODE_ON),
    ]
}

// ── Scenario: battery breathing, then full deactivation ──

#[test]
fn battery_breathing_then_deactivation() {
    let hal = hal();
    let battery = hal.open("battery").unwrap();

    // Brightness 1 is enough to activate.
    battery.set_state(lit(0x0001_0000)).unwrap();
    assert_eq!(hal.engine().sink().writes(), breathing_sequence());
    assert_eq!(hal.engine().last_applied(), Some(BreathSource::Battery));

    hal.engine().sink().clear();
    battery.set_state(lit(0x0000_0000)).unwrap();
    assert_eq!(hal.engine().sink().writes(), off_sequence());
    assert_eq!(hal.engine().last_applied(), None);
    assert!(hal.engine().active_sources().is_empty());
}

// ── Scenario: buttons first, notification takes over ──

#[test]
fn buttons_then_notification_takeover() {
    let hal = hal();
    let buttons = hal.open("buttons").unwrap();
    let notifications = hal.open("notifications").unwrap();

    buttons.set_state(lit(0x00FF_0000)).unwrap();
    assert_eq!(hal.engine().sink().writes(), buttons_on_sequence());

    hal.engine().sink().clear();
    notifications.set_state(lit(0x0001_0000)).unwrap();

    // The handover issues only the breathing sequence — no off writes from a
    // pure priority reordering.
    assert_eq!(hal.engine().sink().writes(), breathing_sequence());
    assert_eq!(hal.engine().last_applied(), Some(BreathSource::Notification));
    assert!(hal.engine().active_sources().contains(BreathSource::Buttons));
}

// ── Priority invariant ──

#[test]
fn notification_always_beats_battery() {
    for order in [["battery", "notifications"], ["notifications", "battery"]] {
        let hal = hal();
        for name in order {
            hal.open(name)
                .unwrap()
                .set_state(lit(0x0040_0000))
                .unwrap();
        }
        assert_eq!(
            hal.engine().last_applied(),
            Some(BreathSource::Notification),
            "order {order:?} should end with notifications winning"
        );
    }
}

#[test]
fn priority_holds_with_all_four_active() {
    let hal = hal();
    for name in ["attention", "buttons", "battery", "notifications"] {
        hal.open(name)
            .unwrap()
            .set_state(lit(0x0010_0000))
            .unwrap();
    }
    assert_eq!(hal.engine().last_applied(), Some(BreathSource::Notification));
    assert_eq!(hal.engine().active_sources().len(), 4);
}

// ── Idempotence ──

#[test]
fn repeated_buttons_update_writes_once() {
    let hal = hal();
    let buttons = hal.open("buttons").unwrap();

    buttons.set_state(lit(0x00FF_0000)).unwrap();
    let first = hal.engine().sink().write_count();
    assert_eq!(first, 6);

    buttons.set_state(lit(0x00FF_0000)).unwrap();
    assert_eq!(hal.engine().sink().write_count(), first, "second call must be write-free");
}

// ── Turn-off completeness ──

#[test]
fn sole_source_turn_off_hits_both_channels() {
    let hal = hal();
    let attention = hal.open("attention").unwrap();
    attention.set_state(lit(0x0080_0000)).unwrap();
    hal.engine().sink().clear();

    attention.set_state(LightState::OFF).unwrap();
    let writes = hal.engine().sink().writes();
    assert!(writes.contains(&SinkWrite::int(paths::BREATH_OUTN, paths::CHANNEL_BUTTONS)));
    assert!(writes.contains(&SinkWrite::int(paths::BREATH_OUTN, paths::CHANNEL_RED)));
    assert_eq!(
        writes
            .iter()
            .filter(|w| matches!(w, SinkWrite::Str { token, .. } if token == paths::BLINK_MODE_OFF))
            .count(),
        2,
        "both channels should receive an explicit off write"
    );
    assert_eq!(hal.engine().last_applied(), None);
}

// ── Backlight independence ──

#[test]
fn backlight_never_disturbs_arbitration() {
    let hal = hal();
    let buttons = hal.open("buttons").unwrap();
    let backlight = hal.open("backlight").unwrap();

    buttons.set_state(lit(0x00FF_0000)).unwrap();
    hal.engine().sink().clear();

    backlight.set_state(lit(0x0080_8080)).unwrap();
    assert_eq!(hal.engine().sink().write_count(), 0);
    assert_eq!(hal.engine().last_applied(), Some(BreathSource::Buttons));
}

// ── Concurrency: updates linearize under the single lock ──

#[test]
fn concurrent_updates_linearize() {
    let hal = hal();

    // Each thread owns one source and leaves it in a known final state.
    // Whatever interleaving occurs, the final resolution runs against the
    // complete final state table, so the winner is deterministic.
    let plans: [(&str, u32); 4] = [
        ("notifications", 0x00FF_0000), // final: active
        ("battery", 0x0020_0000),       // final: active
        ("buttons", 0x0000_0000),       // final: inactive
        ("attention", 0x0010_0000),     // final: active
    ];

    let mut threads = Vec::new();
    for (name, final_color) in plans {
        let handle = hal.open(name).unwrap();
        threads.push(std::thread::spawn(move || {
            for i in 0..50 {
                let color = if i % 2 == 0 { 0x0001_0000 } else { 0 };
                handle.set_state(lit(color)).unwrap();
            }
            handle.set_state(lit(final_color)).unwrap();
        }));
    }
    for t in threads {
        t.join().unwrap();
    }

    let engine = hal.engine();
    assert!(engine.active_sources().contains(BreathSource::Notification));
    assert!(engine.active_sources().contains(BreathSource::Battery));
    assert!(engine.active_sources().contains(BreathSource::Attention));
    assert!(!engine.active_sources().contains(BreathSource::Buttons));
    assert_eq!(engine.last_applied(), Some(BreathSource::Notification));

    // Per-source state matches each thread's final update.
    assert_eq!(engine.state(BreathSource::Notification), lit(0x00FF_0000));
    assert_eq!(engine.state(BreathSource::Buttons), lit(0x0000_0000));
}

#[test]
fn concurrent_backlight_and_breath_updates() {
    let hal = hal();
    let backlight = hal.open("backlight").unwrap();
    let battery = hal.open("battery").unwrap();

    let breather = std::thread::spawn(move || {
        for _ in 0..100 {
            battery.set_state(lit(0x0001_0000)).unwrap();
        }
    });
    let dimmer = std::thread::spawn(move || {
        for level in 0..100u32 {
            backlight.set_state(lit(level << 16 | level << 8 | level)).unwrap();
        }
    });
    breather.join().unwrap();
    dimmer.join().unwrap();

    assert!(hal.engine().active_sources().contains(BreathSource::Battery));
    assert_eq!(hal.engine().last_applied(), Some(BreathSource::Battery));
}
