//! Integration tests for the AppService → alarm core → indicators pipeline.

use firealarm::app::events::AppEvent;
use firealarm::app::service::AppService;
use firealarm::config::AlarmConfig;
use firealarm::fsm::StateId;

use super::mock_hw::{MockHardware, RecordingSink};

fn make_app() -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(AlarmConfig::default()).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn run(app: &mut AppService, hw: &mut MockHardware, sink: &mut RecordingSink, ticks: usize) {
    for _ in 0..ticks {
        app.tick(hw, sink);
    }
}

/// Tick until every queued key has been consumed.
fn drain_keys(app: &mut AppService, hw: &mut MockHardware, sink: &mut RecordingSink) {
    while !hw.keys.is_empty() {
        app.tick(hw, sink);
    }
}

#[test]
fn quiet_conditions_keep_everything_off() {
    let (mut app, mut hw, mut sink) = make_app();
    run(&mut app, &mut hw, &mut sink, 500);

    assert_eq!(app.state(), StateId::Idle);
    assert!(!hw.siren_on());
    assert!(!hw.alarm_led_on());
    assert!(hw.strobe_trace().iter().all(|lit| !lit));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::StateChanged { .. })), 0);
}

#[test]
fn gas_arms_and_correct_code_disarms() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.snapshot.gas_detected = true;
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.state(), StateId::ActiveDisplayed);
    assert!(hw.siren_on());
    assert!(hw.alarm_led_on());

    hw.type_keys("2005");
    drain_keys(&mut app, &mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Idle);
    assert!(!hw.siren_on());
    assert!(!hw.alarm_led_on());
    assert!(sink.events.contains(&AppEvent::CodeAccepted));
    assert_eq!(app.build_telemetry().failures, 0);
}

#[test]
fn alarm_stays_latched_after_conditions_clear() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.snapshot.temperature_c = 31.0;
    app.tick(&mut hw, &mut sink);
    hw.snapshot.temperature_c = 22.0;
    run(&mut app, &mut hw, &mut sink, 300);

    assert!(app.state().is_active());
    assert!(hw.siren_on());
    assert_eq!(
        app.commands().strobe_half_period_ms,
        500,
        "strobe keeps the last active period"
    );
}

#[test]
fn exactly_at_limit_does_not_arm() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.temperature_c = 30.0;
    run(&mut app, &mut hw, &mut sink, 50);
    assert_eq!(app.state(), StateId::Idle);
}

#[test]
fn manual_test_button_arms_with_fastest_strobe() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.manual_test = true;
    app.tick(&mut hw, &mut sink);

    assert!(app.state().is_active());
    assert_eq!(app.commands().strobe_half_period_ms, 100);
    assert_eq!(hw.panel[1], "Gas is detected");
}

#[test]
fn wrong_code_then_abort_then_correct_code() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.gas_detected = true;
    app.tick(&mut hw, &mut sink);

    hw.type_keys("1111");
    drain_keys(&mut app, &mut hw, &mut sink);
    assert!(hw.incorrect_code_led_on());
    assert!(sink.events.contains(&AppEvent::CodeRejected { failures: 1 }));

    // Keys other than '#' are swallowed while the failed attempt stands.
    hw.type_keys("2005");
    drain_keys(&mut app, &mut hw, &mut sink);
    assert!(app.state().is_active());

    hw.type_keys("##");
    drain_keys(&mut app, &mut hw, &mut sink);
    assert!(!hw.incorrect_code_led_on());
    assert!(sink.events.contains(&AppEvent::CodeEntryAborted));

    hw.snapshot.gas_detected = false;
    hw.type_keys("2005");
    drain_keys(&mut app, &mut hw, &mut sink);
    assert_eq!(app.state(), StateId::Idle);
    assert_eq!(app.build_telemetry().failures, 1, "success does not reset failures");
}

#[test]
fn third_wrong_code_blocks_the_keypad() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.gas_detected = true;
    app.tick(&mut hw, &mut sink);

    hw.type_keys("1111##1111##1111");
    drain_keys(&mut app, &mut hw, &mut sink);

    assert!(hw.system_blocked_led_on());
    assert!(sink.events.contains(&AppEvent::SystemBlocked { failures: 3 }));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SystemBlocked { .. })), 1);

    // Nothing gets through any more, not even the right code.
    hw.snapshot.gas_detected = false;
    hw.type_keys("##2005");
    drain_keys(&mut app, &mut hw, &mut sink);
    run(&mut app, &mut hw, &mut sink, 100);

    assert!(app.state().is_active());
    assert!(hw.siren_on());
    assert!(app.build_telemetry().blocked);
}

#[test]
fn strobe_rate_tracks_conditions() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.gas_detected = true;
    run(&mut app, &mut hw, &mut sink, 400);

    // 1000 ms half-period at 10 ms per tick: 100 lit, 100 dark, ...
    let trace = hw.strobe_trace();
    let armed = &trace[trace.len() - 400..];
    assert!(armed[..100].iter().all(|&lit| lit));
    assert!(armed[100..200].iter().all(|&lit| !lit));

    hw.snapshot.temperature_c = 45.0;
    run(&mut app, &mut hw, &mut sink, 40);
    let trace = hw.strobe_trace();
    let both = &trace[trace.len() - 40..];
    // 100 ms half-period: alternates every 10 ticks, starting lit.
    assert!(both[..10].iter().all(|&lit| lit));
    assert!(both[10..20].iter().all(|&lit| !lit));
    assert!(both[20..30].iter().all(|&lit| lit));
}

#[test]
fn events_follow_the_arming_episode() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.temperature_c = 40.0;
    app.tick(&mut hw, &mut sink);
    hw.snapshot.temperature_c = 22.0;
    hw.type_keys("2005");
    drain_keys(&mut app, &mut hw, &mut sink);

    let transitions: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (StateId::Idle, StateId::ActiveUndisplayed),
            (StateId::ActiveUndisplayed, StateId::ActiveDisplayed),
            (StateId::ActiveDisplayed, StateId::Idle),
        ]
    );
    assert_eq!(sink.events[0], AppEvent::Started(StateId::Idle));
}

#[test]
fn one_key_code_reports_arm_and_disarm_in_order() {
    let config = AlarmConfig::from_json(br#"{"stored_code": "7", "code_length": 1}"#).unwrap();
    let mut app = AppService::new(config).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);

    hw.snapshot.temperature_c = 40.0;
    hw.type_keys("7");
    app.tick(&mut hw, &mut sink);

    assert_eq!(app.state(), StateId::Idle);
    let tail: Vec<_> = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::StateChanged { .. } | AppEvent::CodeAccepted))
        .cloned()
        .collect();
    assert_eq!(
        tail,
        vec![
            AppEvent::StateChanged {
                from: StateId::Idle,
                to: StateId::ActiveUndisplayed,
            },
            AppEvent::CodeAccepted,
            AppEvent::StateChanged {
                from: StateId::ActiveUndisplayed,
                to: StateId::Idle,
            },
        ]
    );
}
