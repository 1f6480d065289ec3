//! Display behaviour: status refresh, activation banner, redraw on disarm.

use firealarm::app::service::AppService;
use firealarm::config::AlarmConfig;

use super::mock_hw::{MockHardware, RecordingSink};

fn make_app() -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(AlarmConfig::default()).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

#[test]
fn boot_shows_status_labels() {
    let (_, hw, _) = make_app();
    assert_eq!(hw.panel[0], "Temperature:");
    assert_eq!(hw.panel[1], "Gas:");
    assert_eq!(hw.panel[2], "Alarm:");
}

#[test]
fn status_refreshes_once_per_second() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.temperature_c = 23.6;

    for _ in 0..99 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(hw.panel[0], "Temperature:", "not yet refreshed");

    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.panel[0], "Temperature:24'C");
    assert_eq!(hw.panel[1], "Gas:Not Detected");
    assert_eq!(hw.panel[2], "Alarm:OFF");
}

#[test]
fn banner_replaces_status_and_is_drawn_once() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.temperature_c = 35.0;
    app.tick(&mut hw, &mut sink);

    assert_eq!(
        hw.panel,
        [
            "ALARM IS ACTIVATED".to_string(),
            "Temp. is too high".to_string(),
            "Enter a code to".to_string(),
            "deactivate alarm:".to_string(),
        ]
    );
    let clears = hw.clears;
    for _ in 0..300 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(hw.clears, clears, "banner is not redrawn while armed");
    assert_eq!(hw.panel[0], "ALARM IS ACTIVATED");
}

#[test]
fn disarm_clears_banner_and_resumes_status() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.gas_detected = true;
    app.tick(&mut hw, &mut sink);
    hw.snapshot.gas_detected = false;

    hw.type_keys("2005");
    while !hw.keys.is_empty() {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(hw.panel[0], "Temperature:");
    assert_eq!(hw.panel[3], "");

    for _ in 0..100 {
        app.tick(&mut hw, &mut sink);
    }
    assert_eq!(hw.panel[0], "Temperature:22'C");
    assert_eq!(hw.panel[2], "Alarm:OFF");
}
