//! Integration tests for the full ControlLoop pipeline against a mock
//! board: sampling → classification → flags → mapping → Panic →
//! indicators → frame → send.

use crate::mock_hw::{BoardCall, MockBoard, RecordingSink};

use throttle::app::events::{AppEvent, FaultKind};
use throttle::app::service::ControlLoop;
use throttle::config::BoardConfig;
use throttle::control::drive_mode::DriveMode;
use throttle::events::CycleTrigger;
use throttle::indicator::ErrorCode;
use throttle::message::{self, SLOT_FLAGS, SLOT_RESERVED};
use throttle::safety::Flag;
use throttle::sensors::AdcChannel;
use throttle::sensors::switches::SafetySwitch;

fn make_loop() -> (ControlLoop, MockBoard, RecordingSink) {
    let mut cl = ControlLoop::new(BoardConfig::default()).unwrap();
    let mut sink = RecordingSink::new();
    cl.start(&mut sink);
    sink.take();
    (cl, MockBoard::new(), sink)
}

// ── Nominal pedal ─────────────────────────────────────────────

#[test]
fn centred_pedal_is_plausible_and_sent() {
    let (mut cl, mut hw, mut sink) = make_loop();

    let ctx = cl.run_cycle(&mut hw, &mut sink);

    assert!(ctx.mapping.plausible);
    assert!(!ctx.flags.panic);
    let frame = hw.last_sent().expect("one frame per cycle");
    assert_eq!(
        frame.as_bytes(),
        &[45, 48, DriveMode::Acceleration.as_u8(), 0, 0, 0, 0x60, 0]
    );
    assert!(sink.events.is_empty());
}

#[test]
fn started_event_carries_tolerance() {
    let mut cl = ControlLoop::new(BoardConfig::default()).unwrap();
    let mut sink = RecordingSink::new();
    cl.start(&mut sink);
    assert_eq!(sink.events, vec![AppEvent::Started { tolerance_pct: 10 }]);
}

#[test]
fn channels_are_sampled_in_order_every_cycle() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.conversion_polls = 3;

    cl.run_cycle(&mut hw, &mut sink);
    cl.run_cycle(&mut hw, &mut sink);

    let order = AdcChannel::SEQUENCE;
    let expected: Vec<_> = order.iter().chain(order.iter()).copied().collect();
    assert_eq!(hw.selected_channels(), expected);

    // Each sample is select → start → read, never interleaved.
    let adc: Vec<_> = hw
        .calls
        .iter()
        .filter(|c| matches!(c, BoardCall::Select(_) | BoardCall::Start | BoardCall::Read(_)))
        .take(3)
        .copied()
        .collect();
    assert_eq!(
        adc,
        vec![
            BoardCall::Select(AdcChannel::Throttle1),
            BoardCall::Start,
            BoardCall::Read(0x50),
        ]
    );
}

#[test]
fn frame_is_the_last_action_of_a_cycle() {
    let (mut cl, mut hw, mut sink) = make_loop();
    cl.run_cycle(&mut hw, &mut sink);
    assert!(matches!(hw.calls.last(), Some(BoardCall::Send(_))));
    assert_eq!(hw.sent().len(), 1);
}

// ── Safety switches ───────────────────────────────────────────

#[test]
fn estop_sets_its_byte_and_leaves_throttle_alone() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.estop_line = false;

    let ctx = cl.run_cycle(&mut hw, &mut sink);

    let frame = hw.last_sent().unwrap();
    assert_eq!(frame.byte(message::SLOT_ESTOP), 0xFF);
    assert_eq!(frame.byte(message::SLOT_INERTIA_SWITCH), 0x00);
    assert_eq!(frame.byte(message::SLOT_BRAKE_OVER_TRAVEL), 0x00);
    assert_eq!(frame.byte(message::SLOT_THROTTLE1), 45);
    assert_eq!(frame.byte(message::SLOT_THROTTLE2), 48);
    assert!(!ctx.flags.panic);
    assert!(matches!(
        sink.events.as_slice(),
        [AppEvent::FaultDetected(FaultKind::ShutdownSwitch, _)]
    ));
}

#[test]
fn every_shutdown_switch_has_its_own_slot() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.inertia_line = false;
    cl.run_cycle(&mut hw, &mut sink);
    let frame = hw.last_sent().unwrap();
    assert_eq!(frame.byte(message::SLOT_ESTOP), 0x00);
    assert_eq!(frame.byte(message::SLOT_INERTIA_SWITCH), 0xFF);

    hw.inertia_line = true;
    hw.bots_line = false;
    cl.run_cycle(&mut hw, &mut sink);
    let frame = hw.last_sent().unwrap();
    assert_eq!(frame.byte(message::SLOT_INERTIA_SWITCH), 0x00);
    assert_eq!(frame.byte(message::SLOT_BRAKE_OVER_TRAVEL), 0xFF);
}

#[test]
fn switch_trip_clears_when_the_loop_closes() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.bots_line = false;
    cl.run_cycle(&mut hw, &mut sink);
    hw.bots_line = true;
    let ctx = cl.run_cycle(&mut hw, &mut sink);

    assert!(!ctx.flags.brake_over_travel);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::FaultCleared(FaultKind::ShutdownSwitch))
    );
}

#[test]
fn unreadable_switch_counts_as_tripped() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.broken_switch = Some(SafetySwitch::InertiaSwitch);

    let ctx = cl.run_cycle(&mut hw, &mut sink);

    assert!(ctx.flags.inertia_switch);
    assert_eq!(hw.last_sent().unwrap().byte(message::SLOT_INERTIA_SWITCH), 0xFF);
}

// ── Brake ─────────────────────────────────────────────────────

#[test]
fn brake_with_pedal_down_is_a_conflict_not_a_panic() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.brake_line = true;

    let ctx = cl.run_cycle(&mut hw, &mut sink);

    assert!(ctx.flags.brake);
    assert!(ctx.flags.throttle_brake_conflict);
    assert!(!ctx.flags.panic);
    let bits = hw.last_sent().unwrap().byte(SLOT_FLAGS);
    assert_ne!(bits & Flag::ThrottleBrakeConflict.mask(), 0);
    assert_ne!(bits & Flag::Brake.mask(), 0);
    assert_eq!(
        sink.events,
        vec![AppEvent::FaultDetected(FaultKind::ThrottleBrakeConflict, ctx.flags)]
    );
}

#[test]
fn brake_with_pedal_released_is_fine() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.brake_line = true;
    hw.throttle1 = 0x0C;
    hw.throttle2 = 0x06;

    let ctx = cl.run_cycle(&mut hw, &mut sink);

    assert!(ctx.flags.brake);
    assert!(!ctx.flags.throttle_brake_conflict);
    assert!(!ctx.flags.motor_on);
    assert!(!ctx.flags.throttle_10);
}

// ── Drive mode selector ───────────────────────────────────────

#[test]
fn selector_below_first_bound_lights_indicator_one_for_one_cycle() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.selector = 10;

    let ctx = cl.run_cycle(&mut hw, &mut sink);
    assert_eq!(ctx.mode, DriveMode::Error);
    assert_eq!(ctx.indicated_code, ErrorCode::DRIVE_MODE);
    assert_eq!(ctx.error_code, ErrorCode::NONE);
    assert_eq!(hw.indicators(), [true, false, false]);
    assert_eq!(hw.last_sent().unwrap().byte(message::SLOT_DRIVE_MODE), 0);

    hw.selector = 300;
    let ctx = cl.run_cycle(&mut hw, &mut sink);
    assert_eq!(ctx.mode, DriveMode::Acceleration);
    assert_eq!(hw.indicators(), [false, false, false]);
}

#[test]
fn selector_bands_map_to_modes() {
    let (mut cl, mut hw, mut sink) = make_loop();
    let cases = [
        (64, DriveMode::Standard),
        (255, DriveMode::Standard),
        (256, DriveMode::Acceleration),
        (448, DriveMode::Skidpad),
        (640, DriveMode::Autocross),
        (832, DriveMode::Endurance),
        (1023, DriveMode::Endurance),
    ];
    for (raw, mode) in cases {
        hw.selector = raw;
        let ctx = cl.run_cycle(&mut hw, &mut sink);
        assert_eq!(ctx.mode, mode, "raw {raw}");
        assert_eq!(hw.last_sent().unwrap().byte(message::SLOT_DRIVE_MODE), mode.as_u8());
    }
}

#[test]
fn mode_change_is_reported_once() {
    let (mut cl, mut hw, mut sink) = make_loop();
    cl.run_cycle(&mut hw, &mut sink);
    hw.selector = 900;
    cl.run_cycle(&mut hw, &mut sink);
    cl.run_cycle(&mut hw, &mut sink);

    assert_eq!(
        sink.events,
        vec![AppEvent::DriveModeChanged {
            from: DriveMode::Acceleration,
            to: DriveMode::Endurance,
        }]
    );
}

// ── Plausibility / Panic ──────────────────────────────────────

#[test]
fn disagreeing_sensors_panic_and_zero_the_throttle() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.throttle1 = 0xA0;
    hw.throttle2 = 0x06;

    let ctx = cl.run_cycle(&mut hw, &mut sink);

    assert!(ctx.flags.panic);
    let frame = hw.last_sent().unwrap();
    assert_eq!(frame.byte(message::SLOT_THROTTLE1), 0);
    assert_eq!(frame.byte(message::SLOT_THROTTLE2), 0);
    assert_ne!(frame.byte(SLOT_FLAGS) & Flag::Panic.mask(), 0);
    assert_eq!(frame.byte(SLOT_FLAGS) & Flag::MotorOn.mask(), 0);
    assert_eq!(hw.indicators(), [true, true, true]);
    assert_eq!(cl.panic_cycles(), 1);
}

#[test]
fn panic_indicators_win_over_selector_code() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.throttle1 = 0xA0;
    hw.throttle2 = 0x06;
    hw.selector = 0;

    let ctx = cl.run_cycle(&mut hw, &mut sink);

    assert_eq!(ctx.mode, DriveMode::Error);
    assert_eq!(hw.indicators(), [true, true, true]);
}

#[test]
fn panic_is_not_latched() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.throttle1 = 0xA0;
    hw.throttle2 = 0x06;
    cl.run_cycle(&mut hw, &mut sink);

    hw.throttle1 = 0x50;
    hw.throttle2 = 0x50;
    let ctx = cl.run_cycle(&mut hw, &mut sink);

    assert!(!ctx.flags.panic);
    assert_eq!(hw.last_sent().unwrap().byte(message::SLOT_THROTTLE1), 45);
    assert_eq!(hw.indicators(), [false, false, false]);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::PanicEntered { deviation_pct: 100 },
            AppEvent::PanicCleared,
        ]
    );
}

// ── Frame / transport ─────────────────────────────────────────

#[test]
fn identical_inputs_give_identical_frames() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.brake_line = true;
    hw.selector = 700;

    cl.run_cycle(&mut hw, &mut sink);
    cl.run_cycle(&mut hw, &mut sink);

    let sent = hw.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[test]
fn sent_frame_decodes_to_the_cycle_outputs() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.estop_line = false;
    hw.selector = 500;

    let ctx = cl.run_cycle(&mut hw, &mut sink);
    let decoded = message::decode(&hw.last_sent().unwrap()).unwrap();

    assert_eq!(decoded.flags, ctx.flags);
    assert_eq!(decoded.mode, DriveMode::Skidpad);
    assert_eq!(decoded.throttle, ctx.commanded);
    assert_eq!(hw.last_sent().unwrap().byte(SLOT_RESERVED), 0);
}

#[test]
fn bus_errors_do_not_stop_the_loop() {
    let (mut cl, mut hw, mut sink) = make_loop();
    hw.bus_off = true;

    for _ in 0..5 {
        cl.run_cycle(&mut hw, &mut sink);
    }

    assert_eq!(hw.sent().len(), 5);
    assert_eq!(cl.cycle_count(), 5);
}

// ── Trigger ───────────────────────────────────────────────────

#[test]
fn coalesced_ticks_run_one_cycle() {
    let (mut cl, mut hw, mut sink) = make_loop();
    let trigger = CycleTrigger::new();

    assert!(trigger.signal());
    assert!(!trigger.signal());
    assert!(!trigger.signal());

    assert!(cl.poll(&trigger, &mut hw, &mut sink).is_some());
    assert!(cl.poll(&trigger, &mut hw, &mut sink).is_none());
    assert_eq!(hw.sent().len(), 1);
    assert_eq!(cl.coalesced_ticks(), 2);
}

#[test]
fn last_cycle_is_kept_for_inspection() {
    let (mut cl, mut hw, mut sink) = make_loop();
    assert!(cl.last_cycle().is_none());
    let ctx = cl.run_cycle(&mut hw, &mut sink);
    assert_eq!(cl.last_cycle(), Some(&ctx));
}
