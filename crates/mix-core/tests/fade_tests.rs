// Fade state machine and the cancel-then-schedule parameter wrapper.

use mix_core::offline::{OfflineHost, ParamEvent};
use mix_core::scheduler::{Ramp, ScheduledParam};
use mix_core::{AudioGraphHost, FadePhase, FadeState, GainWrite};

#[test]
fn fade_state_starts_idle_and_writes_directly() {
    let fade = FadeState::default();
    assert!(fade.is_idle());
    assert_eq!(fade.gain_write(10.0), GainWrite::Direct);
}

#[test]
fn fading_out_blocks_gain_writes_until_deadline() {
    let mut fade = FadeState::default();
    fade.fade_out(1.0, 0.5);
    assert_eq!(fade.gain_write(1.2), GainWrite::Skip);
    assert_eq!(fade.settle(1.4), None);
    assert_eq!(fade.settle(1.5), Some(FadePhase::FadingOut));
    assert!(fade.is_idle());
    assert_eq!(fade.gain_write(1.6), GainWrite::Direct);
}

#[test]
fn fading_in_ramps_toward_the_deadline() {
    let mut fade = FadeState::default();
    fade.fade_in(2.0, 1.0);
    assert_eq!(fade.gain_write(2.5), GainWrite::RampUntil(3.0));
    assert_eq!(fade.settle(3.0), Some(FadePhase::FadingIn));
    assert_eq!(fade.settle(3.5), None);
}

#[test]
fn new_fade_replaces_running_one() {
    let mut fade = FadeState::default();
    fade.fade_in(0.0, 1.0);
    fade.fade_out(0.4, 0.5);
    assert_eq!(fade.phase, FadePhase::FadingOut);
    assert_eq!(fade.deadline, 0.9);
}

#[test]
fn negative_duration_completes_immediately() {
    let mut fade = FadeState::default();
    fade.fade_out(4.0, -1.0);
    assert_eq!(fade.settle(4.0), Some(FadePhase::FadingOut));
}

#[test]
fn ramp_interpolates_linearly() {
    let r = Ramp {
        from: 0.0,
        to: 1.0,
        start: 1.0,
        end: 3.0,
    };
    assert_eq!(r.value_at(0.0), 0.0);
    assert_eq!(r.value_at(2.0), 0.5);
    assert_eq!(r.value_at(9.0), 1.0);
}

#[test]
fn rescheduling_leaves_a_single_ramp_pending() {
    let mut host = OfflineHost::new();
    let node = host.create_gain(0.0).unwrap();
    let mut param = ScheduledParam::new(node, 0.0);

    param.schedule_ramp(&mut host, 0.0, 1.0, 0.0, 1.0).unwrap();
    host.advance(0.25);
    let from = param.value_at(0.25);
    assert!((from - 0.25).abs() < 1e-6);
    param.schedule_ramp(&mut host, from, 0.5, 0.25, 0.75).unwrap();

    let timeline = host.timeline(node).unwrap();
    assert_eq!(timeline.pending_ramps(0.25), 1);
    assert!((timeline.value_at(0.5) - 0.375).abs() < 1e-6);
    assert!((param.value_at(0.5) - 0.375).abs() < 1e-6);
    assert_eq!(param.active_ramp(0.5).map(|r| r.end), Some(0.75));
    assert!(param.active_ramp(0.8).is_none());
}

#[test]
fn direct_write_cancels_pending_ramp() {
    let mut host = OfflineHost::new();
    let node = host.create_gain(0.0).unwrap();
    let mut param = ScheduledParam::new(node, 0.0);
    param.schedule_ramp(&mut host, 0.0, 1.0, 0.0, 2.0).unwrap();
    host.advance(0.5);
    param.write(&mut host, 0.3, 0.5).unwrap();

    let timeline = host.timeline(node).unwrap();
    assert_eq!(timeline.pending_ramps(0.5), 0);
    assert_eq!(host.value_at(node, 1.5), Some(0.3));
    assert!(matches!(
        timeline.events().last(),
        Some(ParamEvent::SetValue { value, .. }) if *value == 0.3
    ));
}

#[test]
fn failed_schedule_keeps_last_mirror() {
    let mut host = OfflineHost::new();
    let node = host.create_gain(0.4).unwrap();
    let mut param = ScheduledParam::new(node, 0.4);
    host.break_node(node);
    assert!(param.write(&mut host, 0.9, 0.0).is_err());
    assert_eq!(param.value_at(0.0), 0.4);
}
