//! Unit tests for notification routing

use crate::common::create_session;
use bosch_accel_regmap::Variant;
use bosch_accel_regmap::features::{
    Activity, ActivityConfig, Motion, MotionConfig, MotionDetection, StepConfig, StepCounter,
    Temperature,
};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

static LEGACY_MOTION_EVENTS: AtomicUsize = AtomicUsize::new(0);
static CURRENT_MOTION_EVENTS: AtomicUsize = AtomicUsize::new(0);
static DISABLED_EVENTS: AtomicUsize = AtomicUsize::new(0);
static LAST_ACTIVITY: AtomicU8 = AtomicU8::new(0);

fn count_legacy_motion(_payload: &[u8]) {
    LEGACY_MOTION_EVENTS.fetch_add(1, Ordering::SeqCst);
}

fn count_current_motion(_payload: &[u8]) {
    CURRENT_MOTION_EVENTS.fetch_add(1, Ordering::SeqCst);
}

fn count_disabled(_payload: &[u8]) {
    DISABLED_EVENTS.fetch_add(1, Ordering::SeqCst);
}

fn record_activity(payload: &[u8]) {
    LAST_ACTIVITY.store(payload[0], Ordering::SeqCst);
}

#[test]
fn test_motion_routed_by_variant_address() {
    let config = MotionConfig::new(MotionDetection::Significant, &[0x01]);

    let (mut legacy, legacy_transport) = create_session(Variant::Legacy);
    legacy.enable::<Motion>(config, count_legacy_motion).unwrap();

    // 0x09 is the motion interrupt enable on Legacy, not a source
    assert!(!legacy_transport.deliver(0x09, &[0x01]));
    assert!(legacy_transport.deliver(0x0B, &[0x01]));
    assert_eq!(LEGACY_MOTION_EVENTS.load(Ordering::SeqCst), 1);

    let (mut current, current_transport) = create_session(Variant::Current);
    current.enable::<Motion>(config, count_current_motion).unwrap();

    assert!(current_transport.deliver(0x09, &[0x01]));
    assert!(current_transport.deliver(0x09, &[0x02]));
    assert_eq!(CURRENT_MOTION_EVENTS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_payload_reaches_handler_unchanged() {
    let (mut session, transport) = create_session(Variant::Current);
    session
        .enable::<Activity>(ActivityConfig::default(), record_activity)
        .unwrap();

    assert!(transport.deliver(0x0C, &[0x03, 0x00]));
    assert_eq!(LAST_ACTIVITY.load(Ordering::SeqCst), 0x03);
}

#[test]
fn test_no_delivery_after_disable() {
    let (mut session, transport) = create_session(Variant::Current);
    session.enable::<Temperature>((), count_disabled).unwrap();
    assert!(transport.deliver(0x0D, &[0x19]));

    session.disable::<Temperature>().unwrap();

    assert!(!transport.deliver(0x0D, &[0x19]));
    assert_eq!(DISABLED_EVENTS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_counter_mode_has_no_subscription() {
    let (mut session, transport) = create_session(Variant::Legacy);
    session
        .enable::<StepCounter>(StepConfig::counter(&[0x15, 0x0B]), count_disabled)
        .unwrap();

    assert_eq!(session.subscription(bosch_accel_regmap::Feature::StepCounter), None);
    assert!(!transport.is_subscribed(0x19));
    assert_eq!(transport.written_addresses(), [0x18]);
}
