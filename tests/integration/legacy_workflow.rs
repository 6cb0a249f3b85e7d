//! Integration tests for a full session on a Legacy (BMI160-class) board

use crate::common::{MockTransport, Operation};
use bosch_accel_regmap::features::{
    Motion, MotionConfig, MotionDetection, Orientation, OrientationConfig, Sampling,
    SamplingConfig, StepConfig, StepCounter, Tap, TapConfig, TapDetection, Temperature,
    WristConfig, WristGesture, WristGestureKind,
};
use bosch_accel_regmap::{Capability, Error, Feature, FeatureState, SensorSession, Variant};
use std::sync::atomic::{AtomicUsize, Ordering};

static SAMPLES: AtomicUsize = AtomicUsize::new(0);
static TAPS: AtomicUsize = AtomicUsize::new(0);
static STEPS: AtomicUsize = AtomicUsize::new(0);

fn on_sample(_payload: &[u8]) {
    SAMPLES.fetch_add(1, Ordering::SeqCst);
}

fn on_tap(_payload: &[u8]) {
    TAPS.fetch_add(1, Ordering::SeqCst);
}

fn on_step(_payload: &[u8]) {
    STEPS.fetch_add(1, Ordering::SeqCst);
}

fn on_other(_payload: &[u8]) {}

#[test]
fn test_full_legacy_workflow() {
    let transport = MockTransport::new();
    let mut session = SensorSession::from_implementation(transport.clone(), 1).unwrap();
    assert_eq!(session.variant(), Variant::Legacy);

    // Configure
    session
        .enable::<Sampling>(SamplingConfig::single(&[0x28, 0x03]), on_sample)
        .unwrap();
    session
        .enable::<Tap>(TapConfig::new(TapDetection::Both, &[0x04, 0x0A]), on_tap)
        .unwrap();
    session
        .enable::<Orientation>(
            OrientationConfig {
                parameters: &[0x18, 0x48],
            },
            on_other,
        )
        .unwrap();
    session
        .enable::<StepCounter>(StepConfig::detector(&[0x15, 0x03]), on_step)
        .unwrap();
    session
        .enable::<Motion>(
            MotionConfig::new(MotionDetection::Any, &[0x02, 0x14]),
            on_other,
        )
        .unwrap();
    session.start().unwrap();

    for feature in [
        Feature::Sampling,
        Feature::Tap,
        Feature::Orientation,
        Feature::StepCounter,
        Feature::Motion,
    ] {
        assert_eq!(session.state(feature), FeatureState::Enabled, "{feature:?}");
    }

    // Events arrive on the Legacy source addresses
    assert!(transport.deliver(0x04, &[0; 6]));
    assert!(transport.deliver(0x04, &[0; 6]));
    assert!(transport.deliver(0x0E, &[0x02]));
    assert!(transport.deliver(0x19, &[]));
    assert_eq!(SAMPLES.load(Ordering::SeqCst), 2);
    assert_eq!(TAPS.load(Ordering::SeqCst), 1);
    assert_eq!(STEPS.load(Ordering::SeqCst), 1);

    transport.set_register(0x1A, &[0x2A, 0x00]);
    assert_eq!(session.read_step_count().unwrap(), 42);
    session.reset_step_counter().unwrap();

    // Features the chip lacks fail without touching the bus
    transport.clear_operations();
    assert_eq!(
        session.enable::<Temperature>((), on_other),
        Err(Error::UnsupportedCapability(Capability::TemperatureEnable))
    );
    assert!(
        session
            .enable::<WristGesture>(
                WristConfig {
                    kind: WristGestureKind::Gesture,
                    parameters: &[],
                },
                on_other,
            )
            .is_err()
    );
    assert!(transport.operations().is_empty());

    // Tear down
    session.stop().unwrap();
    session.disable::<Motion>().unwrap();
    session.disable::<StepCounter>().unwrap();
    session.disable::<Orientation>().unwrap();
    session.disable::<Tap>().unwrap();
    session.disable::<Sampling>().unwrap();

    assert_eq!(transport.register(0x09), Some(vec![0x00, 0x7F]));
    assert_eq!(transport.register(0x0C), Some(vec![0x00, 0x03]));
    assert_eq!(transport.register(0x0F), Some(vec![0x00, 0x01]));
    assert_eq!(transport.register(0x17), Some(vec![0x00, 0x01]));
    assert_eq!(transport.register(0x02), Some(vec![0x00, 0x01]));

    for address in [0x04, 0x0B, 0x0E, 0x11, 0x19] {
        assert!(!transport.is_subscribed(address), "{address:#04x}");
    }
    for feature in [Feature::Sampling, Feature::Tap, Feature::StepCounter] {
        assert_eq!(session.state(feature), FeatureState::Disabled);
    }

    let unsubscribes = transport
        .operations()
        .iter()
        .filter(|op| matches!(op, Operation::Unsubscribe { .. }))
        .count();
    assert_eq!(unsubscribes, 5);

    let _transport = session.release();
}
