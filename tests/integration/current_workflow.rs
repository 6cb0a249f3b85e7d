//! Integration tests for a full session on a Current (BMI270-class) board

use crate::common::{MockTransport, Operation, ignore};
use bosch_accel_regmap::features::{
    Activity, ActivityConfig, Motion, MotionConfig, MotionDetection, Orientation,
    OrientationConfig, Sampling, SamplingConfig, StepConfig, StepCounter, Temperature,
    WristConfig, WristGesture, WristGestureKind,
};
use bosch_accel_regmap::{Capability, Error, Feature, SensorSession, Variant};

#[test]
fn test_full_current_workflow() {
    let transport = MockTransport::new();
    let mut session = SensorSession::from_implementation(transport.clone(), 4).unwrap();
    assert_eq!(session.variant(), Variant::Current);

    session.set_downsampling(&[0x88]).unwrap();
    session.write_offset([0, 0, -3]).unwrap();
    session
        .enable::<Sampling>(SamplingConfig::packed(&[0xA8, 0x01]), ignore)
        .unwrap();
    session.enable::<Temperature>((), ignore).unwrap();

    // Triad features write config, interrupt enable, enable; in that order
    transport.clear_operations();
    session
        .enable::<WristGesture>(
            WristConfig {
                kind: WristGestureKind::Gesture,
                parameters: &[0x01, 0x02],
            },
            ignore,
        )
        .unwrap();
    assert_eq!(
        transport.operations(),
        [
            Operation::Subscribe { address: 0x0A },
            Operation::Write {
                address: 0x08,
                data: vec![0x03, 0x01, 0x02],
            },
            Operation::Write {
                address: 0x07,
                data: vec![0x08, 0x00],
            },
            Operation::Write {
                address: 0x06,
                data: vec![0x08, 0x00],
            },
        ]
    );

    session
        .enable::<Activity>(ActivityConfig::default(), ignore)
        .unwrap();
    session.start().unwrap();
    assert_eq!(transport.register(0x06), Some(vec![0x20, 0x00]));

    for address in [0x05, 0x0A, 0x0C, 0x0D] {
        assert!(transport.is_subscribed(address), "{address:#04x}");
    }
    assert!(transport.deliver(0x0A, &[0x01]));

    transport.set_register(0x0F, &[0xF0, 0xFF]);
    assert_eq!(session.read_temperature().unwrap(), -16);

    // Legacy-only features
    transport.clear_operations();
    assert_eq!(
        session.enable::<StepCounter>(StepConfig::detector(&[0x15, 0x03]), ignore),
        Err(Error::UnsupportedCapability(Capability::StepDetectorConfig))
    );
    assert_eq!(
        session.enable::<Orientation>(OrientationConfig::default(), ignore),
        Err(Error::UnsupportedCapability(Capability::OrientationConfig))
    );
    assert!(transport.operations().is_empty());

    session.disable::<WristGesture>().unwrap();
    assert_eq!(transport.register(0x06), Some(vec![0x00, 0x18]));
    assert_eq!(transport.register(0x07), Some(vec![0x00, 0x18]));
    assert!(!transport.is_subscribed(0x0A));
    assert!(session.is_enabled(Feature::Activity));
    assert!(session.is_enabled(Feature::Temperature));

    session.disable::<Temperature>().unwrap();
    assert_eq!(transport.register(0x0E), Some(vec![0x00]));
}

#[test]
fn test_motion_kinds_map_to_feature_bits() {
    for (detection, bit) in [
        (MotionDetection::Any, 0x01),
        (MotionDetection::No, 0x02),
        (MotionDetection::Significant, 0x04),
    ] {
        let transport = MockTransport::new();
        let mut session = SensorSession::new(transport.clone(), Variant::Current);

        session
            .enable::<Motion>(MotionConfig::new(detection, &[0x10]), ignore)
            .unwrap();

        assert_eq!(transport.register(0x07), Some(vec![bit, 0x00]));
        assert_eq!(transport.register(0x06), Some(vec![bit, 0x00]));
    }
}
