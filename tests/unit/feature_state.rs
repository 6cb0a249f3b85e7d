//! Unit tests for the per-feature state machine and failure rollback

use crate::common::{MockError, Operation, create_session, ignore};
use bosch_accel_regmap::features::{
    Motion, MotionConfig, MotionDetection, Sampling, SamplingConfig, StepConfig, StepCounter, Tap,
    TapConfig, TapDetection,
};
use bosch_accel_regmap::{Capability, Error, Feature, FeatureState, Variant};

const MOTION: MotionConfig<'static> = MotionConfig::new(MotionDetection::Any, &[0x02, 0x14]);

#[test]
fn test_enable_motion_legacy() {
    let (mut session, transport) = create_session(Variant::Legacy);

    session.enable::<Motion>(MOTION, ignore).unwrap();

    assert_eq!(session.state(Feature::Motion), FeatureState::Enabled);
    assert!(!session.partially_applied(Feature::Motion));
    assert_eq!(session.subscription(Feature::Motion), Some(0x0B));
    assert_eq!(
        transport.operations(),
        [
            Operation::Subscribe { address: 0x0B },
            Operation::Write {
                address: 0x0A,
                data: vec![0x02, 0x14],
            },
            Operation::Write {
                address: 0x09,
                data: vec![0x07, 0x00],
            },
        ]
    );
}

#[test]
fn test_enable_motion_current_uses_triad() {
    let (mut session, transport) = create_session(Variant::Current);

    session.enable::<Motion>(MOTION, ignore).unwrap();

    assert!(session.is_enabled(Feature::Motion));
    assert_eq!(transport.written_addresses(), [0x08, 0x07, 0x06]);
    assert_eq!(transport.register(0x08), Some(vec![0x00, 0x02, 0x14]));
    assert_eq!(transport.register(0x06), Some(vec![0x01, 0x00]));
}

#[test]
fn test_failure_mid_plan_rolls_back() {
    let (mut session, transport) = create_session(Variant::Current);
    transport.fail_write_at(1);

    let result = session.enable::<Motion>(MOTION, ignore);

    assert_eq!(result, Err(Error::Transport(MockError::Communication)));
    assert_eq!(session.state(Feature::Motion), FeatureState::Disabled);
    assert!(session.partially_applied(Feature::Motion));
    assert_eq!(session.subscription(Feature::Motion), None);

    // Step 3 was never attempted
    assert_eq!(transport.write_attempts(), 2);
    assert_eq!(
        transport.operations(),
        [
            Operation::Subscribe { address: 0x09 },
            Operation::Write {
                address: 0x08,
                data: vec![0x00, 0x02, 0x14],
            },
            Operation::Unsubscribe { address: 0x09 },
        ]
    );
    assert!(!transport.is_subscribed(0x09));
}

#[test]
fn test_failure_on_first_step_not_partial() {
    let (mut session, transport) = create_session(Variant::Legacy);
    transport.fail_write_at(0);

    assert!(session.enable::<Motion>(MOTION, ignore).is_err());
    assert_eq!(session.state(Feature::Motion), FeatureState::Disabled);
    assert!(!session.partially_applied(Feature::Motion));
    assert!(transport.written_addresses().is_empty());
}

#[test]
fn test_unsubscribe_failure_during_rollback_keeps_step_error() {
    let (mut session, transport) = create_session(Variant::Legacy);
    transport.fail_write_at(1);
    transport.fail_next_unsubscribe();

    let result = session.enable::<Motion>(MOTION, ignore);

    assert_eq!(result, Err(Error::Transport(MockError::Communication)));
    assert_eq!(session.state(Feature::Motion), FeatureState::Disabled);
}

#[test]
fn test_subscribe_failure_sends_nothing() {
    let (mut session, transport) = create_session(Variant::Legacy);
    transport.fail_next_subscribe();

    let result = session.enable::<Motion>(MOTION, ignore);

    assert_eq!(result, Err(Error::Transport(MockError::Communication)));
    assert_eq!(session.state(Feature::Motion), FeatureState::Disabled);
    assert!(!session.partially_applied(Feature::Motion));
    assert_eq!(transport.write_attempts(), 0);
}

#[test]
fn test_subscribe_failure_on_reenable_releases_old_handler() {
    let (mut session, transport) = create_session(Variant::Legacy);
    let config = SamplingConfig::single(&[0x28, 0x03]);
    session.enable::<Sampling>(config, ignore).unwrap();
    transport.clear_operations();
    transport.fail_next_subscribe();

    let result = session.enable::<Sampling>(config, ignore);

    assert_eq!(result, Err(Error::Transport(MockError::Communication)));
    assert_eq!(session.state(Feature::Sampling), FeatureState::Disabled);
    assert!(!session.partially_applied(Feature::Sampling));
    assert_eq!(session.subscription(Feature::Sampling), None);
    assert!(!transport.is_subscribed(0x04));
    assert!(!transport.deliver(0x04, &[0; 6]));
    assert_eq!(
        transport.operations(),
        [Operation::Unsubscribe { address: 0x04 }]
    );

    // Recovers on the next attempt
    session.enable::<Sampling>(config, ignore).unwrap();
    assert!(transport.is_subscribed(0x04));
}

#[test]
fn test_unsupported_feature_issues_no_io() {
    let (mut session, transport) = create_session(Variant::Current);

    let result = session.enable::<Tap>(TapConfig::new(TapDetection::Single, &[0x04]), ignore);

    assert_eq!(
        result,
        Err(Error::UnsupportedCapability(Capability::TapConfig))
    );
    assert_eq!(session.state(Feature::Tap), FeatureState::Disabled);
    assert!(transport.operations().is_empty());
}

#[test]
fn test_step_counter_unsupported_on_current() {
    let (mut session, transport) = create_session(Variant::Current);

    let result = session.enable::<StepCounter>(StepConfig::counter(&[0x15, 0x0B]), ignore);

    assert_eq!(
        result,
        Err(Error::UnsupportedCapability(Capability::StepDetectorConfig))
    );
    assert!(transport.operations().is_empty());
}

#[test]
fn test_unsupported_leaves_enabled_state_untouched() {
    let (mut session, transport) = create_session(Variant::Legacy);
    session.enable::<Motion>(MOTION, ignore).unwrap();
    transport.clear_operations();

    let too_long = [0u8; 32];
    let result = session.enable::<Motion>(MotionConfig::new(MotionDetection::No, &too_long), ignore);

    assert_eq!(
        result,
        Err(Error::PayloadTooLong {
            capability: Capability::MotionConfig,
            len: 32,
        })
    );
    assert_eq!(session.state(Feature::Motion), FeatureState::Enabled);
    assert!(transport.operations().is_empty());
}

#[test]
fn test_disable_clears_and_unsubscribes() {
    let (mut session, transport) = create_session(Variant::Current);
    session.enable::<Motion>(MOTION, ignore).unwrap();
    transport.clear_operations();

    session.disable::<Motion>().unwrap();

    assert_eq!(session.state(Feature::Motion), FeatureState::Disabled);
    assert_eq!(session.subscription(Feature::Motion), None);
    assert_eq!(
        transport.operations(),
        [
            Operation::Write {
                address: 0x06,
                data: vec![0x00, 0x07],
            },
            Operation::Write {
                address: 0x07,
                data: vec![0x00, 0x07],
            },
            Operation::Unsubscribe { address: 0x09 },
        ]
    );
}

#[test]
fn test_failed_disable_keeps_feature_enabled() {
    let (mut session, transport) = create_session(Variant::Legacy);
    session.enable::<Motion>(MOTION, ignore).unwrap();
    transport.fail_write_at(0);

    assert!(session.disable::<Motion>().is_err());
    assert_eq!(session.state(Feature::Motion), FeatureState::Enabled);
    assert!(transport.is_subscribed(0x0B));

    // Retry succeeds
    session.disable::<Motion>().unwrap();
    assert_eq!(session.state(Feature::Motion), FeatureState::Disabled);
    assert!(!transport.is_subscribed(0x0B));
}

#[test]
fn test_reenable_after_partial_failure() {
    let (mut session, transport) = create_session(Variant::Current);
    transport.fail_write_at(2);
    assert!(session.enable::<Motion>(MOTION, ignore).is_err());
    assert!(session.partially_applied(Feature::Motion));

    session.enable::<Motion>(MOTION, ignore).unwrap();

    assert!(session.is_enabled(Feature::Motion));
    assert!(!session.partially_applied(Feature::Motion));
}

#[test]
fn test_reconfigure_moves_subscription() {
    let (mut session, transport) = create_session(Variant::Legacy);
    session
        .enable::<Sampling>(SamplingConfig::single(&[0x28, 0x03]), ignore)
        .unwrap();
    assert!(transport.is_subscribed(0x04));

    session
        .enable::<Sampling>(SamplingConfig::packed(&[0x28, 0x03]), ignore)
        .unwrap();

    assert!(!transport.is_subscribed(0x04));
    assert!(transport.is_subscribed(0x1C));
    assert_eq!(session.subscription(Feature::Sampling), Some(0x1C));
}

#[test]
fn test_features_are_independent() {
    let (mut session, transport) = create_session(Variant::Legacy);
    session.enable::<Motion>(MOTION, ignore).unwrap();

    transport.fail_write_at(0);
    assert!(
        session
            .enable::<Tap>(TapConfig::new(TapDetection::Both, &[0x04]), ignore)
            .is_err()
    );

    assert_eq!(session.state(Feature::Motion), FeatureState::Enabled);
    assert_eq!(session.state(Feature::Tap), FeatureState::Disabled);
    for feature in [Feature::Sampling, Feature::Orientation, Feature::StepCounter] {
        assert_eq!(session.state(feature), FeatureState::Disabled);
    }
}
