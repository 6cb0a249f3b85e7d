//! Wrist gesture detection (Current only)
//!
//! Runs on the shared feature triad. Gesture and wake-up detection are two
//! bits of the same feature and report on the same source.

use super::{
    TRIAD_STEPS, Feature, FeatureDriver, feature_bits, source, triad_disable, triad_enable,
};
use crate::RegisterAddress;
use crate::capability::Capability;
use crate::command::{CommandError, TransactionPlan};
use crate::registers::ResolveCapability;

/// Which wrist detector to enable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WristGestureKind {
    /// Flick in/out, push/pivot gestures
    Gesture,
    /// Arm raised to look at the wrist
    WakeUp,
}

/// Wrist gesture settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WristConfig<'a> {
    /// Detector to enable
    pub kind: WristGestureKind,
    /// Raw parameter block for the detector
    pub parameters: &'a [u8],
}

/// Wrist gesture driver
#[derive(Debug, Clone, Copy, Default)]
pub struct WristGesture;

impl FeatureDriver for WristGesture {
    const FEATURE: Feature = Feature::WristGesture;

    type Config<'a> = WristConfig<'a>;

    fn enable_plan<R>(resolver: &R, config: WristConfig<'_>) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        let bit = match config.kind {
            WristGestureKind::Gesture => feature_bits::WRIST_GESTURE,
            WristGestureKind::WakeUp => feature_bits::WRIST_WAKEUP,
        };
        triad_enable(resolver, bit, config.parameters)
    }

    fn enable_steps<R>(_resolver: &R, _config: WristConfig<'_>) -> usize
    where
        R: ResolveCapability + ?Sized,
    {
        TRIAD_STEPS
    }

    fn disable_plan<R>(resolver: &R) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        triad_disable(resolver, feature_bits::WRIST)
    }

    fn notification<R>(
        resolver: &R,
        _config: WristConfig<'_>,
    ) -> Result<Option<RegisterAddress>, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        source(resolver, Capability::WristGestureInterrupt)
    }
}
