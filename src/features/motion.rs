//! Motion detection
//!
//! Legacy boards have dedicated motion registers: the configuration block is
//! written first, then the detection kind is set in the motion interrupt
//! enable. Current boards run motion detection as a firmware feature and
//! use the shared feature config/interrupt-enable/enable triad. Both report
//! events on [`Capability::MotionInterrupt`], which sits at a different
//! address on each variant.
//!
//! # Example
//!
//! ```ignore
//! # use bosch_accel_regmap::features::{Motion, MotionConfig, MotionDetection};
//! # let mut session: bosch_accel_regmap::SensorSession<_> = todo!();
//! fn on_motion(payload: &[u8]) { /* decode downstream */ }
//!
//! session.enable::<Motion>(
//!     MotionConfig::new(MotionDetection::Any, &[0x02, 0x14]),
//!     on_motion,
//! )?;
//! ```

use super::{
    DEDICATED_STEPS, Feature, FeatureDriver, TRIAD_STEPS, dedicated_disable, dedicated_enable,
    feature_bits, source, triad_disable, triad_enable,
};
use crate::RegisterAddress;
use crate::capability::Capability;
use crate::command::{CommandError, TransactionPlan};
use crate::registers::ResolveCapability;

/// Motion interrupt enable bits on Legacy boards
const LEGACY_ANY_MOTION: u8 = 0x07;
const LEGACY_NO_MOTION: u8 = 0x38;
const LEGACY_SIGNIFICANT_MOTION: u8 = 0x40;
const LEGACY_ALL: u8 = LEGACY_ANY_MOTION | LEGACY_NO_MOTION | LEGACY_SIGNIFICANT_MOTION;

/// Kind of motion to detect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionDetection {
    /// Acceleration slope above a threshold
    Any,
    /// Acceleration slope below a threshold for a duration
    No,
    /// Sustained motion indicating a change of location
    Significant,
}

impl MotionDetection {
    const fn legacy_mask(self) -> u8 {
        match self {
            Self::Any => LEGACY_ANY_MOTION,
            Self::No => LEGACY_NO_MOTION,
            Self::Significant => LEGACY_SIGNIFICANT_MOTION,
        }
    }

    const fn feature_bit(self) -> u8 {
        match self {
            Self::Any => feature_bits::ANY_MOTION,
            Self::No => feature_bits::NO_MOTION,
            Self::Significant => feature_bits::SIGNIFICANT_MOTION,
        }
    }
}

/// Motion detection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionConfig<'a> {
    /// Which detector to enable
    pub detection: MotionDetection,
    /// Raw threshold/duration block for the detector
    pub parameters: &'a [u8],
}

impl<'a> MotionConfig<'a> {
    /// Create motion settings
    #[must_use]
    pub const fn new(detection: MotionDetection, parameters: &'a [u8]) -> Self {
        Self {
            detection,
            parameters,
        }
    }
}

/// Motion detection driver
#[derive(Debug, Clone, Copy, Default)]
pub struct Motion;

impl FeatureDriver for Motion {
    const FEATURE: Feature = Feature::Motion;

    type Config<'a> = MotionConfig<'a>;

    fn enable_plan<R>(resolver: &R, config: MotionConfig<'_>) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        if resolver.supports(Capability::MotionInterruptEnable) {
            dedicated_enable(
                resolver,
                Capability::MotionConfig,
                Capability::MotionInterruptEnable,
                config.parameters,
                config.detection.legacy_mask(),
            )
        } else {
            triad_enable(resolver, config.detection.feature_bit(), config.parameters)
        }
    }

    fn enable_steps<R>(resolver: &R, _config: MotionConfig<'_>) -> usize
    where
        R: ResolveCapability + ?Sized,
    {
        if resolver.supports(Capability::MotionInterruptEnable) {
            DEDICATED_STEPS
        } else {
            TRIAD_STEPS
        }
    }

    fn disable_plan<R>(resolver: &R) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        if resolver.supports(Capability::MotionInterruptEnable) {
            dedicated_disable(resolver, Capability::MotionInterruptEnable, LEGACY_ALL)
        } else {
            triad_disable(resolver, feature_bits::MOTION)
        }
    }

    fn notification<R>(
        resolver: &R,
        _config: MotionConfig<'_>,
    ) -> Result<Option<RegisterAddress>, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        source(resolver, Capability::MotionInterrupt)
    }
}
