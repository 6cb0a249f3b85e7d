//! Orientation detection (Legacy only)

use super::{
    DEDICATED_STEPS, Feature, FeatureDriver, dedicated_disable, dedicated_enable, source,
};
use crate::RegisterAddress;
use crate::capability::Capability;
use crate::command::{CommandError, TransactionPlan};
use crate::registers::ResolveCapability;

const ORIENTATION_ENABLE: u8 = 0x01;

/// Orientation detection settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrientationConfig<'a> {
    /// Raw mode/hysteresis block
    pub parameters: &'a [u8],
}

/// Orientation detection driver
#[derive(Debug, Clone, Copy, Default)]
pub struct Orientation;

impl FeatureDriver for Orientation {
    const FEATURE: Feature = Feature::Orientation;

    type Config<'a> = OrientationConfig<'a>;

    fn enable_plan<R>(
        resolver: &R,
        config: OrientationConfig<'_>,
    ) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        dedicated_enable(
            resolver,
            Capability::OrientationConfig,
            Capability::OrientationInterruptEnable,
            config.parameters,
            ORIENTATION_ENABLE,
        )
    }

    fn enable_steps<R>(_resolver: &R, _config: OrientationConfig<'_>) -> usize
    where
        R: ResolveCapability + ?Sized,
    {
        DEDICATED_STEPS
    }

    fn disable_plan<R>(resolver: &R) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        dedicated_disable(
            resolver,
            Capability::OrientationInterruptEnable,
            ORIENTATION_ENABLE,
        )
    }

    fn notification<R>(
        resolver: &R,
        _config: OrientationConfig<'_>,
    ) -> Result<Option<RegisterAddress>, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        source(resolver, Capability::OrientationInterrupt)
    }
}
