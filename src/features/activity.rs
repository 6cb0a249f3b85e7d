//! Activity recognition (Current only)

use super::{
    TRIAD_STEPS, Feature, FeatureDriver, feature_bits, source, triad_disable, triad_enable,
};
use crate::RegisterAddress;
use crate::capability::Capability;
use crate::command::{CommandError, TransactionPlan};
use crate::registers::ResolveCapability;

/// Activity recognition settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActivityConfig<'a> {
    /// Raw parameter block
    pub parameters: &'a [u8],
}

/// Activity recognition driver
#[derive(Debug, Clone, Copy, Default)]
pub struct Activity;

impl FeatureDriver for Activity {
    const FEATURE: Feature = Feature::Activity;

    type Config<'a> = ActivityConfig<'a>;

    fn enable_plan<R>(resolver: &R, config: ActivityConfig<'_>) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        triad_enable(resolver, feature_bits::ACTIVITY, config.parameters)
    }

    fn enable_steps<R>(_resolver: &R, _config: ActivityConfig<'_>) -> usize
    where
        R: ResolveCapability + ?Sized,
    {
        TRIAD_STEPS
    }

    fn disable_plan<R>(resolver: &R) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        triad_disable(resolver, feature_bits::ACTIVITY)
    }

    fn notification<R>(
        resolver: &R,
        _config: ActivityConfig<'_>,
    ) -> Result<Option<RegisterAddress>, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        source(resolver, Capability::ActivityInterrupt)
    }
}
