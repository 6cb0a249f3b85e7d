//! Acceleration data sampling
//!
//! Enabling sampling writes the data configuration (rate and range, opaque
//! here) and then sets the data interrupt enable. Samples arrive on
//! [`Capability::DataInterrupt`], or on [`Capability::PackedAccData`] when
//! packed mode is requested. The accelerometer itself is started and
//! stopped separately with the session's `start`/`stop`.

use super::{DEDICATED_STEPS, Feature, FeatureDriver, source};
use crate::RegisterAddress;
use crate::capability::Capability;
use crate::command::{self, CommandError, Request, TransactionPlan};
use crate::registers::ResolveCapability;

/// Sampling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplingConfig<'a> {
    /// Deliver three samples per notification
    pub packed: bool,
    /// Raw data configuration block (output data rate, range)
    pub data_config: &'a [u8],
}

impl<'a> SamplingConfig<'a> {
    /// One sample per notification
    #[must_use]
    pub const fn single(data_config: &'a [u8]) -> Self {
        Self {
            packed: false,
            data_config,
        }
    }

    /// Three samples per notification
    #[must_use]
    pub const fn packed(data_config: &'a [u8]) -> Self {
        Self {
            packed: true,
            data_config,
        }
    }
}

/// Acceleration sampling driver
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampling;

impl FeatureDriver for Sampling {
    const FEATURE: Feature = Feature::Sampling;

    type Config<'a> = SamplingConfig<'a>;

    fn enable_plan<R>(resolver: &R, config: SamplingConfig<'_>) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        command::build(
            resolver,
            &[
                Request::write(Capability::DataConfig, config.data_config),
                Request::write(Capability::DataInterruptEnable, &[0x01, 0x00]),
            ],
        )
    }

    fn enable_steps<R>(_resolver: &R, _config: SamplingConfig<'_>) -> usize
    where
        R: ResolveCapability + ?Sized,
    {
        DEDICATED_STEPS
    }

    fn disable_plan<R>(resolver: &R) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        command::build(
            resolver,
            &[Request::write(Capability::DataInterruptEnable, &[0x00, 0x01])],
        )
    }

    fn notification<R>(
        resolver: &R,
        config: SamplingConfig<'_>,
    ) -> Result<Option<RegisterAddress>, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        if config.packed {
            source(resolver, Capability::PackedAccData)
        } else {
            source(resolver, Capability::DataInterrupt)
        }
    }
}
