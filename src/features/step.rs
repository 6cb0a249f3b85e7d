//! Step detector and step counter (Legacy only)
//!
//! Both modes share one configuration register. Detector mode additionally
//! enables the step interrupt and reports each step on
//! [`Capability::StepDetectorInterrupt`]; counter mode is polled through the
//! session's `read_step_count`.
//!
//! The Current variant has no step detector or counter registers, so every
//! plan here fails with [`CommandError::UnsupportedCapability`] there.

use super::{DEDICATED_STEPS, Feature, FeatureDriver, dedicated_disable, source};
use crate::RegisterAddress;
use crate::capability::Capability;
use crate::command::{self, CommandError, Request, TransactionPlan};
use crate::registers::ResolveCapability;

const STEP_DETECTOR_ENABLE: u8 = 0x01;

/// How steps are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepMode {
    /// Interrupt on every detected step
    Detector,
    /// Accumulate steps in the counter register
    Counter,
}

/// Step detector/counter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepConfig<'a> {
    /// Reporting mode
    pub mode: StepMode,
    /// Raw step configuration block, including the counter enable bit
    pub parameters: &'a [u8],
}

impl<'a> StepConfig<'a> {
    /// Detector mode settings
    #[must_use]
    pub const fn detector(parameters: &'a [u8]) -> Self {
        Self {
            mode: StepMode::Detector,
            parameters,
        }
    }

    /// Counter mode settings
    #[must_use]
    pub const fn counter(parameters: &'a [u8]) -> Self {
        Self {
            mode: StepMode::Counter,
            parameters,
        }
    }
}

/// Step detector/counter driver
#[derive(Debug, Clone, Copy, Default)]
pub struct StepCounter;

impl FeatureDriver for StepCounter {
    const FEATURE: Feature = Feature::StepCounter;

    type Config<'a> = StepConfig<'a>;

    fn enable_plan<R>(resolver: &R, config: StepConfig<'_>) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        match config.mode {
            StepMode::Detector => command::build(
                resolver,
                &[
                    Request::write(Capability::StepDetectorConfig, config.parameters),
                    Request::write(
                        Capability::StepDetectorInterruptEnable,
                        &[STEP_DETECTOR_ENABLE, 0x00],
                    ),
                ],
            ),
            StepMode::Counter => command::build(
                resolver,
                &[Request::write(
                    Capability::StepDetectorConfig,
                    config.parameters,
                )],
            ),
        }
    }

    fn enable_steps<R>(_resolver: &R, config: StepConfig<'_>) -> usize
    where
        R: ResolveCapability + ?Sized,
    {
        match config.mode {
            StepMode::Detector => DEDICATED_STEPS,
            StepMode::Counter => 1,
        }
    }

    /// Clears the step interrupt. The counter's own enable bit lives in the
    /// caller's configuration block and is left as written.
    fn disable_plan<R>(resolver: &R) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        dedicated_disable(
            resolver,
            Capability::StepDetectorInterruptEnable,
            STEP_DETECTOR_ENABLE,
        )
    }

    fn notification<R>(
        resolver: &R,
        config: StepConfig<'_>,
    ) -> Result<Option<RegisterAddress>, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        match config.mode {
            StepMode::Detector => source(resolver, Capability::StepDetectorInterrupt),
            StepMode::Counter => Ok(None),
        }
    }
}
