//! Temperature sensor (Current only)

use super::{Feature, FeatureDriver, source};
use crate::RegisterAddress;
use crate::capability::Capability;
use crate::command::{self, CommandError, Request, TransactionPlan};
use crate::registers::ResolveCapability;

/// Temperature sensor driver
///
/// Takes no settings; enabling turns the on-chip sensor on and routes
/// [`Capability::TemperatureInterrupt`] events to the handler. Single
/// readings go through the session's `read_temperature`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Temperature;

impl FeatureDriver for Temperature {
    const FEATURE: Feature = Feature::Temperature;

    type Config<'a> = ();

    fn enable_plan<R>(resolver: &R, _config: ()) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        command::build(
            resolver,
            &[Request::write(Capability::TemperatureEnable, &[0x01])],
        )
    }

    fn enable_steps<R>(_resolver: &R, _config: ()) -> usize
    where
        R: ResolveCapability + ?Sized,
    {
        1
    }

    fn disable_plan<R>(resolver: &R) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        command::build(
            resolver,
            &[Request::write(Capability::TemperatureEnable, &[0x00])],
        )
    }

    fn notification<R>(resolver: &R, _config: ()) -> Result<Option<RegisterAddress>, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        source(resolver, Capability::TemperatureInterrupt)
    }
}
