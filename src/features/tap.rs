//! Tap detection (Legacy only)

use super::{
    DEDICATED_STEPS, Feature, FeatureDriver, dedicated_disable, dedicated_enable, source,
};
use crate::RegisterAddress;
use crate::capability::Capability;
use crate::command::{CommandError, TransactionPlan};
use crate::registers::ResolveCapability;

/// Which taps to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapDetection {
    /// Single taps
    Single,
    /// Double taps
    Double,
    /// Both single and double taps
    Both,
}

impl TapDetection {
    const fn mask(self) -> u8 {
        match self {
            Self::Single => 0x01,
            Self::Double => 0x02,
            Self::Both => 0x03,
        }
    }
}

/// Tap detection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapConfig<'a> {
    /// Which taps to report
    pub detection: TapDetection,
    /// Raw threshold/quiet/shock block
    pub parameters: &'a [u8],
}

impl<'a> TapConfig<'a> {
    /// Create tap settings
    #[must_use]
    pub const fn new(detection: TapDetection, parameters: &'a [u8]) -> Self {
        Self {
            detection,
            parameters,
        }
    }
}

/// Tap detection driver
#[derive(Debug, Clone, Copy, Default)]
pub struct Tap;

impl FeatureDriver for Tap {
    const FEATURE: Feature = Feature::Tap;

    type Config<'a> = TapConfig<'a>;

    fn enable_plan<R>(resolver: &R, config: TapConfig<'_>) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        dedicated_enable(
            resolver,
            Capability::TapConfig,
            Capability::TapInterruptEnable,
            config.parameters,
            config.detection.mask(),
        )
    }

    fn enable_steps<R>(_resolver: &R, _config: TapConfig<'_>) -> usize
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
            Capability::TapInterruptEnable,
            TapDetection::Both.mask(),
        )
    }

    fn notification<R>(
        resolver: &R,
        _config: TapConfig<'_>,
    ) -> Result<Option<RegisterAddress>, CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        source(resolver, Capability::TapInterrupt)
    }
}
