//! Feature drivers
//!
//! Each logical accelerometer feature is a zero-sized driver type
//! implementing [`FeatureDriver`]. A driver knows which capabilities its
//! feature needs and in which order they must be written; the
//! [`command`](crate::command) builder resolves them against whatever table
//! the session holds.
//!
//! Drivers never look at the variant. Where a feature exists in two register
//! shapes (a dedicated config/interrupt-enable pair on Legacy, the shared
//! feature-enable triad on Current) the driver picks by capability support.
//!
//! | Feature | Driver | Legacy | Current |
//! |---------|--------|--------|---------|
//! | Acceleration sampling | [`Sampling`] | yes | yes |
//! | Motion detection | [`Motion`] | dedicated registers | feature triad |
//! | Tap detection | [`Tap`] | yes | no |
//! | Orientation | [`Orientation`] | yes | no |
//! | Step detector/counter | [`StepCounter`] | yes | no |
//! | Temperature | [`Temperature`] | no | yes |
//! | Wrist gesture | [`WristGesture`] | no | feature triad |
//! | Activity recognition | [`Activity`] | no | feature triad |

pub mod activity;
pub mod motion;
pub mod orientation;
pub mod sampling;
pub mod step;
pub mod tap;
pub mod temperature;
pub mod wrist;

pub use activity::{Activity, ActivityConfig};
pub use motion::{Motion, MotionConfig, MotionDetection};
pub use orientation::{Orientation, OrientationConfig};
pub use sampling::{Sampling, SamplingConfig};
pub use step::{StepConfig, StepCounter, StepMode};
pub use tap::{Tap, TapConfig, TapDetection};
pub use temperature::Temperature;
pub use wrist::{WristConfig, WristGesture, WristGestureKind};

use crate::RegisterAddress;
use crate::capability::Capability;
use crate::command::{self, CommandError, Payload, Request, TransactionPlan};
use crate::registers::ResolveCapability;

/// Logical accelerometer feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feature {
    /// Acceleration data sampling
    Sampling,
    /// Motion detection
    Motion,
    /// Tap detection
    Tap,
    /// Orientation detection
    Orientation,
    /// Step detector and counter
    StepCounter,
    /// Temperature sensor
    Temperature,
    /// Wrist gesture detection
    WristGesture,
    /// Activity recognition
    Activity,
}

impl Feature {
    /// Number of features
    pub const COUNT: usize = 8;

    /// Every feature, in declaration order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Sampling,
        Self::Motion,
        Self::Tap,
        Self::Orientation,
        Self::StepCounter,
        Self::Temperature,
        Self::WristGesture,
        Self::Activity,
    ];

    /// Dense index of this feature
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Per-session state of one feature
///
/// `Disabled -> Configuring -> Enabled -> Disabled`. `Configuring` lasts
/// while an enable plan is being submitted; any failure drops back to
/// `Disabled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeatureState {
    /// Not enabled
    #[default]
    Disabled,
    /// Enable plan in flight
    Configuring,
    /// Every step of the enable plan was accepted
    Enabled,
}

/// Register plans for one logical feature
pub trait FeatureDriver {
    /// Which feature this driver controls
    const FEATURE: Feature;

    /// Caller-supplied settings for an enable request
    type Config<'a>: Copy;

    /// Ordered steps that configure and enable the feature
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnsupportedCapability`] if the resolver lacks
    /// any capability the feature needs.
    fn enable_plan<R>(resolver: &R, config: Self::Config<'_>) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized;

    /// Number of steps [`enable_plan`](Self::enable_plan) produces on this
    /// resolver
    fn enable_steps<R>(resolver: &R, config: Self::Config<'_>) -> usize
    where
        R: ResolveCapability + ?Sized;

    /// Ordered steps that disable the feature
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnsupportedCapability`] if the resolver lacks
    /// any capability the feature needs.
    fn disable_plan<R>(resolver: &R) -> Result<TransactionPlan, CommandError>
    where
        R: ResolveCapability + ?Sized;

    /// Address notifications arrive on once enabled, if the feature has one
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnsupportedCapability`] if the source register
    /// does not exist on this variant.
    fn notification<R>(
        resolver: &R,
        config: Self::Config<'_>,
    ) -> Result<Option<RegisterAddress>, CommandError>
    where
        R: ResolveCapability + ?Sized;
}

/// Bits of the shared feature enable and feature interrupt enable registers
/// on the Current variant
pub mod feature_bits {
    /// Any-motion detection
    pub const ANY_MOTION: u8 = 0x01;
    /// No-motion detection
    pub const NO_MOTION: u8 = 0x02;
    /// Significant-motion detection
    pub const SIGNIFICANT_MOTION: u8 = 0x04;
    /// Wrist gesture detection
    pub const WRIST_GESTURE: u8 = 0x08;
    /// Wrist wake-up detection
    pub const WRIST_WAKEUP: u8 = 0x10;
    /// Activity recognition
    pub const ACTIVITY: u8 = 0x20;

    /// All motion bits
    pub const MOTION: u8 = ANY_MOTION | NO_MOTION | SIGNIFICANT_MOTION;
    /// All wrist bits
    pub const WRIST: u8 = WRIST_GESTURE | WRIST_WAKEUP;
}

/// Steps in a dedicated config/interrupt-enable enable plan
pub(crate) const DEDICATED_STEPS: usize = 2;

/// Steps in a feature triad enable plan
pub(crate) const TRIAD_STEPS: usize = 3;

/// Config write followed by a set-mask write to a dedicated interrupt enable
pub(crate) fn dedicated_enable<R>(
    resolver: &R,
    config: Capability,
    enable: Capability,
    parameters: &[u8],
    mask: u8,
) -> Result<TransactionPlan, CommandError>
where
    R: ResolveCapability + ?Sized,
{
    command::build(
        resolver,
        &[
            Request::write(config, parameters),
            Request::write(enable, &[mask, 0x00]),
        ],
    )
}

/// Clear-mask write to a dedicated interrupt enable
pub(crate) fn dedicated_disable<R>(
    resolver: &R,
    enable: Capability,
    mask: u8,
) -> Result<TransactionPlan, CommandError>
where
    R: ResolveCapability + ?Sized,
{
    command::build(resolver, &[Request::write(enable, &[0x00, mask])])
}

/// Feature config, feature interrupt enable, feature enable
///
/// The config payload is prefixed with the feature's index so the device
/// knows which parameter block it targets.
pub(crate) fn triad_enable<R>(
    resolver: &R,
    bit: u8,
    parameters: &[u8],
) -> Result<TransactionPlan, CommandError>
where
    R: ResolveCapability + ?Sized,
{
    let mut config = Payload::new();
    if config.push(feature_index(bit)).is_err() || config.extend_from_slice(parameters).is_err() {
        resolver.lookup(Capability::FeatureConfig)?;
        return Err(CommandError::PayloadTooLong {
            capability: Capability::FeatureConfig,
            len: parameters.len() + 1,
        });
    }

    command::build(
        resolver,
        &[
            Request::write(Capability::FeatureConfig, &config),
            Request::write(Capability::FeatureInterruptEnable, &[bit, 0x00]),
            Request::write(Capability::FeatureEnable, &[bit, 0x00]),
        ],
    )
}

/// Feature enable cleared before its interrupt
pub(crate) fn triad_disable<R>(resolver: &R, bits: u8) -> Result<TransactionPlan, CommandError>
where
    R: ResolveCapability + ?Sized,
{
    command::build(
        resolver,
        &[
            Request::write(Capability::FeatureEnable, &[0x00, bits]),
            Request::write(Capability::FeatureInterruptEnable, &[0x00, bits]),
        ],
    )
}

/// Resolve an optional notification source
pub(crate) fn source<R>(
    resolver: &R,
    capability: Capability,
) -> Result<Option<RegisterAddress>, CommandError>
where
    R: ResolveCapability + ?Sized,
{
    resolver.lookup(capability).map(Some)
}

#[allow(clippy::cast_possible_truncation)]
const fn feature_index(bit: u8) -> u8 {
    bit.trailing_zeros() as u8
}
