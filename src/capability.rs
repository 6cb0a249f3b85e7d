//! Variant-independent capability names
//!
//! A [`Capability`] names one logical register of the accelerometer module
//! (a configuration block, an interrupt enable, a data source) without
//! saying where it lives. The set is the union of both register layouts;
//! each [`RegisterTable`](crate::registers::RegisterTable) supports a subset.

/// Symbolic name of an accelerometer register, independent of chip variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Capability {
    /// Power mode (start/stop the accelerometer)
    PowerMode,
    /// Data-ready interrupt enable
    DataInterruptEnable,
    /// Output data rate and range configuration
    DataConfig,
    /// Acceleration data source
    DataInterrupt,
    /// Data interrupt configuration (Legacy only)
    DataInterruptConfig,
    /// Packed acceleration data source (three samples per notification)
    PackedAccData,

    /// Shared feature enable register (Current only)
    FeatureEnable,
    /// Shared feature interrupt enable register (Current only)
    FeatureInterruptEnable,
    /// Shared feature configuration register (Current only)
    FeatureConfig,

    /// Motion interrupt enable (Legacy only)
    MotionInterruptEnable,
    /// Motion detection configuration (Legacy only)
    MotionConfig,
    /// Motion interrupt source
    MotionInterrupt,

    /// Tap interrupt enable (Legacy only)
    TapInterruptEnable,
    /// Tap detection configuration (Legacy only)
    TapConfig,
    /// Tap interrupt source (Legacy only)
    TapInterrupt,

    /// Orientation interrupt enable (Legacy only)
    OrientationInterruptEnable,
    /// Orientation detection configuration (Legacy only)
    OrientationConfig,
    /// Orientation interrupt source (Legacy only)
    OrientationInterrupt,

    /// Step detector interrupt enable (Legacy only)
    StepDetectorInterruptEnable,
    /// Step detector and counter configuration (Legacy only)
    StepDetectorConfig,
    /// Step detector interrupt source (Legacy only)
    StepDetectorInterrupt,
    /// Step counter value (Legacy only)
    StepCounterData,
    /// Step counter reset (Legacy only)
    StepCounterReset,

    /// Wrist gesture interrupt source (Current only)
    WristGestureInterrupt,
    /// Step count interrupt source (Current only)
    StepCountInterrupt,
    /// Activity recognition interrupt source (Current only)
    ActivityInterrupt,
    /// Temperature interrupt source (Current only)
    TemperatureInterrupt,
    /// Temperature sensor enable (Current only)
    TemperatureEnable,
    /// Temperature value (Current only)
    Temperature,
    /// Acceleration offset compensation (Current only)
    Offset,
    /// Filter downsampling configuration (Current only)
    Downsampling,
}

impl Capability {
    /// Number of capabilities across both variants
    pub const COUNT: usize = 31;

    /// Every capability, in declaration order
    pub const ALL: [Self; Self::COUNT] = [
        Self::PowerMode,
        Self::DataInterruptEnable,
        Self::DataConfig,
        Self::DataInterrupt,
        Self::DataInterruptConfig,
        Self::PackedAccData,
        Self::FeatureEnable,
        Self::FeatureInterruptEnable,
        Self::FeatureConfig,
        Self::MotionInterruptEnable,
        Self::MotionConfig,
        Self::MotionInterrupt,
        Self::TapInterruptEnable,
        Self::TapConfig,
        Self::TapInterrupt,
        Self::OrientationInterruptEnable,
        Self::OrientationConfig,
        Self::OrientationInterrupt,
        Self::StepDetectorInterruptEnable,
        Self::StepDetectorConfig,
        Self::StepDetectorInterrupt,
        Self::StepCounterData,
        Self::StepCounterReset,
        Self::WristGestureInterrupt,
        Self::StepCountInterrupt,
        Self::ActivityInterrupt,
        Self::TemperatureInterrupt,
        Self::TemperatureEnable,
        Self::Temperature,
        Self::Offset,
        Self::Downsampling,
    ];

    /// Dense index of this capability, usable for table lookups
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this capability is an asynchronous event or data source
    ///
    /// Sources are the addresses notifications arrive on; everything else is
    /// written or polled.
    #[must_use]
    pub const fn is_source(self) -> bool {
        matches!(
            self,
            Self::DataInterrupt
                | Self::PackedAccData
                | Self::MotionInterrupt
                | Self::TapInterrupt
                | Self::OrientationInterrupt
                | Self::StepDetectorInterrupt
                | Self::WristGestureInterrupt
                | Self::StepCountInterrupt
                | Self::ActivityInterrupt
                | Self::TemperatureInterrupt
        )
    }
}
