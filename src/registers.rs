//! Register tables for both accelerometer variants
//!
//! Each variant has its own authoritative table mapping [`Capability`] to a
//! register address. The layouts are not related by any offset or stride:
//!
//! - **Legacy** allocates power/data/interrupt registers from `0x01`, motion
//!   from `0x09`, tap from `0x0C`, orientation from `0x0F` and the step
//!   detector/counter block plus packed data from `0x17`.
//! - **Current** allocates power/data/interrupt registers from `0x01`, packed
//!   data at `0x05`, the shared feature enable/interrupt/config triad at
//!   `0x06` and one run of feature sources and settings from `0x09`.
//!
//! Addresses in the gaps between blocks resolve to nothing and are never
//! used.
//!
//! Address uniqueness is checked when a table is constructed. The built-in
//! tables are `static`, so a duplicate in either of them fails const
//! evaluation and never reaches a device.

use crate::RegisterAddress;
use crate::capability::Capability;
use crate::command::CommandError;
use crate::variant::Variant;

/// Anything that can turn a [`Capability`] into a register address
///
/// Feature drivers depend on this trait only, so a session can hand them
/// either built-in table (or a custom one) without the driver knowing which.
pub trait ResolveCapability {
    /// Variant this resolver describes
    fn variant(&self) -> Variant;

    /// Resolve a capability to its register address
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnsupportedCapability`] if the capability does
    /// not exist on this variant.
    fn lookup(&self, capability: Capability) -> Result<RegisterAddress, CommandError>;

    /// Whether the capability exists on this variant
    fn supports(&self, capability: Capability) -> bool {
        self.lookup(capability).is_ok()
    }
}

impl<R: ResolveCapability + ?Sized> ResolveCapability for &R {
    fn variant(&self) -> Variant {
        (**self).variant()
    }

    fn lookup(&self, capability: Capability) -> Result<RegisterAddress, CommandError> {
        (**self).lookup(capability)
    }
}

/// A register table failed its integrity check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableIntegrityError {
    /// Two capabilities were assigned the same address
    DuplicateAddress {
        /// Address assigned twice
        address: RegisterAddress,
        /// Capability that claimed the address first
        first: Capability,
        /// Capability that claimed it again
        second: Capability,
    },
    /// One capability was listed twice
    DuplicateCapability(Capability),
}

/// Immutable capability-to-address mapping for one variant
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterTable {
    variant: Variant,
    addresses: [Option<RegisterAddress>; Capability::COUNT],
}

impl RegisterTable {
    /// Build a table, checking that every capability and every address
    /// appears at most once
    ///
    /// # Errors
    ///
    /// Returns a [`TableIntegrityError`] describing the first collision.
    pub const fn try_new(
        variant: Variant,
        entries: &[(Capability, RegisterAddress)],
    ) -> Result<Self, TableIntegrityError> {
        let mut addresses = [None; Capability::COUNT];
        let mut owners: [Option<Capability>; 256] = [None; 256];

        let mut i = 0;
        while i < entries.len() {
            let (capability, address) = entries[i];

            if addresses[capability.index()].is_some() {
                return Err(TableIntegrityError::DuplicateCapability(capability));
            }
            if let Some(first) = owners[address as usize] {
                return Err(TableIntegrityError::DuplicateAddress {
                    address,
                    first,
                    second: capability,
                });
            }

            owners[address as usize] = Some(capability);
            addresses[capability.index()] = Some(address);
            i += 1;
        }

        Ok(Self { variant, addresses })
    }

    /// Build a table that is known to be valid
    ///
    /// # Panics
    ///
    /// Panics if two entries share a capability or an address. In a `static`
    /// or `const` initializer the panic is a compile error.
    #[must_use]
    pub const fn new(variant: Variant, entries: &[(Capability, RegisterAddress)]) -> Self {
        match Self::try_new(variant, entries) {
            Ok(table) => table,
            Err(TableIntegrityError::DuplicateAddress { .. }) => {
                panic!("register table assigns one address to two capabilities")
            }
            Err(TableIntegrityError::DuplicateCapability(_)) => {
                panic!("register table lists a capability twice")
            }
        }
    }

    /// Variant this table describes
    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Address of a capability, or `None` if unsupported
    #[must_use]
    pub const fn address(&self, capability: Capability) -> Option<RegisterAddress> {
        self.addresses[capability.index()]
    }

    /// Capability mapped to an address, if any
    #[must_use]
    pub fn capability_at(&self, address: RegisterAddress) -> Option<Capability> {
        self.iter()
            .find(|&(_, a)| a == address)
            .map(|(capability, _)| capability)
    }

    /// Number of supported capabilities
    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.iter().filter(|a| a.is_some()).count()
    }

    /// Whether the table supports nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over supported `(capability, address)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (Capability, RegisterAddress)> + '_ {
        Capability::ALL
            .iter()
            .filter_map(|&capability| self.address(capability).map(|a| (capability, a)))
    }
}

impl ResolveCapability for RegisterTable {
    fn variant(&self) -> Variant {
        self.variant
    }

    fn lookup(&self, capability: Capability) -> Result<RegisterAddress, CommandError> {
        self.address(capability)
            .ok_or(CommandError::UnsupportedCapability(capability))
    }
}

/// BMI160-class register layout
pub static LEGACY: RegisterTable = RegisterTable::new(
    Variant::Legacy,
    &[
        (Capability::PowerMode, 0x01),
        (Capability::DataInterruptEnable, 0x02),
        (Capability::DataConfig, 0x03),
        (Capability::DataInterrupt, 0x04),
        (Capability::DataInterruptConfig, 0x05),
        // 0x06..=0x08 unallocated
        (Capability::MotionInterruptEnable, 0x09),
        (Capability::MotionConfig, 0x0A),
        (Capability::MotionInterrupt, 0x0B),
        (Capability::TapInterruptEnable, 0x0C),
        (Capability::TapConfig, 0x0D),
        (Capability::TapInterrupt, 0x0E),
        (Capability::OrientationInterruptEnable, 0x0F),
        (Capability::OrientationConfig, 0x10),
        (Capability::OrientationInterrupt, 0x11),
        // 0x12..=0x16 unallocated
        (Capability::StepDetectorInterruptEnable, 0x17),
        (Capability::StepDetectorConfig, 0x18),
        (Capability::StepDetectorInterrupt, 0x19),
        (Capability::StepCounterData, 0x1A),
        (Capability::StepCounterReset, 0x1B),
        (Capability::PackedAccData, 0x1C),
    ],
);

/// BMI270-class register layout
pub static CURRENT: RegisterTable = RegisterTable::new(
    Variant::Current,
    &[
        (Capability::PowerMode, 0x01),
        (Capability::DataInterruptEnable, 0x02),
        (Capability::DataConfig, 0x03),
        (Capability::DataInterrupt, 0x04),
        (Capability::PackedAccData, 0x05),
        (Capability::FeatureEnable, 0x06),
        (Capability::FeatureInterruptEnable, 0x07),
        (Capability::FeatureConfig, 0x08),
        (Capability::MotionInterrupt, 0x09),
        (Capability::WristGestureInterrupt, 0x0A),
        (Capability::StepCountInterrupt, 0x0B),
        (Capability::ActivityInterrupt, 0x0C),
        (Capability::TemperatureInterrupt, 0x0D),
        (Capability::TemperatureEnable, 0x0E),
        (Capability::Temperature, 0x0F),
        (Capability::Offset, 0x10),
        // 0x11 unallocated
        (Capability::Downsampling, 0x12),
    ],
);
