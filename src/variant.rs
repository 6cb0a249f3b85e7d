//! Chip variants and variant selection
//!
//! The accelerometer module comes in two generations with different register
//! layouts. The variant is declared once per session (usually from the
//! module-info implementation id) and picks the [`RegisterTable`] every
//! feature driver resolves against.

use crate::registers::{CURRENT, LEGACY, RegisterTable};

/// Module implementation id reported by BMI160-class boards
pub const IMPLEMENTATION_BMI160: u8 = 1;

/// Module implementation id reported by BMI270-class boards
pub const IMPLEMENTATION_BMI270: u8 = 4;

/// Accelerometer chip generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// BMI160-class register layout
    Legacy,
    /// BMI270-class register layout
    Current,
}

impl Variant {
    /// Map a module implementation id to a variant
    ///
    /// # Errors
    ///
    /// Returns [`UnknownVariant`] for ids with no register table.
    pub const fn from_implementation(id: u8) -> Result<Self, UnknownVariant> {
        match id {
            IMPLEMENTATION_BMI160 => Ok(Self::Legacy),
            IMPLEMENTATION_BMI270 => Ok(Self::Current),
            other => Err(UnknownVariant(other)),
        }
    }

    /// Module implementation id for this variant
    #[must_use]
    pub const fn implementation_id(self) -> u8 {
        match self {
            Self::Legacy => IMPLEMENTATION_BMI160,
            Self::Current => IMPLEMENTATION_BMI270,
        }
    }
}

impl TryFrom<u8> for Variant {
    type Error = UnknownVariant;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_implementation(id)
    }
}

/// The implementation id does not name a supported variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownVariant(pub u8);

/// Register table for a variant
#[must_use]
pub fn resolve(variant: Variant) -> &'static RegisterTable {
    match variant {
        Variant::Legacy => &LEGACY,
        Variant::Current => &CURRENT,
    }
}

/// Register table for a module implementation id
///
/// # Errors
///
/// Returns [`UnknownVariant`] if the id is not a supported chip.
pub fn select(implementation_id: u8) -> Result<&'static RegisterTable, UnknownVariant> {
    Variant::from_implementation(implementation_id).map(resolve)
}
