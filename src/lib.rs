#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[cfg(test)]
extern crate std;

pub mod capability;
pub mod command;
pub mod features;
pub mod interface;
pub mod registers;
pub mod session;
pub mod variant;

// Re-export main types
pub use capability::Capability;
pub use command::{CommandError, ExecutionError, Request, TransactionPlan};
pub use features::{Feature, FeatureDriver, FeatureState};
pub use interface::{NotificationHandler, NotificationInterface, Transport};
pub use registers::{CURRENT, LEGACY, RegisterTable, ResolveCapability, TableIntegrityError};
pub use session::SensorSession;
pub use variant::{UnknownVariant, Variant};

#[cfg(feature = "async")]
pub use interface::{AsyncNotificationInterface, AsyncTransport};
#[cfg(feature = "async")]
pub use session::SharedSession;

/// Register address within the accelerometer module
pub type RegisterAddress = u8;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Transport error, passed through unchanged
    Transport(E),
    /// The capability does not exist on this device's variant
    UnsupportedCapability(Capability),
    /// The reported accelerometer implementation id is not supported
    UnknownVariant(u8),
    /// A register table maps two capabilities to one address, or lists a
    /// capability twice
    TableIntegrity(TableIntegrityError),
    /// A payload or read length exceeds
    /// [`MAX_PAYLOAD_LEN`](command::MAX_PAYLOAD_LEN)
    PayloadTooLong {
        /// Capability the payload was meant for
        capability: Capability,
        /// Requested length in bytes
        len: usize,
    },
    /// A plan would exceed [`MAX_PLAN_STEPS`](command::MAX_PLAN_STEPS)
    PlanFull,
}

impl<E> From<CommandError> for Error<E> {
    fn from(error: CommandError) -> Self {
        match error {
            CommandError::UnsupportedCapability(capability) => {
                Self::UnsupportedCapability(capability)
            }
            CommandError::PayloadTooLong { capability, len } => {
                Self::PayloadTooLong { capability, len }
            }
            CommandError::PlanFull => Self::PlanFull,
        }
    }
}

impl<E> From<UnknownVariant> for Error<E> {
    fn from(UnknownVariant(id): UnknownVariant) -> Self {
        Self::UnknownVariant(id)
    }
}

impl<E> From<TableIntegrityError> for Error<E> {
    fn from(error: TableIntegrityError) -> Self {
        Self::TableIntegrity(error)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {e:?}"),
            Self::UnsupportedCapability(c) => write!(f, "{c:?} is not supported on this variant"),
            Self::UnknownVariant(id) => write!(f, "unknown accelerometer implementation {id}"),
            Self::TableIntegrity(e) => write!(f, "register table integrity: {e:?}"),
            Self::PayloadTooLong { capability, len } => {
                write!(f, "{len} byte payload too long for {capability:?}")
            }
            Self::PlanFull => write!(f, "transaction plan full"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}
