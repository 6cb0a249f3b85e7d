//! Command building and transaction plans
//!
//! The builder turns an ordered list of [`Request`]s into a
//! [`TransactionPlan`]: every capability is resolved against the active
//! register table, payloads are copied into fixed-capacity buffers and the
//! caller's order is kept exactly. Enable/config/interrupt writes are order
//! sensitive on the device, so nothing here ever reorders steps.
//!
//! A plan is all-or-nothing at build time: the first unsupported capability
//! aborts the whole plan and nothing is produced.
//!
//! # Example
//!
//! ```ignore
//! use bosch_accel_regmap::{Capability, command::{self, Request}, registers::LEGACY};
//!
//! let plan = command::build(&LEGACY, &[
//!     Request::write(Capability::MotionConfig, &[0x00, 0x14]),
//!     Request::write(Capability::MotionInterruptEnable, &[0x07, 0x00]),
//! ])?;
//! plan.execute(&mut transport)?;
//! ```

use heapless::Vec;

use crate::RegisterAddress;
use crate::capability::Capability;
use crate::registers::ResolveCapability;

/// Largest payload a single register write may carry
pub const MAX_PAYLOAD_LEN: usize = 18;

/// Largest number of steps in one plan
pub const MAX_PLAN_STEPS: usize = 8;

/// Register payload bytes
pub type Payload = Vec<u8, MAX_PAYLOAD_LEN>;

/// Errors raised while building a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// The capability does not exist on the active variant
    UnsupportedCapability(Capability),
    /// A payload (or read length) exceeds [`MAX_PAYLOAD_LEN`]
    PayloadTooLong {
        /// Capability the payload was meant for
        capability: Capability,
        /// Requested length in bytes
        len: usize,
    },
    /// The plan would exceed [`MAX_PLAN_STEPS`]
    PlanFull,
}

/// Direction of a register transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Register read
    Read,
    /// Register write
    Write,
}

/// One requested register transaction, by capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// Register to access
    pub capability: Capability,
    /// What to do with it
    pub operation: Operation<'a>,
}

/// Requested operation on one register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    /// Read this many bytes
    Read(usize),
    /// Write these bytes
    Write(&'a [u8]),
}

impl<'a> Request<'a> {
    /// Request a write of `payload` to `capability`
    #[must_use]
    pub const fn write(capability: Capability, payload: &'a [u8]) -> Self {
        Self {
            capability,
            operation: Operation::Write(payload),
        }
    }

    /// Request a read of `len` bytes from `capability`
    #[must_use]
    pub const fn read(capability: Capability, len: usize) -> Self {
        Self {
            capability,
            operation: Operation::Read(len),
        }
    }
}

/// Resolved access of one plan step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Read this many bytes
    Read {
        /// Number of bytes to read
        len: usize,
    },
    /// Write this payload
    Write(Payload),
}

/// One register transaction with its address resolved
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandStep {
    /// Capability the step was requested for
    pub capability: Capability,
    /// Resolved register address on the active variant
    pub address: RegisterAddress,
    /// Read length or write payload
    pub access: Access,
}

impl CommandStep {
    /// Read or write
    #[must_use]
    pub const fn direction(&self) -> Direction {
        match self.access {
            Access::Read { .. } => Direction::Read,
            Access::Write(_) => Direction::Write,
        }
    }

    /// Payload of a write step
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        match &self.access {
            Access::Write(payload) => Some(payload.as_slice()),
            Access::Read { .. } => None,
        }
    }
}

/// Bytes returned by one read step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadValue {
    /// Capability that was read
    pub capability: Capability,
    /// Address it was read from
    pub address: RegisterAddress,
    /// Raw bytes, uninterpreted
    pub data: Payload,
}

/// Results of the read steps of an executed plan, in plan order
pub type Readback = Vec<ReadValue, MAX_PLAN_STEPS>;

/// A plan stopped on a transport error
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExecutionError<E> {
    /// Index of the failed step; every step before it completed
    pub step: usize,
    /// Transport error, unchanged
    pub error: E,
}

impl<E> ExecutionError<E> {
    /// Whether earlier steps completed before the failure
    #[must_use]
    pub const fn partially_applied(&self) -> bool {
        self.step > 0
    }
}

/// Ordered register transactions for one operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransactionPlan {
    steps: Vec<CommandStep, MAX_PLAN_STEPS>,
}

impl TransactionPlan {
    /// Create an empty plan
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in execution order
    #[must_use]
    pub fn steps(&self) -> &[CommandStep] {
        &self.steps
    }

    /// Iterate over steps in execution order
    pub fn iter(&self) -> core::slice::Iter<'_, CommandStep> {
        self.steps.iter()
    }

    /// Resolve `request` and append it as the last step
    ///
    /// # Errors
    ///
    /// Returns an error if the capability is unsupported, the payload is too
    /// long, or the plan is full. The plan is unchanged on error.
    pub fn push<R>(&mut self, resolver: &R, request: &Request<'_>) -> Result<(), CommandError>
    where
        R: ResolveCapability + ?Sized,
    {
        let capability = request.capability;
        let address = resolver.lookup(capability)?;

        let access = match request.operation {
            Operation::Read(len) => {
                if len > MAX_PAYLOAD_LEN {
                    return Err(CommandError::PayloadTooLong { capability, len });
                }
                Access::Read { len }
            }
            Operation::Write(bytes) => {
                let payload = Payload::from_slice(bytes).map_err(|()| {
                    CommandError::PayloadTooLong {
                        capability,
                        len: bytes.len(),
                    }
                })?;
                Access::Write(payload)
            }
        };

        self.steps
            .push(CommandStep {
                capability,
                address,
                access,
            })
            .map_err(|_| CommandError::PlanFull)
    }

    /// Execute every step in order on a blocking transport
    ///
    /// Steps are issued one at a time; the first transport error stops the
    /// plan and nothing after it is attempted. Already-issued writes are not
    /// rolled back.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] carrying the transport error and how
    /// far the plan got.
    pub fn execute<T>(&self, transport: &mut T) -> Result<Readback, ExecutionError<T::Error>>
    where
        T: device_driver::RegisterInterface<AddressType = RegisterAddress>,
    {
        let mut readback = Readback::new();

        for (index, step) in self.steps.iter().enumerate() {
            let fail = |error| ExecutionError { step: index, error };

            match &step.access {
                Access::Write(payload) => {
                    transport
                        .write_register(step.address, bits(payload.len()), payload)
                        .map_err(fail)?;
                }
                Access::Read { len } => {
                    let mut data = Payload::new();
                    // len was bounded by MAX_PAYLOAD_LEN when the step was built
                    let resized = data.resize_default(*len);
                    debug_assert!(resized.is_ok());
                    transport
                        .read_register(step.address, bits(*len), &mut data)
                        .map_err(fail)?;
                    // one entry per step at most, and Readback holds MAX_PLAN_STEPS
                    let pushed = readback.push(ReadValue {
                        capability: step.capability,
                        address: step.address,
                        data,
                    });
                    debug_assert!(pushed.is_ok());
                }
            }

            #[cfg(feature = "defmt")]
            defmt::trace!("step {}: {} @ {=u8:#x}", index, step.capability, step.address);
        }

        Ok(readback)
    }

    /// Execute every step in order on an async transport
    ///
    /// Each step is awaited before the next is issued. Dropping the returned
    /// future between steps leaves earlier writes applied.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] carrying the transport error and how
    /// far the plan got.
    #[cfg(feature = "async")]
    pub async fn execute_async<T>(
        &self,
        transport: &mut T,
    ) -> Result<Readback, ExecutionError<T::Error>>
    where
        T: device_driver::AsyncRegisterInterface<AddressType = RegisterAddress>,
    {
        let mut readback = Readback::new();

        for (index, step) in self.steps.iter().enumerate() {
            let fail = |error| ExecutionError { step: index, error };

            match &step.access {
                Access::Write(payload) => {
                    transport
                        .write_register(step.address, bits(payload.len()), payload)
                        .await
                        .map_err(fail)?;
                }
                Access::Read { len } => {
                    let mut data = Payload::new();
                    // len was bounded by MAX_PAYLOAD_LEN when the step was built
                    let resized = data.resize_default(*len);
                    debug_assert!(resized.is_ok());
                    transport
                        .read_register(step.address, bits(*len), &mut data)
                        .await
                        .map_err(fail)?;
                    // one entry per step at most, and Readback holds MAX_PLAN_STEPS
                    let pushed = readback.push(ReadValue {
                        capability: step.capability,
                        address: step.address,
                        data,
                    });
                    debug_assert!(pushed.is_ok());
                }
            }

            #[cfg(feature = "defmt")]
            defmt::trace!("step {}: {} @ {=u8:#x}", index, step.capability, step.address);
        }

        Ok(readback)
    }
}

impl<'p> IntoIterator for &'p TransactionPlan {
    type Item = &'p CommandStep;
    type IntoIter = core::slice::Iter<'p, CommandStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Build a plan from `requests`, preserving their order
///
/// # Errors
///
/// Fails on the first request that cannot be resolved or encoded; no partial
/// plan is returned.
pub fn build<R>(resolver: &R, requests: &[Request<'_>]) -> Result<TransactionPlan, CommandError>
where
    R: ResolveCapability + ?Sized,
{
    let mut plan = TransactionPlan::new();
    for request in requests {
        plan.push(resolver, request)?;
    }
    Ok(plan)
}

#[allow(clippy::cast_possible_truncation)]
const fn bits(len: usize) -> u32 {
    (len * 8) as u32
}
