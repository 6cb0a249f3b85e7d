//! Per-device accelerometer session
//!
//! A [`SensorSession`] owns the transport, the register table for the
//! device's variant and the state of every feature. All register traffic
//! goes through transaction plans built from the table, so the same calls
//! work on either variant as long as the capabilities exist.
//!
//! Enabling a feature subscribes its notification source (if any), then
//! submits the enable plan step by step. A failure at any point puts the
//! feature back in [`FeatureState::Disabled`] and releases the subscription.
//! Writes already issued are not undone; [`SensorSession::partially_applied`]
//! reports that case.
//!
//! With the `async` feature enabled the session methods become `async`, and
//! [`SharedSession`] lets several tasks share one session behind an
//! `embassy-sync` mutex.

use crate::capability::Capability;
use crate::command::{self, Payload, Readback, Request};
use crate::features::{Feature, FeatureDriver, FeatureState};
use crate::interface::NotificationHandler;
use crate::registers::{RegisterTable, ResolveCapability};
use crate::variant::{self, UnknownVariant, Variant};
use crate::{Error, RegisterAddress};

#[cfg(not(feature = "async"))]
use crate::interface::Transport;

#[cfg(feature = "async")]
use crate::interface::AsyncTransport;

#[cfg(not(feature = "async"))]
type SessionError<T> = Error<<T as device_driver::RegisterInterface>::Error>;

#[cfg(feature = "async")]
type SessionError<T> = Error<<T as device_driver::AsyncRegisterInterface>::Error>;

const POWER_ON: u8 = 0x01;
const POWER_OFF: u8 = 0x00;
const STEP_COUNT_LEN: usize = 2;
const TEMPERATURE_LEN: usize = 2;

/// Bookkeeping for one feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FeatureSlot {
    state: FeatureState,
    partially_applied: bool,
    subscription: Option<RegisterAddress>,
}

/// Holds a feature in `Configuring` until the enable completes
///
/// Dropped without [`complete`](Self::complete) (error return or a cancelled
/// future) it leaves the feature `Disabled`. Once the plan has started the
/// device may hold some of its writes, so the slot is flagged as partially
/// applied.
struct Transition<'s> {
    slot: &'s mut FeatureSlot,
    in_flight: bool,
    armed: bool,
}

impl<'s> Transition<'s> {
    fn begin(slot: &'s mut FeatureSlot) -> Self {
        slot.state = FeatureState::Configuring;
        Self {
            slot,
            in_flight: false,
            armed: true,
        }
    }

    fn submitting(&mut self) {
        self.in_flight = true;
    }

    fn complete(mut self) {
        self.slot.state = FeatureState::Enabled;
        self.slot.partially_applied = false;
        self.armed = false;
    }

    /// Fail before or during the plan; returns the subscription to release
    fn fail(mut self, partially_applied: bool) -> Option<RegisterAddress> {
        self.slot.state = FeatureState::Disabled;
        self.slot.partially_applied = partially_applied;
        self.armed = false;
        self.slot.subscription.take()
    }
}

impl Drop for Transition<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.slot.state = FeatureState::Disabled;
            self.slot.partially_applied = self.in_flight;
        }
    }
}

/// Accelerometer session for one device
///
/// `R` is the capability resolver, normally one of the built-in
/// [`RegisterTable`]s picked from the device's [`Variant`].
#[derive(Debug)]
pub struct SensorSession<T, R = &'static RegisterTable> {
    transport: T,
    resolver: R,
    slots: [FeatureSlot; Feature::COUNT],
}

impl<T> SensorSession<T> {
    /// Create a session for a device of the given variant
    pub fn new(transport: T, variant: Variant) -> Self {
        Self::with_resolver(transport, variant::resolve(variant))
    }

    /// Create a session from the accelerometer implementation id reported by
    /// the device
    ///
    /// # Errors
    ///
    /// Returns [`UnknownVariant`] if the id names neither supported variant.
    pub fn from_implementation(transport: T, implementation: u8) -> Result<Self, UnknownVariant> {
        let table = variant::select(implementation)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("accelerometer implementation {} -> {}", implementation, table.variant());

        Ok(Self::with_resolver(transport, table))
    }
}

impl<T, R> SensorSession<T, R>
where
    R: ResolveCapability,
{
    /// Create a session over a custom resolver
    pub fn with_resolver(transport: T, resolver: R) -> Self {
        Self {
            transport,
            resolver,
            slots: [FeatureSlot::default(); Feature::COUNT],
        }
    }

    /// Variant of the device
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.resolver.variant()
    }

    /// Resolver in use
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Whether the device has a register for `capability`
    #[must_use]
    pub fn supports(&self, capability: Capability) -> bool {
        self.resolver.supports(capability)
    }

    /// Current state of `feature`
    #[must_use]
    pub const fn state(&self, feature: Feature) -> FeatureState {
        self.slots[feature.index()].state
    }

    /// Whether `feature` is enabled
    #[must_use]
    pub const fn is_enabled(&self, feature: Feature) -> bool {
        matches!(self.state(feature), FeatureState::Enabled)
    }

    /// Whether the last enable of `feature` failed after some of its writes
    /// reached the device
    #[must_use]
    pub const fn partially_applied(&self, feature: Feature) -> bool {
        self.slots[feature.index()].partially_applied
    }

    /// Address `feature` is currently subscribed on
    #[must_use]
    pub const fn subscription(&self, feature: Feature) -> Option<RegisterAddress> {
        self.slots[feature.index()].subscription
    }

    /// Borrow the transport
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the session and return the transport
    ///
    /// Subscriptions are not released; call `disable` first for any feature
    /// still enabled.
    pub fn release(self) -> T {
        self.transport
    }
}

#[cfg(not(feature = "async"))]
impl<T, R> SensorSession<T, R>
where
    T: Transport,
    R: ResolveCapability,
{
    /// Configure and enable feature `F`, routing its notifications to
    /// `handler`
    ///
    /// Calling this on an enabled feature reconfigures it.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedCapability`] if the variant lacks a register the
    ///   feature needs; nothing is sent and the state is unchanged
    /// - [`Error::Transport`] if subscribing or any plan step fails; the
    ///   feature ends `Disabled`
    pub fn enable<F: FeatureDriver>(
        &mut self,
        config: F::Config<'_>,
        handler: NotificationHandler,
    ) -> Result<(), SessionError<T>> {
        let plan = F::enable_plan(&self.resolver, config)?;
        debug_assert_eq!(plan.len(), F::enable_steps(&self.resolver, config));
        let source = F::notification(&self.resolver, config)?;

        let slot = &mut self.slots[F::FEATURE.index()];
        if let Some(stale) = slot.subscription.filter(|&old| Some(old) != source) {
            self.transport.unsubscribe(stale).map_err(Error::Transport)?;
            slot.subscription = None;
        }

        let mut transition = Transition::begin(slot);

        if let Some(address) = source {
            if let Err(error) = self.transport.subscribe(address, handler) {
                if let Some(previous) = transition.fail(false) {
                    // the subscribe failure is the error that matters
                    let _ = self.transport.unsubscribe(previous);
                }
                return Err(Error::Transport(error));
            }
            transition.slot.subscription = Some(address);
        }

        transition.submitting();
        match plan.execute(&mut self.transport) {
            Ok(_) => {
                transition.complete();

                #[cfg(feature = "defmt")]
                defmt::debug!("{} enabled ({} steps)", F::FEATURE, plan.len());

                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("{} enable failed at step {}", F::FEATURE, err.step);

                if let Some(address) = transition.fail(err.partially_applied()) {
                    // the step failure is the error that matters
                    let _ = self.transport.unsubscribe(address);
                }
                Err(Error::Transport(err.error))
            }
        }
    }

    /// Disable feature `F` and release its notification subscription
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedCapability`] if the variant does not have the
    ///   feature
    /// - [`Error::Transport`] if a disable step fails (state unchanged) or
    ///   the unsubscribe fails (feature already disabled on the device)
    pub fn disable<F: FeatureDriver>(&mut self) -> Result<(), SessionError<T>> {
        let plan = F::disable_plan(&self.resolver)?;

        plan.execute(&mut self.transport).map_err(|err| {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} disable failed at step {}", F::FEATURE, err.step);
            Error::Transport(err.error)
        })?;

        let slot = &mut self.slots[F::FEATURE.index()];
        slot.state = FeatureState::Disabled;
        slot.partially_applied = false;

        if let Some(address) = slot.subscription {
            self.transport
                .unsubscribe(address)
                .map_err(Error::Transport)?;
            slot.subscription = None;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("{} disabled", F::FEATURE);

        Ok(())
    }

    /// Build and execute an ad hoc plan
    ///
    /// # Errors
    ///
    /// Returns a build error before any I/O, or the first transport error.
    pub fn run(&mut self, requests: &[Request<'_>]) -> Result<Readback, SessionError<T>> {
        let plan = command::build(&self.resolver, requests)?;
        plan.execute(&mut self.transport)
            .map_err(|err| Error::Transport(err.error))
    }

    /// Read `len` raw bytes from `capability`
    ///
    /// # Errors
    ///
    /// Returns an error if the capability is unsupported, `len` is too long,
    /// or the transport fails.
    pub fn read(&mut self, capability: Capability, len: usize) -> Result<Payload, SessionError<T>> {
        let mut readback = self.run(&[Request::read(capability, len)])?;
        Ok(readback.pop().map(|value| value.data).unwrap_or_default())
    }

    /// Write raw bytes to `capability`
    ///
    /// # Errors
    ///
    /// Returns an error if the capability is unsupported, the payload is too
    /// long, or the transport fails.
    pub fn write(&mut self, capability: Capability, payload: &[u8]) -> Result<(), SessionError<T>> {
        self.run(&[Request::write(capability, payload)]).map(|_| ())
    }

    /// Put the accelerometer in active mode
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub fn start(&mut self) -> Result<(), SessionError<T>> {
        self.write(Capability::PowerMode, &[POWER_ON])
    }

    /// Put the accelerometer in suspend mode
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub fn stop(&mut self) -> Result<(), SessionError<T>> {
        self.write(Capability::PowerMode, &[POWER_OFF])
    }

    /// Read the accumulated step count
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without a step
    /// counter, or a transport error.
    pub fn read_step_count(&mut self) -> Result<u16, SessionError<T>> {
        let data = self.read(Capability::StepCounterData, STEP_COUNT_LEN)?;
        Ok(u16::from_le_bytes([data[0], data[1]]))
    }

    /// Reset the step counter to zero
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without a step
    /// counter, or a transport error.
    pub fn reset_step_counter(&mut self) -> Result<(), SessionError<T>> {
        self.write(Capability::StepCounterReset, &[])
    }

    /// Read the raw temperature register
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without a
    /// temperature sensor, or a transport error.
    pub fn read_temperature(&mut self) -> Result<i16, SessionError<T>> {
        let data = self.read(Capability::Temperature, TEMPERATURE_LEN)?;
        Ok(i16::from_le_bytes([data[0], data[1]]))
    }

    /// Write per-axis offset compensation
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without offset
    /// registers, or a transport error.
    pub fn write_offset(&mut self, offset: [i8; 3]) -> Result<(), SessionError<T>> {
        self.write(Capability::Offset, &offset.map(|axis| axis.to_le_bytes()[0]))
    }

    /// Write the raw downsampling configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without
    /// downsampling, or a transport error.
    pub fn set_downsampling(&mut self, config: &[u8]) -> Result<(), SessionError<T>> {
        self.write(Capability::Downsampling, config)
    }

    /// Write the raw data interrupt configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without the
    /// register, or a transport error.
    pub fn configure_data_interrupt(&mut self, config: &[u8]) -> Result<(), SessionError<T>> {
        self.write(Capability::DataInterruptConfig, config)
    }
}

#[cfg(feature = "async")]
impl<T, R> SensorSession<T, R>
where
    T: AsyncTransport,
    R: ResolveCapability,
{
    /// Configure and enable feature `F`, routing its notifications to
    /// `handler`
    ///
    /// Calling this on an enabled feature reconfigures it. If the returned
    /// future is dropped before it completes, the feature is left `Disabled`
    /// and flagged partially applied once any step was submitted.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedCapability`] if the variant lacks a register the
    ///   feature needs; nothing is sent and the state is unchanged
    /// - [`Error::Transport`] if subscribing or any plan step fails; the
    ///   feature ends `Disabled`
    pub async fn enable<F: FeatureDriver>(
        &mut self,
        config: F::Config<'_>,
        handler: NotificationHandler,
    ) -> Result<(), SessionError<T>> {
        let plan = F::enable_plan(&self.resolver, config)?;
        debug_assert_eq!(plan.len(), F::enable_steps(&self.resolver, config));
        let source = F::notification(&self.resolver, config)?;

        let slot = &mut self.slots[F::FEATURE.index()];
        if let Some(stale) = slot.subscription.filter(|&old| Some(old) != source) {
            self.transport
                .unsubscribe(stale)
                .await
                .map_err(Error::Transport)?;
            slot.subscription = None;
        }

        let mut transition = Transition::begin(slot);

        if let Some(address) = source {
            if let Err(error) = self.transport.subscribe(address, handler).await {
                if let Some(previous) = transition.fail(false) {
                    // the subscribe failure is the error that matters
                    let _ = self.transport.unsubscribe(previous).await;
                }
                return Err(Error::Transport(error));
            }
            transition.slot.subscription = Some(address);
        }

        transition.submitting();
        match plan.execute_async(&mut self.transport).await {
            Ok(_) => {
                transition.complete();

                #[cfg(feature = "defmt")]
                defmt::debug!("{} enabled ({} steps)", F::FEATURE, plan.len());

                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("{} enable failed at step {}", F::FEATURE, err.step);

                if let Some(address) = transition.fail(err.partially_applied()) {
                    // the step failure is the error that matters
                    let _ = self.transport.unsubscribe(address).await;
                }
                Err(Error::Transport(err.error))
            }
        }
    }

    /// Disable feature `F` and release its notification subscription
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedCapability`] if the variant does not have the
    ///   feature
    /// - [`Error::Transport`] if a disable step fails (state unchanged) or
    ///   the unsubscribe fails (feature already disabled on the device)
    pub async fn disable<F: FeatureDriver>(&mut self) -> Result<(), SessionError<T>> {
        let plan = F::disable_plan(&self.resolver)?;

        plan.execute_async(&mut self.transport)
            .await
            .map_err(|err| {
                #[cfg(feature = "defmt")]
                defmt::warn!("{} disable failed at step {}", F::FEATURE, err.step);
                Error::Transport(err.error)
            })?;

        let slot = &mut self.slots[F::FEATURE.index()];
        slot.state = FeatureState::Disabled;
        slot.partially_applied = false;

        if let Some(address) = slot.subscription {
            self.transport
                .unsubscribe(address)
                .await
                .map_err(Error::Transport)?;
            slot.subscription = None;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("{} disabled", F::FEATURE);

        Ok(())
    }

    /// Build and execute an ad hoc plan
    ///
    /// # Errors
    ///
    /// Returns a build error before any I/O, or the first transport error.
    pub async fn run(&mut self, requests: &[Request<'_>]) -> Result<Readback, SessionError<T>> {
        let plan = command::build(&self.resolver, requests)?;
        plan.execute_async(&mut self.transport)
            .await
            .map_err(|err| Error::Transport(err.error))
    }

    /// Read `len` raw bytes from `capability`
    ///
    /// # Errors
    ///
    /// Returns an error if the capability is unsupported, `len` is too long,
    /// or the transport fails.
    pub async fn read(
        &mut self,
        capability: Capability,
        len: usize,
    ) -> Result<Payload, SessionError<T>> {
        let mut readback = self.run(&[Request::read(capability, len)]).await?;
        Ok(readback.pop().map(|value| value.data).unwrap_or_default())
    }

    /// Write raw bytes to `capability`
    ///
    /// # Errors
    ///
    /// Returns an error if the capability is unsupported, the payload is too
    /// long, or the transport fails.
    pub async fn write(
        &mut self,
        capability: Capability,
        payload: &[u8],
    ) -> Result<(), SessionError<T>> {
        self.run(&[Request::write(capability, payload)])
            .await
            .map(|_| ())
    }

    /// Put the accelerometer in active mode
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub async fn start(&mut self) -> Result<(), SessionError<T>> {
        self.write(Capability::PowerMode, &[POWER_ON]).await
    }

    /// Put the accelerometer in suspend mode
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub async fn stop(&mut self) -> Result<(), SessionError<T>> {
        self.write(Capability::PowerMode, &[POWER_OFF]).await
    }

    /// Read the accumulated step count
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without a step
    /// counter, or a transport error.
    pub async fn read_step_count(&mut self) -> Result<u16, SessionError<T>> {
        let data = self.read(Capability::StepCounterData, STEP_COUNT_LEN).await?;
        Ok(u16::from_le_bytes([data[0], data[1]]))
    }

    /// Reset the step counter to zero
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without a step
    /// counter, or a transport error.
    pub async fn reset_step_counter(&mut self) -> Result<(), SessionError<T>> {
        self.write(Capability::StepCounterReset, &[]).await
    }

    /// Read the raw temperature register
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without a
    /// temperature sensor, or a transport error.
    pub async fn read_temperature(&mut self) -> Result<i16, SessionError<T>> {
        let data = self.read(Capability::Temperature, TEMPERATURE_LEN).await?;
        Ok(i16::from_le_bytes([data[0], data[1]]))
    }

    /// Write per-axis offset compensation
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without offset
    /// registers, or a transport error.
    pub async fn write_offset(&mut self, offset: [i8; 3]) -> Result<(), SessionError<T>> {
        self.write(Capability::Offset, &offset.map(|axis| axis.to_le_bytes()[0]))
            .await
    }

    /// Write the raw downsampling configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without
    /// downsampling, or a transport error.
    pub async fn set_downsampling(&mut self, config: &[u8]) -> Result<(), SessionError<T>> {
        self.write(Capability::Downsampling, config).await
    }

    /// Write the raw data interrupt configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] on variants without the
    /// register, or a transport error.
    pub async fn configure_data_interrupt(&mut self, config: &[u8]) -> Result<(), SessionError<T>> {
        self.write(Capability::DataInterruptConfig, config).await
    }
}

/// Session shared between async tasks
///
/// Every operation holds the lock from the first step of its plan to the
/// last, so plans from different tasks never interleave on the device.
#[cfg(feature = "async")]
pub struct SharedSession<M, T, R = &'static RegisterTable>
where
    M: embassy_sync::blocking_mutex::raw::RawMutex,
{
    inner: embassy_sync::mutex::Mutex<M, SensorSession<T, R>>,
}

#[cfg(feature = "async")]
impl<M, T, R> SharedSession<M, T, R>
where
    M: embassy_sync::blocking_mutex::raw::RawMutex,
    T: AsyncTransport,
    R: ResolveCapability,
{
    /// Wrap a session for sharing
    pub const fn new(session: SensorSession<T, R>) -> Self {
        Self {
            inner: embassy_sync::mutex::Mutex::new(session),
        }
    }

    /// Lock the session for a sequence of operations
    pub async fn lock(
        &self,
    ) -> embassy_sync::mutex::MutexGuard<'_, M, SensorSession<T, R>> {
        self.inner.lock().await
    }

    /// Enable feature `F`; see [`SensorSession::enable`]
    ///
    /// # Errors
    ///
    /// Same as [`SensorSession::enable`].
    pub async fn enable<F: FeatureDriver>(
        &self,
        config: F::Config<'_>,
        handler: NotificationHandler,
    ) -> Result<(), SessionError<T>> {
        self.inner.lock().await.enable::<F>(config, handler).await
    }

    /// Disable feature `F`; see [`SensorSession::disable`]
    ///
    /// # Errors
    ///
    /// Same as [`SensorSession::disable`].
    pub async fn disable<F: FeatureDriver>(&self) -> Result<(), SessionError<T>> {
        self.inner.lock().await.disable::<F>().await
    }

    /// Run an ad hoc plan; see [`SensorSession::run`]
    ///
    /// # Errors
    ///
    /// Same as [`SensorSession::run`].
    pub async fn run(&self, requests: &[Request<'_>]) -> Result<Readback, SessionError<T>> {
        self.inner.lock().await.run(requests).await
    }

    /// Current state of `feature`
    pub async fn state(&self, feature: Feature) -> FeatureState {
        self.inner.lock().await.state(feature)
    }

    /// Unwrap the session
    pub fn into_inner(self) -> SensorSession<T, R> {
        self.inner.into_inner()
    }
}
