//! Transport seam for the accelerometer module
//!
//! Register reads and writes go through the `device-driver`
//! [`RegisterInterface`](device_driver::RegisterInterface) traits (blocking
//! and async), addressed by a plain `u8` register address. The transport is
//! already scoped to the accelerometer module, so the module id never
//! appears here.
//!
//! Asynchronous notifications are keyed by the same register address. The
//! transport delivers each payload to the handler registered for that
//! address, unopened; decoding belongs to whoever installed the handler.

use crate::RegisterAddress;

/// Callback invoked with the raw payload of a notification
pub type NotificationHandler = fn(&[u8]);

/// Notification routing keyed by register address
pub trait NotificationInterface {
    /// Transport error type
    type Error;

    /// Route notifications for `address` to `handler`, replacing any
    /// previous handler for that address
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the subscription cannot be set up.
    fn subscribe(
        &mut self,
        address: RegisterAddress,
        handler: NotificationHandler,
    ) -> Result<(), Self::Error>;

    /// Stop routing notifications for `address`
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the subscription cannot be removed.
    fn unsubscribe(&mut self, address: RegisterAddress) -> Result<(), Self::Error>;
}

/// Async notification routing keyed by register address
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncNotificationInterface {
    /// Transport error type
    type Error;

    /// Route notifications for `address` to `handler`, replacing any
    /// previous handler for that address
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the subscription cannot be set up.
    async fn subscribe(
        &mut self,
        address: RegisterAddress,
        handler: NotificationHandler,
    ) -> Result<(), Self::Error>;

    /// Stop routing notifications for `address`
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the subscription cannot be removed.
    async fn unsubscribe(&mut self, address: RegisterAddress) -> Result<(), Self::Error>;
}

/// Blocking transport: register access plus notification routing with one
/// error type
pub trait Transport:
    device_driver::RegisterInterface<AddressType = RegisterAddress>
    + NotificationInterface<Error = <Self as device_driver::RegisterInterface>::Error>
{
}

impl<T> Transport for T where
    T: device_driver::RegisterInterface<AddressType = RegisterAddress>
        + NotificationInterface<Error = <T as device_driver::RegisterInterface>::Error>
{
}

/// Async transport: register access plus notification routing with one
/// error type
#[cfg(feature = "async")]
pub trait AsyncTransport:
    device_driver::AsyncRegisterInterface<AddressType = RegisterAddress>
    + AsyncNotificationInterface<Error = <Self as device_driver::AsyncRegisterInterface>::Error>
{
}

#[cfg(feature = "async")]
impl<T> AsyncTransport for T where
    T: device_driver::AsyncRegisterInterface<AddressType = RegisterAddress>
        + AsyncNotificationInterface<Error = <T as device_driver::AsyncRegisterInterface>::Error>
{
}
