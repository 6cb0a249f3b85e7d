//! Common test utilities and mock implementations


#[allow(unused_imports)]
pub use mock_transport::{MockError, MockTransport, Operation};

use bosch_accel_regmap::{SensorSession, Variant};

/// Create a session over a mock transport
/// Returns (session, transport) where transport is a clone that shares state with the session
#[allow(dead_code)]
pub fn create_session(variant: Variant) -> (SensorSession<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    let session = SensorSession::new(transport.clone(), variant);
    (session, transport)
}

/// Notification handler that ignores its payload
#[allow(dead_code)]
pub fn ignore(_payload: &[u8]) {}
