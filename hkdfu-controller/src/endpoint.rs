//! Transport seam: asynchronous characteristic reads and writes.
//!
//! The platform layer (BLE stack, home-automation framework, test double)
//! owns connection state, pairing, and its own timeouts. The core never
//! blocks and never retries on its behalf.

use uuid::Uuid;

/// Failure reported by the platform transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    /// Platform failure; the description is surfaced to the caller verbatim.
    #[error("{0}")]
    Transport(String),
    /// The transport's own timeout elapsed.
    #[error("operation timed out")]
    TimedOut,
}

/// Asynchronous read/write access to one accessory's characteristics.
///
/// Each call resolves exactly once.
#[allow(async_fn_in_trait)]
pub trait CharacteristicEndpoint {
    async fn read_value(&self, id: Uuid) -> Result<Vec<u8>, EndpointError>;
    async fn write_value(&self, id: Uuid, payload: &[u8]) -> Result<(), EndpointError>;
}
