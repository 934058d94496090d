//! Transport-agnostic core for sending a paired accessory into DFU mode.
//!
//! The platform transport sits behind [`CharacteristicEndpoint`]. A caller
//! snapshots the accessory's services, runs [`probe`] to find the version
//! strings and the DFU control point, then fires [`BootloaderJumpCommand`].
//!
//! # Example
//!
//! ```ignore
//! use hkdfu_controller::{probe, BootloaderJumpCommand, CommandOutcome};
//!
//! let capability = probe(&endpoint, &services).await;
//! if capability.has_control_point() {
//!     let mut command = BootloaderJumpCommand::new();
//!     match command.invoke(&capability, &endpoint, &mut notice).await? {
//!         CommandOutcome::Success => println!("accessory restarting in DFU mode"),
//!         CommandOutcome::Failure(reason) => println!("failed: {reason}"),
//!         CommandOutcome::Timeout => println!("transport timed out"),
//!     }
//! }
//! ```

pub mod accessory;
pub mod command;
pub mod endpoint;
pub mod probe;

pub use accessory::{CharacteristicDescriptor, ServiceDescriptor};
pub use command::{
    BootloaderJumpCommand, CommandOutcome, JumpError, SilentNotice, WaitNotice, WAIT_NOTICE_GRACE,
};
pub use endpoint::{CharacteristicEndpoint, EndpointError};
pub use probe::{probe, CapabilityState, NOT_AVAILABLE};

#[cfg(test)]
pub(crate) mod testing;
