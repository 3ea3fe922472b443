//! Infrastructure boundary: the device transport contract.

pub mod transport;

pub use transport::{DeviceTransport, PushEvent, TransportError, DEFAULT_REQUEST_TIMEOUT};
