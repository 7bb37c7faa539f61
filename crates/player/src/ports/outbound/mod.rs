//! Outbound ports - Interfaces for external services
//!
//! The session engine talks to the network and to the hosting shell only
//! through these traits, so it can be driven by mocks in tests.

pub mod navigation_port;
pub mod transport_port;

pub use navigation_port::Navigator;
pub use transport_port::GameTransport;

#[cfg(any(test, feature = "testing"))]
pub use navigation_port::MockNavigator;
#[cfg(any(test, feature = "testing"))]
pub use transport_port::MockGameTransport;
