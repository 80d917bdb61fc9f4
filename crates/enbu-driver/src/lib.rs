//! The browser-driver subprocess adapter: one fresh subprocess per command,
//! JSON-over-stdout, mapped onto a typed error taxonomy (§4.2).

pub mod adapter;
pub mod error;
pub mod response;

pub use adapter::DriverAdapter;
pub use error::{classify_driver_failure, DriverError};
pub use response::{DriverResponse, SnapshotData, SnapshotRef};
