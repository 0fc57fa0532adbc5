//! Leave workflow: balance accounting, request lifecycle, role policy and
//! the service that ties them to storage.

pub mod balance;
pub mod error;
pub mod lifecycle;
pub mod policy;
pub mod service;

pub use error::LeaveError;
pub use service::RequestService;
