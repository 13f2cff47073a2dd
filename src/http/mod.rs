pub mod client;
pub mod request;
pub mod response;

pub use client::{DEFAULT_TIMEOUT, HttpProber, Prober};
pub use response::{ProbeOutcome, ResponseBody, TransportFailureKind};
