//! Test harness wiring a server map lane to client downlinks over encoded
//! buffers, used by the integration tests of this crate.

mod event_log;
mod test_link;

pub use event_log::{EventLog, Observed};
pub use test_link::{LinkError, TestLink};
