//! Time, retry and frame-acquisition plumbing shared by every matcher call.

pub mod capture;
pub mod clock;
pub mod retry;

pub use capture::acquire_frame;
pub use clock::{Clock, SimulatedClock, SystemClock};
pub use retry::RetryPolicy;
