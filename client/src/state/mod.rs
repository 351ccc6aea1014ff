//! Client-side view-model state.
//!
//! DESIGN
//! ======
//! State is split by concern (`settings`, `notify`, `bedready`) so the
//! pure logic can be tested natively. Handlers never perform I/O; they
//! return [`bedready::Effect`]s for the facade to carry out.

pub mod bedready;
pub mod notify;
pub mod settings;
