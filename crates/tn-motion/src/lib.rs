//! `tn-motion` — the closed-loop `MoveTo` controller.
//!
//! # Tick loop
//!
//! [`MotionExecutor::move_to`] repeats, until it returns:
//!
//! ```text
//! wait for priority → refresh snapshot → interrupt? → region changed?
//!   → arrived / stationary band? → closed door ahead? → teleport cooldown?
//!   → hostile entity in the way? → fault detection (round trip, stuck)
//!   → blocked recovery → movement ability → search → one command
//! ```
//!
//! Every fault is an ordinary [`MotionFault`] value; the loop never panics
//! on a navigation failure.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`executor`] | `MotionExecutor`: the tick loop                            |
//! | [`request`]  | `MoveRequest` (builder), `MoveOutcome`                     |
//! | [`state`]    | `MotionFaultState`: stuck / round-trip bookkeeping         |
//! | [`profile`]  | `LocomotionProfile`: which movement ability to keep up     |
//! | [`error`]    | `MotionFault`, `MotionResult<T>`                           |

pub mod error;
pub mod executor;
pub mod profile;
pub mod request;
pub mod state;


pub use error::{MotionFault, MotionResult};
pub use executor::MotionExecutor;
pub use profile::LocomotionProfile;
pub use request::{EntityFilter, MoveOutcome, MoveRequest};
pub use state::MotionFaultState;
