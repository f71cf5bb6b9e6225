//! # Routine registry
//!
//! Maps command names to [`Routine`]s and turns string tokens into typed arguments before a
//! routine runs. A routine's [`Signature`] is fixed when it is built; [`cast`] checks arity and
//! parameter kinds on every call and refuses the call before the routine body executes.

pub mod invocation;
pub mod registry;
pub mod routine;
pub mod signature;

pub use invocation::Invocation;
pub use registry::RoutineRegistry;
pub use routine::{Action, IntoReply, IntoRoutine, Param, Routine};
pub use signature::{cast, cast_invocation, Signature};
