//! jackc-vm — Hack VM Instruction Emitter
//!
//! A pure, IO-free text producer for the stack-oriented Hack VM assembly
//! language: `push`/`pop` against the eight memory segments, the nine
//! arithmetic/logical operators, branches, and subroutine call/define/
//! return. This crate knows nothing about Jack; it is the formatting layer
//! the parser drives.

mod emitter;
mod segment;

pub use emitter::Emitter;
pub use segment::{ArithOp, Segment};
