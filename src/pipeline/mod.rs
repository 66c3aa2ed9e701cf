//! The document pipeline: the engine seam and the adapter that drives it.
//!
//! All OCR, layout analysis, and markdown rendering is delegated to an
//! external engine; this crate only owns how it is invoked and how its
//! output is reshaped.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ open ──▶ classify ──▶ analyze ──▶ parse ──▶ render ──▶ text
//!         (backend)                (engine stages)               (coalesce)
//! ```
//!
//! 1. [`backend`] — the engine's four-stage contract as object-safe traits,
//!    so tests and embedders can substitute their own implementation
//! 2. [`process`] — the shipped backend: drives a vendor engine command as
//!    a subprocess, one invocation per stage
//! 3. [`adapter`]  — workspace lifecycle, the fixed stage sequence, and the
//!    compatibility shim that coalesces the engine's unstable result shapes
//!    into plain markdown text

pub mod adapter;
pub mod backend;
pub mod process;
