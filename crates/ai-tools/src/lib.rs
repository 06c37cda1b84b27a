//! Tooling primitives for deterministic game AI.
//!
//! This crate is intentionally lightweight and engine-agnostic. Inspectors and
//! dashboards consume the recorded events; nothing here feeds back into
//! simulation decisions.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{LogTraceSink, NullTraceSink, TraceEvent, TraceLog, TraceSink};
