//! Application-level orchestration.
//!
//! This module owns the action lifecycle: it serializes execution runs,
//! validates input before any request is issued, and guarantees that every
//! started action ends in exactly one terminal event. UI/CLI layers talk to
//! it through channels only.

mod controller;

pub(crate) use controller::{run_controller, UiCommand};
