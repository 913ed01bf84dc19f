//! # Prompt Templates
//!
//! Fixed instructions sent to the inference provider. They are part of the
//! extraction contract and are not overridable at runtime.

pub mod extraction;
