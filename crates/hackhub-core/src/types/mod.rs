//! Core type definitions used across the HackHub workspace.

pub mod id;

pub use id::*;
