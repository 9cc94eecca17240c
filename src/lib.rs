//! bookline: plays a directory of audio files as one continuous audiobook.
//!
//! The core is a virtual [`timeline`] over the files and a
//! [`controller`] that keeps it in step with a single-file media engine.

pub mod config;
pub mod controller;
pub mod engine;
pub mod events;
pub mod library;
pub mod model;
pub mod runtime;
pub mod timeline;
