#![doc = "codedoc-core: core logic library for codedoc."]

//! This crate contains the highlighter, the documentation components and the
//! static site build pipeline used by the `codedoc` CLI.
//!
//! # Usage
//! Add this as a dependency for anything that renders code samples or builds
//! documentation pages. All filesystem and clipboard access goes through the
//! traits in [`build`] and [`clipboard`] so they can be mocked in tests.

pub mod build;
pub mod clipboard;
pub mod config;
pub mod copy_feedback;
pub mod highlight;
pub mod html;
pub mod render;
pub mod site;
