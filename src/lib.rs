// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 The gitbook2mkdocs contributors

//! Convert GitBook markdown exports into MkDocs-ready documentation.
//!
//! This crate provides the two conversions needed when moving a GitBook
//! space to MkDocs:
//!
//! 1. Rewriting GitBook-only markup (`{% code %}`, `{% embed %}` and
//!    `{% hint %}` blocks, stray `&#xNAN;` entities, backslash line breaks)
//!    into plain markdown and Material admonitions
//! 2. Turning a GitBook `SUMMARY.md` link list into an MkDocs `nav:` block
//!
//! # Example
//!
//! ```
//! use gitbook2mkdocs::{cleaner, nav};
//!
//! let page = "{% hint style=\"success\" %}\nAll good.\n{% endhint %}";
//! assert_eq!(cleaner::clean_text(page), "\n\n!!! tip\n    All good.\n\n");
//!
//! let summary = "- [Home](README.md)\n- [Guide](guide.md)\n";
//! let rendered = nav::summary_to_nav(summary).unwrap();
//! assert_eq!(rendered, "nav:\n  - Home: index.md\n  - Guide: guide.md\n");
//! ```
//!
//! # Modules
//!
//! - [`cleaner`]: GitBook markup rewriting for single pages and whole trees
//! - [`nav`]: `SUMMARY.md` parsing and MkDocs navigation rendering

#![deny(missing_docs)]

pub mod cleaner;
mod lines;
pub mod nav;
