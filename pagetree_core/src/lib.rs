//! `pagetree_core` turns a merged multiplatform declaration model into a
//! tree of documentation pages. It provides the content node model, the
//! content builder, clash and divergence resolution, the page creator and
//! the page transformer pipeline.
//!
//! ## Processing Pipeline
//!
//! ```text
//! DModule (one merged declaration tree, variants per source set)
//!   -> Clash resolution (rename or merge declarations sharing a name)
//!   -> Divergence grouping (one table row per name, one instance per variant)
//!   -> Page creator (module -> package -> classlike -> member pages)
//!   -> Page transformers (brief comments, root paths, coverage check)
//! ```
//!
//! ## Modules
//!
//! - [`content`] - Content nodes, metadata and tree rewrites.
//! - [`builder`] - The scoped content builder used by every page.
//! - [`creator`] - Page creation from documentables.
//! - [`transformers`] - Whole-tree rewrites run after page creation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use pagetree_core::PageConfig;
//! use pagetree_core::generate;
//! use pagetree_core::load_module;
//!
//! let module = load_module(Path::new("module.json")).unwrap();
//! let config = PageConfig::load(Path::new(".")).unwrap().unwrap_or_default();
//! let output = generate(&module, config).unwrap();
//!
//! println!("{} pages", output.root.page_count());
//! if output.report.has_errors() {
//!     eprintln!("{} problem(s) logged", output.report.errors);
//! }
//! ```

pub use builder::*;
pub use clash::*;
pub use comments::*;
pub use config::*;
pub use content::*;
pub use creator::*;
pub use divergence::*;
pub use doc::*;
pub use documentable::*;
pub use dri::*;
pub use error::*;
pub use extra::*;
pub use generation::*;
pub use logger::*;
pub use page::*;
pub use sections::*;
pub use signatures::*;
pub use source_set::*;
pub use transformers::*;

pub mod builder;
mod clash;
mod comments;
pub mod config;
pub mod content;
pub mod creator;
mod divergence;
mod doc;
mod documentable;
mod dri;
#[allow(unused_assignments)]
mod error;
mod extra;
mod generation;
mod logger;
mod page;
mod sections;
mod signatures;
mod source_set;
pub mod transformers;

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;
