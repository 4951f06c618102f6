// Copyright 2026 Gatherer Access Contributors
// SPDX-License-Identifier: Apache-2.0

//! Thin access layer for the Gatherer card database.
//!
//! Builds query URLs, issues HTTP GETs over a shared keep-alive connection,
//! follows redirects manually so each hop can be cached, and routes every
//! fetch through a pluggable fetch-or-compute response cache.
//!
//! Most callers go through the shared [`GathererAccess`] instance:
//!
//! ```no_run
//! # async fn demo() -> gatherer_access::Result<()> {
//! let page = gatherer_access::instance().card("193871").await?;
//! println!("{}", page.body);
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod cache;
pub mod config;
pub mod error;
pub mod response;

pub use access::{instance, GathererAccess};
pub use cache::{CacheKey, FetchCache, MemoryCache, NoopCache};
pub use config::{configure, CacheBackend, Configuration};
pub use error::{Error, Result};
pub use response::GathererResponse;
