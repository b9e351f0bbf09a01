//! # Vitrine Architecture
//!
//! Vitrine is the catalog core of a storefront back office: a
//! Category → Subcategory → Attribute taxonomy, the mutations that edit it,
//! product counters over it, and the filter/sort/paginate engine that narrows
//! a product listing by it. It is a library first; the `vitrine` CLI is one
//! client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (crates/vitrine)                                       │
//! │  - Parses arguments, renders output, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - CatalogApi<S>: one entry point over shared services      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Services (commands/) and Engine (filter/)                  │
//! │  - Taxonomy mutations + refresh, counters                   │
//! │  - Filter state reducer, client and server modes            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - CatalogStore + ProductStore traits                       │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Model
//!
//! The in-memory tree is never edited directly. Each mutation is one store
//! call followed by a forced refresh that rebuilds the tree from the store's
//! rows. Refreshes go through [`throttle::FetchThrottle`], which drops
//! overlapping or too-frequent requests.
//!
//! ## No I/O Assumptions
//!
//! From `api.rs` inward nothing writes to stdout or stderr. Operator
//! diagnostics go to `tracing`; user-facing messages go to a
//! [`commands::Notifier`].
//!
//! ## Module Overview
//!
//! - [`api`]: facade
//! - [`commands`]: taxonomy and counter services, notices
//! - [`filter`]: filter state, client/server modes, pagination
//! - [`taxonomy`]: tree assembly and lookups
//! - [`model`]: rows, tree nodes, products, counters
//! - [`ids`]: identifier canonicalization and the UUID gate
//! - [`throttle`], [`ops`]: refresh throttling, per-operation in-flight state
//! - [`store`]: storage traits and backends
//! - [`config`], [`error`]

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod ids;
pub mod model;
pub mod ops;
pub mod store;
pub mod taxonomy;
pub mod throttle;
