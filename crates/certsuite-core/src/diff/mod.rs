//! Comparison engines for the three artifact domains.
//!
//! Every differ is a pure function of two immutable inputs:
//!
//! ```ignore
//! use certsuite_core::diff::{diff_bundles, diff_global_objects, diff_interfaces};
//!
//! let bundle_entries = diff_bundles(&reference_bundle, &device_bundle);
//! let web_idl = diff_interfaces(Context::Web, &declarations, &observed_web);
//! let web_globals = diff_global_objects(Context::Web, &reference_web, &device_web);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: entries are sorted (paths lexicographically, interface
//!   entries by interface then member name).
//! - **Partitioning**: each compared item lands in at most one result list.
//! - **No noise**: identical inputs produce empty results.

pub mod bundle;
pub mod global_object;
pub mod interface;
pub mod line_diff;
pub mod summary;

pub use bundle::diff_bundles;
pub use global_object::diff_global_objects;
pub use interface::diff_interfaces;
pub use summary::render_summary;
