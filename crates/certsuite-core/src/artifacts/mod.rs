//! Loaders that turn collected artifacts into the typed model.
//!
//! Every loader fails with a `MalformedArtifact` error when its input cannot
//! be unpacked or parsed. Failure is scoped to that one artifact.

pub mod bundle;
pub mod global_objects;
pub mod informative;
pub mod observed;
pub mod webidl;

pub use bundle::load_bundle;
pub use global_objects::{load_global_objects, parse_global_objects};
pub use informative::load_informative;
pub use observed::{load_observed, parse_observed};
pub use webidl::{parse_webidl, WebIdlCorpus};
