//! Social Map - lays out who-wrote-to-whom letter networks.
//!
//! A run turns a wide letters table into a filtered graph, ranks its nodes by
//! centrality, pins the most central ones on a circle and places everything
//! else with a general layout algorithm. Drawing is left to the caller.

pub mod anchors;
pub mod centrality;
pub mod config;
pub mod edges;
pub mod error;
pub mod export;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod pipeline;

pub use config::{CentralitySelect, Configuration, LayoutSelect, RenderHints};
pub use error::{Result, SocialMapError};
pub use graph::{count_letters, SocialGraph};
pub use pipeline::{run, SocialMap};
