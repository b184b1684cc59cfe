//! Navigation gate: picks the UI graph from the session phase and re-mounts
//! it whenever the user crosses the authentication boundary.

pub mod gate;
pub mod graph;

pub use gate::{ActiveGraph, NavigationError, NavigationGate};
pub use graph::{graph_for, GraphKind, Route};
