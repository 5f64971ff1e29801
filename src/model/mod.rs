//! # Graph Model
//!
//! Plain DTOs for the entity/document graph. These cross every boundary:
//! store ↔ expansion ↔ service ↔ wire.
//!
//! This module is pure data: no I/O, no locks, no async.

pub mod node;
pub mod edge;
pub mod attributes;
pub mod window;
pub mod fragment;

pub use node::Node;
pub use edge::Edge;
pub use attributes::{Attributes, attrs};
pub use window::TimeWindow;
pub use fragment::GraphFragment;
