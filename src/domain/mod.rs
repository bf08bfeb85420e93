//! Domain layer: topic tree and its wire format
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod codec;
pub mod entities;
pub mod error;
pub mod tree_traits;

pub use arena::{NodeRef, TopicNode, TopicTree, TreeIterator};
pub use codec::{TreeDict, WireNode};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use tree_traits::TreeNodeConvert;
