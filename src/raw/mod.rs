mod arena;
mod handle;
mod navigate;
mod node;
mod raw_sgtree_map;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use navigate::{predecessor, successor};
pub(crate) use node::Node;
pub(crate) use raw_sgtree_map::{InsertResult, RawSGTreeMap};
