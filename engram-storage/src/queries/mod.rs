//! Query modules, one per concern. Free functions over `&Connection`;
//! the [`crate::store::MemoryStore`] facade routes them through the pool.

pub mod access_ops;
pub mod maintenance;
pub mod memory_crud;
pub mod memory_search;

pub(crate) use memory_crud::row_to_memory;

/// Column list shared by every SELECT that hydrates a full `Memory`.
pub(crate) const MEMORY_COLUMNS: &str = "id, content, who, why, created_at, project, \
     session_id, importance, last_accessed, access_count, type, tags, pinned, \
     updated_at, updated_by";
