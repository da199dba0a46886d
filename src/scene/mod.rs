//! hatchery::scene - placement contexts and local transforms
//!
//! Public submodules:
//! - transform (Vec3, Quat, Transform)
//!
//! The placement context is the container idle instances are parented to.
//! It is a lightweight handle into the host engine's scene graph; hatchery
//! only records which context an instance is attached to.

pub mod transform;

pub use transform::{Quat, Transform, Vec3};

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a placement context, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Handle to the container instances are attached to while idle or on recycle.
///
/// Cloning the handle keeps the same identity, so clones refer to the same
/// context in the host scene graph.
#[derive(Debug, Clone)]
pub struct ParentContext {
    id: ContextId,
    label: String,
}

impl ParentContext {
    /// Create a new context with a human-readable label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: ContextId::next(),
            label: label.into(),
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for ParentContext {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ParentContext {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_ids_are_unique() {
        let a = ParentContext::new("idle");
        let b = ParentContext::new("idle");
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_cloned_context_keeps_identity() {
        let a = ParentContext::new("pool-root");
        let b = a.clone();
        assert_eq!(a.id(), b.id());
        assert_eq!(a, b);
        assert_eq!(b.label(), "pool-root");
    }
}
