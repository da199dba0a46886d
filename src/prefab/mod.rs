//! hatchery::prefab - templates, identities, and pooled instances
//!
//! A `Prefab` is the reusable content definition instances are cloned from.
//! Every prefab receives a process-unique `TemplateId` when it is created, and
//! every instance carries the id of the prefab it was cloned from. Pools and
//! registries key everything by `TemplateId`, so two prefabs that happen to
//! share a display name can never collide with each other.
//!
//! The addressable variant refers to prefabs indirectly through an `AssetKey`
//! that the content subsystem resolves asynchronously.

pub mod instantiator;

pub use instantiator::{Instantiator, MockInstantiator, PrefabInstantiator};

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::scene::{ContextId, ParentContext, Transform};

static NEXT_TEMPLATE_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Typed identity of a prefab template.
///
/// Assigned when the prefab is created and stable for the lifetime of its
/// owning pool. Ids are unique across the whole process, so lookups routed
/// through a pool directory can never confuse templates from different
/// pool assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateId(u32);

impl TemplateId {
    fn next() -> Self {
        Self(NEXT_TEMPLATE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template#{}", self.0)
    }
}

/// Unique identity of a live instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Async-resolvable reference to a prefab in the content subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetKey(String);

impl AssetKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is well-formed enough to hand to a content provider.
    ///
    /// An empty or all-whitespace key is an authoring mistake and is rejected
    /// before any load is issued.
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Reusable content definition instances are cloned from.
///
/// The actual content (meshes, materials) lives in the host engine; hatchery
/// only needs the identity and display name.
#[derive(Debug)]
pub struct Prefab {
    id: TemplateId,
    name: String,
}

impl Prefab {
    /// Create a prefab with a fresh template id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TemplateId::next(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One poolable clone of a prefab.
///
/// Instances are plain values: a pool hands ownership to the caller on spawn
/// and takes it back on recycle, so an instance can never be held by two
/// owners at once.
#[derive(Debug)]
pub struct Instance {
    id: InstanceId,
    template_id: TemplateId,
    name: String,
    /// Local pose, reset to neutral whenever the instance is pooled.
    pub transform: Transform,
    active: bool,
    parent: Option<ContextId>,
}

impl Instance {
    /// Clone a new instance from a prefab. Starts inactive, unparented, at
    /// the neutral pose, tagged with the prefab's name and template id.
    pub fn new(prefab: &Prefab) -> Self {
        Self {
            id: InstanceId::next(),
            template_id: prefab.id(),
            name: prefab.name().to_string(),
            transform: Transform::default(),
            active: false,
            parent: None,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn template_id(&self) -> TemplateId {
        self.template_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn parent(&self) -> Option<ContextId> {
        self.parent
    }

    /// Attach the instance to a placement context.
    pub fn attach(&mut self, context: &ParentContext) {
        self.parent = Some(context.id());
    }

    /// Detach the instance from its placement context.
    pub fn detach(&mut self) {
        self.parent = None;
    }
}
