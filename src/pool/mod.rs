//! hatchery::pool - pool assets, the instance pool, and the pool directory
//!
//! Public submodules:
//! - prefab_pool (PrefabPool, the single-template pool)
//! - asset (PrefabPoolAsset, direct-reference variant)
//! - addressable (AddressablePoolAsset, async-loaded variant)
//! - directory (PoolDirectory, cross-cutting recycle access)
//! - stats (PoolStats)
//! - prelude
//!
//! A pool asset owns an ordered set of instance pools and exposes the
//! spawn/recycle/init/release contract. The two variants differ only in how a
//! pool resolves its prefab: the direct variant has it at init time, the
//! addressable variant waits for the content subsystem and flips its ready
//! flag once every configured pool has materialized.

pub mod addressable;
pub mod asset;
pub mod directory;
pub mod prefab_pool;
pub mod prelude;
pub mod stats;

pub use addressable::AddressablePoolAsset;
pub use asset::PrefabPoolAsset;
pub use directory::PoolDirectory;
pub use prefab_pool::PrefabPool;
pub use stats::PoolStats;

use std::time::Duration;

use crate::content::ContentError;
use crate::prefab::{Instance, TemplateId};

/// Errors that can occur during pool asset operations.
///
/// All of these are configuration or lifecycle mistakes surfaced to the
/// immediate caller; lookup misses are deliberately not errors (spawn returns
/// `None`, recycle destroys the orphan) so per-frame code never has to
/// unwind on a missing pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("pool asset '{asset}' has a pool with no usable prefab")]
    MissingPrefab { asset: String },

    #[error("pool asset '{asset}' has a malformed asset key '{key}'")]
    InvalidKey { asset: String, key: String },

    #[error("failed to load prefab for key '{key}': {source}")]
    LoadFailed {
        key: String,
        #[source]
        source: ContentError,
    },

    #[error("duplicate prefab name '{name}' in pool asset '{asset}'")]
    DuplicateName { asset: String, name: String },

    #[error("a pool asset named '{name}' is already registered in the directory")]
    AlreadyRegistered { name: String },

    #[error("pool asset '{asset}' did not become ready within {waited:?}")]
    ReadyTimeout { asset: String, waited: Duration },

    #[error("pool state lock was poisoned")]
    LockPoisoned,
}

/// Common surface of both pool asset variants.
///
/// Object-safe so a [`PoolDirectory`] can hold direct and addressable assets
/// side by side and route recycles to whichever asset owns an instance's
/// template.
pub trait PoolAsset: Send + Sync {
    /// Display name, also the asset's key in the pool directory.
    fn asset_name(&self) -> String;

    /// Whether every configured pool has finished materializing.
    fn is_ready(&self) -> bool;

    /// Spawn by prefab display name. `None` (with a warning) on a miss.
    fn spawn(&self, prefab_name: &str) -> Option<Instance>;

    /// Spawn by template id. `None` (with a warning) on a miss.
    fn spawn_by_id(&self, template: TemplateId) -> Option<Instance>;

    /// Whether this asset owns a pool for the template.
    fn owns(&self, template: TemplateId) -> bool;

    /// Return an instance to its owning pool, or destroy it if no pool in
    /// this asset tracks it as issued.
    fn recycle(&self, instance: Instance);

    /// Tear the asset down: destroy its pools, clear its state, and remove
    /// its entry from the directory.
    fn release_into(&self, directory: &PoolDirectory) -> Result<(), PoolError>;
}
