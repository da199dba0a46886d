//! # Hatchery - Prefab Instance Pooling
//!
//! Hatchery pre-allocates and reuses instances cloned from prefab templates so
//! game runtimes never pay creation/destruction cost in the middle of a frame.
//! Pools are grouped into pool assets with at-most-one-owner spawn/recycle
//! semantics, and the addressable variant defers readiness until the content
//! subsystem has resolved every template.
//!
//! ## Core Features
//!
//! - **Instance Pools**: free-stack reuse with on-demand growth and strict
//!   issued-set tracking (stray instances are destroyed, never double-pooled)
//! - **Pool Assets**: direct and addressable variants behind one trait, with
//!   name-, key-, and template-id-keyed spawning
//! - **Pool Directory**: explicit service object for cross-cutting recycle
//!   access, populated as assets become ready
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use hatchery::pool::prelude::*;
//!
//! # fn main() -> Result<(), PoolError> {
//! let directory = PoolDirectory::new();
//! let config = PrefabPoolAssetConfig {
//!     name: "combat".to_string(),
//!     pools: vec![PrefabPoolConfig {
//!         prefab_name: "fireball".to_string(),
//!         preload_count: 4,
//!     }],
//! };
//!
//! let asset = PrefabPoolAsset::from_config(config, Arc::new(PrefabInstantiator));
//! asset.init(None, &directory)?;
//!
//! let instance = asset.spawn("fireball").expect("pool is ready");
//! asset.recycle(instance);
//! asset.release(&directory)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod content;
pub mod pool;
pub mod prefab;
pub mod scene;

pub use pool::{AddressablePoolAsset, PoolAsset, PoolDirectory, PoolError, PrefabPoolAsset};
pub use prefab::{AssetKey, Instance, Prefab, TemplateId};
