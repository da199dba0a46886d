// tests/addressable_loading.rs
//! Integration tests for addressable pool assets: async template loading,
//! out-of-order completion, and release-before-ready behavior.

use std::sync::Arc;
use std::time::Duration;

use hatchery::content::BundleContentProvider;
use hatchery::pool::prelude::*;

fn projectile_config() -> AddressablePoolAssetConfig {
    AddressablePoolAssetConfig {
        name: "projectiles".to_string(),
        pools: vec![
            AddressablePoolConfig {
                key: AssetKey::new("prefabs/rocket"),
                preload_count: 2,
            },
            AddressablePoolConfig {
                key: AssetKey::new("prefabs/flare"),
                preload_count: 0,
            },
        ],
    }
}

#[tokio::test]
async fn test_ready_flips_once_with_out_of_order_completions() {
    let provider = Arc::new(StaticContentProvider::new());
    // The first configured pool resolves last.
    provider.insert_with_delay("prefabs/rocket", "rocket", Duration::from_millis(40));
    provider.insert("prefabs/flare", "flare");

    let directory = PoolDirectory::new();
    let asset = AddressablePoolAsset::from_config(
        projectile_config(),
        provider,
        Arc::new(MockInstantiator::new()),
    );
    asset.init(None).unwrap();

    // Flare completes first; the asset must not be ready on one of two.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!asset.process_completions(&directory).unwrap());
    assert!(!directory.contains("projectiles"));
    // The pool that did complete is already spawnable before readiness.
    assert!(asset.spawn("flare").is_some());
    assert!(asset.spawn("rocket").is_none());

    asset
        .wait_ready(&directory, Duration::from_secs(1))
        .await
        .unwrap();
    assert!(asset.is_ready());
    assert!(directory.contains("projectiles"));
    assert_eq!(asset.pool_counts("rocket"), Some((2, 0)));

    // Further pumping keeps the asset ready and changes nothing.
    assert!(asset.process_completions(&directory).unwrap());
    assert_eq!(directory.len(), 1);
}

#[tokio::test]
async fn test_spawn_recycle_round_trip_after_async_init() {
    let provider = Arc::new(StaticContentProvider::new());
    provider.insert("prefabs/rocket", "rocket");
    provider.insert("prefabs/flare", "flare");

    let directory = PoolDirectory::new();
    let instantiator = Arc::new(MockInstantiator::new());
    let asset = AddressablePoolAsset::from_config(
        projectile_config(),
        provider,
        instantiator.clone(),
    );
    asset.init(None).unwrap();
    asset
        .wait_ready(&directory, Duration::from_secs(1))
        .await
        .unwrap();

    let rocket = asset.spawn("rocket").unwrap();
    assert_eq!(asset.pool_counts("rocket"), Some((1, 1)));
    asset.recycle(rocket);
    assert_eq!(asset.pool_counts("rocket"), Some((2, 0)));

    // Zero-preload pool grows on demand.
    let flare = asset.spawn("flare").unwrap();
    assert_eq!(asset.pool_counts("flare"), Some((0, 1)));
    asset.recycle(flare);
    assert_eq!(asset.pool_counts("flare"), Some((1, 0)));
    assert_eq!(instantiator.destroyed_count(), 0);
}

#[tokio::test]
async fn test_release_before_ready_ignores_late_completions() {
    let provider = Arc::new(StaticContentProvider::new());
    provider.insert_with_delay("prefabs/rocket", "rocket", Duration::from_millis(30));
    provider.insert_with_delay("prefabs/flare", "flare", Duration::from_millis(30));

    let directory = PoolDirectory::new();
    let instantiator = Arc::new(MockInstantiator::new());
    let asset = AddressablePoolAsset::from_config(
        projectile_config(),
        provider,
        instantiator.clone(),
    );
    asset.init(None).unwrap();

    // Tear down while both loads are still in flight.
    asset.release(&directory).unwrap();

    // Let the loads finish against the released asset.
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(!asset.process_completions(&directory).unwrap());
    assert!(!asset.is_ready());
    assert!(directory.is_empty());
    assert_eq!(instantiator.created_count(), 0);
}

#[tokio::test]
async fn test_reinit_after_release_reaches_ready_again() {
    let provider = Arc::new(StaticContentProvider::new());
    provider.insert("prefabs/rocket", "rocket");
    provider.insert("prefabs/flare", "flare");

    let directory = PoolDirectory::new();
    let asset = AddressablePoolAsset::from_config(
        projectile_config(),
        provider,
        Arc::new(MockInstantiator::new()),
    );

    asset.init(None).unwrap();
    asset
        .wait_ready(&directory, Duration::from_secs(1))
        .await
        .unwrap();
    asset.release(&directory).unwrap();

    asset.init(None).unwrap();
    asset
        .wait_ready(&directory, Duration::from_secs(1))
        .await
        .unwrap();
    assert!(asset.is_ready());
    assert_eq!(directory.len(), 1);
}

#[tokio::test]
async fn test_duplicate_resolved_names_across_keys_is_fatal() {
    let provider = Arc::new(StaticContentProvider::new());
    // Two distinct keys resolving to the same display name.
    provider.insert("prefabs/rocket", "rocket");
    provider.insert("prefabs/rocket_backup", "rocket");

    let config = AddressablePoolAssetConfig {
        name: "broken".to_string(),
        pools: vec![
            AddressablePoolConfig {
                key: AssetKey::new("prefabs/rocket"),
                preload_count: 1,
            },
            AddressablePoolConfig {
                key: AssetKey::new("prefabs/rocket_backup"),
                preload_count: 1,
            },
        ],
    };
    let directory = PoolDirectory::new();
    let asset = AddressablePoolAsset::from_config(
        config,
        provider,
        Arc::new(MockInstantiator::new()),
    );
    asset.init(None).unwrap();

    let result = asset.wait_ready(&directory, Duration::from_secs(1)).await;
    assert!(matches!(result, Err(PoolError::DuplicateName { .. })));
    assert!(!directory.contains("broken"));
}

#[tokio::test]
async fn test_addressable_asset_backed_by_bundle_file() {
    use hatchery::content::{BundleEntry, BundleManifest};

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("projectiles.bundle");
    let manifest = BundleManifest {
        entries: vec![
            BundleEntry {
                key: AssetKey::new("prefabs/rocket"),
                prefab_name: "rocket".to_string(),
            },
            BundleEntry {
                key: AssetKey::new("prefabs/flare"),
                prefab_name: "flare".to_string(),
            },
        ],
    };
    manifest.write_to(&path).await.expect("write bundle");

    let provider = Arc::new(BundleContentProvider::open(&path).await.expect("open"));
    let directory = PoolDirectory::new();
    let asset = AddressablePoolAsset::from_config(
        projectile_config(),
        provider.clone(),
        Arc::new(MockInstantiator::new()),
    );

    asset.init(None).unwrap();
    asset
        .wait_ready(&directory, Duration::from_secs(1))
        .await
        .unwrap();

    let rocket = asset.spawn("rocket").unwrap();
    directory.recycle(rocket);
    assert_eq!(asset.pool_counts("rocket"), Some((2, 0)));

    asset.release(&directory).unwrap();
    assert_eq!(provider.handle_count(&AssetKey::new("prefabs/rocket")), 0);
}
