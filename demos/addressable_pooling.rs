use std::sync::Arc;
use std::time::Duration;

use hatchery::pool::prelude::*;

#[tokio::main]
async fn main() -> Result<(), PoolError> {
    // Stand-in for a remote/bundled content source with uneven latencies.
    let provider = Arc::new(StaticContentProvider::new());
    provider.insert_with_delay("prefabs/rocket", "rocket", Duration::from_millis(30));
    provider.insert_with_delay("prefabs/flare", "flare", Duration::from_millis(5));

    let config = AddressablePoolAssetConfig {
        name: "projectiles".to_string(),
        pools: vec![
            AddressablePoolConfig {
                key: AssetKey::new("prefabs/rocket"),
                preload_count: 2,
            },
            AddressablePoolConfig {
                key: AssetKey::new("prefabs/flare"),
                preload_count: 1,
            },
        ],
    };

    let directory = PoolDirectory::new();
    let asset = AddressablePoolAsset::from_config(
        config,
        provider,
        Arc::new(PrefabInstantiator),
    );

    asset.init(None)?;
    println!("loads issued, ready: {}", asset.is_ready());

    // A per-frame loop would call process_completions once per update turn.
    while !asset.process_completions(&directory)? {
        println!("waiting for prefab loads...");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    println!("ready, registered in directory: {}", directory.contains("projectiles"));

    let rocket = asset.spawn("rocket").expect("preloaded");
    println!("spawned {} ({})", rocket.name(), rocket.template_id());
    directory.recycle(rocket);
    println!("rocket pool: {:?}", asset.pool_counts("rocket"));

    asset.release(&directory)?;
    println!("released, directory empty: {}", directory.is_empty());
    Ok(())
}
