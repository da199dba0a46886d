use std::sync::Arc;

use hatchery::pool::prelude::*;

fn main() -> Result<(), PoolError> {
    let directory = PoolDirectory::new();
    let config = PrefabPoolAssetConfig {
        name: "effects".to_string(),
        pools: vec![
            PrefabPoolConfig {
                prefab_name: "fireball".to_string(),
                preload_count: 4,
            },
            PrefabPoolConfig {
                prefab_name: "smoke".to_string(),
                preload_count: 0,
            },
        ],
    };

    let parent = ParentContext::new("effects-root");
    let asset = PrefabPoolAsset::from_config(config, Arc::new(PrefabInstantiator));
    asset.init(Some(parent), &directory)?;
    println!("asset ready: {}", asset.is_ready());
    println!("fireball pool: {:?}", asset.pool_counts("fireball"));

    // Spawn a burst of fireballs, more than were preloaded.
    let mut burst = Vec::new();
    for _ in 0..6 {
        if let Some(instance) = asset.spawn("fireball") {
            burst.push(instance);
        }
    }
    println!("after burst: {:?}", asset.pool_counts("fireball"));

    // Any system holding the directory can hand them back.
    for instance in burst {
        directory.recycle(instance);
    }
    println!("after recycle: {:?}", asset.pool_counts("fireball"));

    // Zero-preload pools grow on demand.
    let smoke = asset.spawn("smoke").expect("grows on demand");
    println!("smoke instance active: {}", smoke.is_active());
    asset.recycle(smoke);

    asset.release(&directory)?;
    println!("directory empty after release: {}", directory.is_empty());
    Ok(())
}
