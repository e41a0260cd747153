use chrono::Utc;
use env_logger::Env;
use feedcache::feed::FeedItem;
use feedcache::feed_cache::LocalFeedLoader;
use feedcache::storage::database_storage::DatabaseStorage;
use feedcache::storage::file_storage::FileStorage;
use feedcache::storage::storage_trait::Storage;
use feedcache::FeedLoader;
use log::info;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

fn demo_feed() -> Vec<FeedItem> {
    vec![
        FeedItem {
            id: Uuid::new_v4(),
            description: Some("A lighthouse at dusk".to_string()),
            location: Some("Brittany".to_string()),
            url: Url::parse("https://example.com/feed/lighthouse").expect("static url"),
        },
        FeedItem {
            id: Uuid::new_v4(),
            description: None,
            location: Some("Dolomites".to_string()),
            url: Url::parse("https://example.com/feed/ridge").expect("static url"),
        },
    ]
}

#[tokio::main]
async fn main() {
    // Initialize logger (RUST_LOG can override; default to info)
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();

    // Choose an output directory (does not affect backend env defaults)
    let out_dir: PathBuf = env::var("FEEDCACHE_DEMO_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::current_dir()
                .expect("cwd")
                .join("target")
                .join("storage_demo")
        });
    fs::create_dir_all(&out_dir).expect("create output dir");

    // Backends: prefer environment variables if present
    let storage_fs = if env::var("FEEDCACHE_STORAGE_DIR").is_ok() {
        info!("Using FileStorage::new_default() with FEEDCACHE_STORAGE_DIR");
        FileStorage::new_default().expect("create file storage (env)")
    } else {
        info!(
            "Using FileStorage rooted at {} (no FEEDCACHE_STORAGE_DIR)",
            out_dir.display()
        );
        FileStorage::new(&out_dir).expect("create file storage (dir)")
    };

    let db_path = out_dir.join("storage_demo.sqlite3");
    info!("Using DatabaseStorage at {}", db_path.display());
    let storage_db = DatabaseStorage::new_file(&db_path)
        .await
        .expect("create db storage");

    // Insert the same feed into both backends
    let items = demo_feed();
    let timestamp = Utc::now();
    storage_fs
        .insert(&items, timestamp)
        .await
        .expect("insert feed fs");
    storage_db
        .insert(&items, timestamp)
        .await
        .expect("insert feed db");
    info!("Inserted {} items into FS and DB, stamped {}", items.len(), timestamp);

    // Read the snapshots back
    let snapshot_fs = storage_fs
        .retrieve()
        .await
        .expect("retrieve fs")
        .expect("snapshot fs");
    let snapshot_db = storage_db
        .retrieve()
        .await
        .expect("retrieve db")
        .expect("snapshot db");
    info!(
        "Snapshots -> FS: {} items @ {}, DB: {} items @ {}",
        snapshot_fs.items.len(),
        snapshot_fs.timestamp,
        snapshot_db.items.len(),
        snapshot_db.timestamp
    );

    // Store an image payload under its URL in both backends
    let image_url = Url::parse("https://example.com/images/lighthouse.png").expect("static url");
    let payload = b"\x89PNG demo payload".to_vec();
    storage_fs
        .insert_image_data(&image_url, &payload)
        .await
        .expect("insert image fs");
    storage_db
        .insert_image_data(&image_url, &payload)
        .await
        .expect("insert image db");

    let image_fs = storage_fs
        .retrieve_image_data(&image_url)
        .await
        .expect("retrieve image fs")
        .expect("image fs");
    let image_db = storage_db
        .retrieve_image_data(&image_url)
        .await
        .expect("retrieve image db")
        .expect("image db");
    info!(
        "Image payloads -> FS: {} bytes, DB: {} bytes",
        image_fs.len(),
        image_db.len()
    );

    // Run the freshness validation over both backends; the feed was just
    // stamped, so nothing gets evicted
    let loader_fs = LocalFeedLoader::new(Arc::new(storage_fs));
    let loader_db = LocalFeedLoader::new(Arc::new(storage_db));
    loader_fs.validate_cache().await.expect("validate fs");
    loader_db.validate_cache().await.expect("validate db");
    let loaded_fs = loader_fs.load().await.expect("load fs");
    let loaded_db = loader_db.load().await.expect("load db");
    info!(
        "After validation -> FS serves {} items, DB serves {} items",
        loaded_fs.len(),
        loaded_db.len()
    );

    // Export the DB snapshot to a JSON file for easy inspection
    let snapshot_path = out_dir.join("snapshot.json");
    let json = serde_json::to_string_pretty(&snapshot_db).expect("serialize snapshot");
    fs::write(&snapshot_path, json).expect("write snapshot json");
    info!("Snapshot JSON written to {}", snapshot_path.display());

    info!("Demo complete. Inspect files under: {}", out_dir.display());
}
