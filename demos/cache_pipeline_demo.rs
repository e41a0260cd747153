use env_logger::Env;
use feedcache::composites::{
    FeedLoaderCacheDecorator, FeedLoaderWithFallback, ImageDataLoaderCacheDecorator,
    ImageDataLoaderWithFallback,
};
use feedcache::feed::{FeedItem, FeedLoader};
use feedcache::feed_cache::LocalFeedLoader;
use feedcache::image::{ImageDataLoader, ImageLoadTask};
use feedcache::image_cache::LocalImageDataLoader;
use feedcache::storage::file_storage::FileStorage;
use feedcache::{FeedCache, FeedError, ImageDataCache, ImageError};
use log::info;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

/// Stand-in for the network feed API: serves a fixed feed until told to fail.
struct RemoteFeedStub {
    offline: AtomicBool,
    hits: AtomicUsize,
}

impl RemoteFeedStub {
    fn new() -> Arc<Self> {
        Arc::new(RemoteFeedStub {
            offline: AtomicBool::new(false),
            hits: AtomicUsize::new(0),
        })
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl FeedLoader for RemoteFeedStub {
    async fn load(&self) -> Result<Vec<FeedItem>, FeedError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(FeedError::Connectivity);
        }
        Ok(vec![
            FeedItem {
                id: Uuid::new_v4(),
                description: Some("A lighthouse at dusk".to_string()),
                location: Some("Brittany".to_string()),
                url: Url::parse("https://example.com/feed/lighthouse").expect("static url"),
            },
            FeedItem {
                id: Uuid::new_v4(),
                description: Some("Ridge line before the storm".to_string()),
                location: Some("Dolomites".to_string()),
                url: Url::parse("https://example.com/feed/ridge").expect("static url"),
            },
        ])
    }
}

/// Stand-in for the network image API.
struct RemoteImageStub {
    hits: AtomicUsize,
}

impl RemoteImageStub {
    fn new() -> Arc<Self> {
        Arc::new(RemoteImageStub {
            hits: AtomicUsize::new(0),
        })
    }
}

impl ImageDataLoader for RemoteImageStub {
    fn load_image_data(&self, url: &Url) -> ImageLoadTask {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let payload = format!("remote bytes for {}", url).into_bytes();
        let (task, delivery) = ImageLoadTask::pending();
        tokio::spawn(async move {
            delivery.deliver(Ok(payload));
        });
        task
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger (RUST_LOG can override; default to info)
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();

    let out_dir: PathBuf = env::var("FEEDCACHE_DEMO_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::current_dir()
                .expect("cwd")
                .join("target")
                .join("pipeline_demo")
        });
    fs::create_dir_all(&out_dir).expect("create output dir");
    info!("Cache pipeline rooted at {}", out_dir.display());

    let storage = Arc::new(FileStorage::new(&out_dir).expect("create file storage"));

    // Feed pipeline: remote first, write-through into the local cache,
    // local cache as the fallback when the remote is unreachable
    let remote_feed = RemoteFeedStub::new();
    let local_feed = Arc::new(LocalFeedLoader::new(storage.clone()));
    let feed_pipeline = FeedLoaderWithFallback::new(
        Arc::new(FeedLoaderCacheDecorator::new(
            remote_feed.clone(),
            local_feed.clone() as Arc<dyn FeedCache>,
        )),
        local_feed.clone(),
    );

    // First load: the remote is healthy, and the decorator populates the cache
    let items = feed_pipeline.load().await.expect("initial load");
    info!(
        "Online load -> {} items from the remote (remote hits: {})",
        items.len(),
        remote_feed.hits.load(Ordering::SeqCst)
    );

    // Give the detached write-through a moment to land before going offline
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    remote_feed.go_offline();
    let cached = feed_pipeline.load().await.expect("offline load");
    info!(
        "Offline load -> {} items served from the local cache (remote hits: {})",
        cached.len(),
        remote_feed.hits.load(Ordering::SeqCst)
    );

    // Image pipeline: local cache first, remote as fallback with write-through
    let remote_image = RemoteImageStub::new();
    let local_image = Arc::new(LocalImageDataLoader::new(storage.clone()));
    let image_pipeline = ImageDataLoaderWithFallback::new(
        local_image.clone() as Arc<dyn ImageDataLoader>,
        Arc::new(ImageDataLoaderCacheDecorator::new(
            remote_image.clone(),
            local_image.clone() as Arc<dyn ImageDataCache>,
        )),
    );

    let image_url = Url::parse("https://example.com/images/lighthouse.png").expect("static url");

    // Cold load: the local cache misses, the remote serves, the decorator caches
    let first = image_pipeline
        .load_image_data(&image_url)
        .outcome()
        .await
        .expect("image delivery")
        .expect("image bytes");
    info!(
        "Cold image load -> {} bytes (remote hits: {})",
        first.len(),
        remote_image.hits.load(Ordering::SeqCst)
    );

    // Give the image write-through a moment to land
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    // Warm load: the local cache answers, the remote stays untouched
    let second = image_pipeline
        .load_image_data(&image_url)
        .outcome()
        .await
        .expect("image delivery")
        .expect("image bytes");
    info!(
        "Warm image load -> {} bytes (remote hits: {})",
        second.len(),
        remote_image.hits.load(Ordering::SeqCst)
    );

    // A cancelled request completes silently: the work may still run, but
    // nothing is delivered
    let cancelled = image_pipeline.load_image_data(&image_url);
    cancelled.cancel();
    match cancelled.outcome().await {
        None => info!("Cancelled image load delivered nothing, as promised"),
        Some(result) => info!("Unexpected delivery after cancel: {:?}", result.map(|d| d.len())),
    }

    // Direct save through the image cache trait, then a pipeline read
    let direct_url = Url::parse("https://example.com/images/direct.png").expect("static url");
    local_image
        .save_image_data(b"hand-written payload".to_vec(), &direct_url)
        .await
        .expect("direct save");
    let direct = image_pipeline
        .load_image_data(&direct_url)
        .outcome()
        .await
        .expect("image delivery");
    match direct {
        Ok(data) => info!("Direct save read back {} bytes via the pipeline", data.len()),
        Err(ImageError::NotFound) => info!("Direct save not visible yet"),
        Err(e) => info!("Direct read failed: {}", e),
    }

    info!("Demo complete. Inspect files under: {}", out_dir.display());
}
