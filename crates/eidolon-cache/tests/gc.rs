//! Garbage collector sweep: orphan round-trip, stem matching across
//! re-encoded sources, ambiguous names, and directory pruning.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use eidolon_cache::{GarbageCollector, variant_token};
use eidolon_core::ImageKind;
use eidolon_store::{
    BlobStore, DirListing, DiskBlobStore, MemBlobStore, MemStateCache, StateCache, StoreError,
    StoreResult,
};
use tempfile::TempDir;

async fn seed_variant(
    cache: &MemBlobStore,
    state: &MemStateCache,
    source_name: &str,
    width: u32,
) -> (String, String) {
    let token = variant_token(source_name, width, ImageKind::Webp, Some(91), "op");
    let stem = eidolon_core::stem_of(source_name);
    let dir = eidolon_core::rel_dir(source_name);
    let rel_path = eidolon_core::join_rel(dir, &format!("{stem}.{token}.webp"));
    cache
        .write(&rel_path, Bytes::from_static(b"variant"))
        .await
        .unwrap();
    state.set(&token, "{}").await.unwrap();
    (rel_path, token)
}

#[tokio::test]
async fn sweep_removes_exactly_the_orphans() {
    let cache = Arc::new(MemBlobStore::new());
    let sources = Arc::new(MemBlobStore::new());
    let state = Arc::new(MemStateCache::new());

    for name in ["photos/cat.jpg", "logo.png"] {
        sources.write(name, Bytes::from_static(b"src")).await.unwrap();
    }

    let (cat_path, cat_token) = seed_variant(&cache, &state, "photos/cat.jpg", 480).await;
    let (logo_path, logo_token) = seed_variant(&cache, &state, "logo.png", 480).await;
    let (dog_path, dog_token) = seed_variant(&cache, &state, "photos/dog.jpg", 480).await;
    let (dog2_path, dog2_token) = seed_variant(&cache, &state, "photos/dog.jpg", 960).await;

    let gc = GarbageCollector::new(cache.clone(), vec![sources], state.clone());
    let stats = gc.sweep().await;

    assert_eq!(stats.scanned, 4);
    assert_eq!(stats.deleted, 2);
    assert_eq!(stats.kept, 2);
    assert_eq!(stats.skipped, 0);

    assert!(!cache.exists(&dog_path).await.unwrap());
    assert!(!cache.exists(&dog2_path).await.unwrap());
    assert_eq!(state.get(&dog_token).await.unwrap(), None);
    assert_eq!(state.get(&dog2_token).await.unwrap(), None);

    assert!(cache.exists(&cat_path).await.unwrap());
    assert!(cache.exists(&logo_path).await.unwrap());
    assert!(state.get(&cat_token).await.unwrap().is_some());
    assert!(state.get(&logo_token).await.unwrap().is_some());
}

#[tokio::test]
async fn reencoded_source_with_new_extension_keeps_variants() {
    let cache = Arc::new(MemBlobStore::new());
    let sources = Arc::new(MemBlobStore::new());
    let state = Arc::new(MemStateCache::new());

    // The variant was generated from banner.jpg; the source has since been
    // re-encoded as banner.webp. Stem match must keep it.
    sources
        .write("banner.webp", Bytes::from_static(b"src"))
        .await
        .unwrap();
    let (path, _) = seed_variant(&cache, &state, "banner.jpg", 480).await;

    let gc = GarbageCollector::new(cache.clone(), vec![sources], state);
    let stats = gc.sweep().await;

    assert_eq!(stats.kept, 1);
    assert_eq!(stats.deleted, 0);
    assert!(cache.exists(&path).await.unwrap());
}

#[tokio::test]
async fn any_source_store_can_vouch_for_a_stem() {
    let cache = Arc::new(MemBlobStore::new());
    let media = Arc::new(MemBlobStore::new());
    let statics = Arc::new(MemBlobStore::new());
    let state = Arc::new(MemStateCache::new());

    statics
        .write("icons/star.png", Bytes::from_static(b"src"))
        .await
        .unwrap();
    let (path, _) = seed_variant(&cache, &state, "icons/star.png", 64).await;

    let gc = GarbageCollector::new(cache.clone(), vec![media, statics], state);
    let stats = gc.sweep().await;

    assert_eq!(stats.kept, 1);
    assert!(cache.exists(&path).await.unwrap());
}

#[tokio::test]
async fn ambiguous_and_foreign_names_are_skipped() {
    let cache = Arc::new(MemBlobStore::new());
    let sources = Arc::new(MemBlobStore::new());
    let state = Arc::new(MemStateCache::new());

    // No token segment at all, and a version-like ambiguous name. Neither
    // source exists; both must still survive the sweep.
    cache
        .write("notes.txt", Bytes::from_static(b"keep me"))
        .await
        .unwrap();
    cache
        .write("semver-1.2.3.webp", Bytes::from_static(b"keep me"))
        .await
        .unwrap();

    let gc = GarbageCollector::new(cache.clone(), vec![sources], state);
    let stats = gc.sweep().await;

    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.deleted, 0);
    assert!(cache.exists("notes.txt").await.unwrap());
    assert!(cache.exists("semver-1.2.3.webp").await.unwrap());
}

/// A source store whose listings always fail.
#[derive(Clone, Debug)]
struct BrokenStore;

#[async_trait]
impl BlobStore for BrokenStore {
    async fn exists(&self, _path: &str) -> StoreResult<bool> {
        Err(StoreError::Failed("offline".to_string()))
    }
    async fn read(&self, _path: &str) -> StoreResult<Bytes> {
        Err(StoreError::Failed("offline".to_string()))
    }
    async fn write(&self, _path: &str, _data: Bytes) -> StoreResult<()> {
        Err(StoreError::Failed("offline".to_string()))
    }
    async fn delete(&self, _path: &str) -> StoreResult<()> {
        Err(StoreError::Failed("offline".to_string()))
    }
    async fn list(&self, _dir: &str) -> StoreResult<DirListing> {
        Err(StoreError::Failed("offline".to_string()))
    }
    async fn remove_dir(&self, _dir: &str) -> StoreResult<()> {
        Err(StoreError::Failed("offline".to_string()))
    }
}

#[tokio::test]
async fn unreachable_source_store_defaults_to_keep() {
    let cache = Arc::new(MemBlobStore::new());
    let state = Arc::new(MemStateCache::new());

    let (path, token) = seed_variant(&cache, &state, "photos/cat.jpg", 480).await;

    let gc = GarbageCollector::new(cache.clone(), vec![Arc::new(BrokenStore)], state.clone());
    let stats = gc.sweep().await;

    assert_eq!(stats.kept, 1);
    assert_eq!(stats.deleted, 0);
    assert!(cache.exists(&path).await.unwrap());
    assert!(state.get(&token).await.unwrap().is_some());
}

#[tokio::test]
async fn emptied_directories_are_pruned_on_disk() {
    let cache_dir = TempDir::new().unwrap();
    let source_dir = TempDir::new().unwrap();
    let cache = Arc::new(DiskBlobStore::new(cache_dir.path()));
    let sources = Arc::new(DiskBlobStore::new(source_dir.path()));
    let state = Arc::new(MemStateCache::new());

    // photos/ will end up empty; icons/ keeps its variant.
    sources
        .write("icons/star.png", Bytes::from_static(b"src"))
        .await
        .unwrap();

    let dog_token = variant_token("photos/dog.jpg", 480, ImageKind::Webp, None, "op");
    cache
        .write(
            &format!("photos/dog.{dog_token}.webp"),
            Bytes::from_static(b"variant"),
        )
        .await
        .unwrap();
    let star_token = variant_token("icons/star.png", 64, ImageKind::Webp, None, "op");
    cache
        .write(
            &format!("icons/star.{star_token}.webp"),
            Bytes::from_static(b"variant"),
        )
        .await
        .unwrap();

    let gc = GarbageCollector::new(cache.clone(), vec![sources], state);
    let stats = gc.sweep().await;

    assert_eq!(stats.deleted, 1);
    assert_eq!(stats.pruned_dirs, 1);
    assert!(!cache_dir.path().join("photos").exists());
    assert!(cache_dir.path().join("icons").exists());

    let root = cache.list("").await.unwrap();
    assert_eq!(root.dirs, vec!["icons".to_string()]);
}
