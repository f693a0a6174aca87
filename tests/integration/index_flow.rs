use offcat::error::{ApiError, IndexError};
use offcat::store::Catalog;
use offcat::tooling::cli::Commands;
use std::fs;
use tempfile::TempDir;

use crate::integration::support::{context, index, index_command, sample_source};

#[test]
fn index_creates_catalog_with_storage() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);

    let output = index(&ctx, &source);
    assert!(output.starts_with("Indexed storage \"src\""));
    assert!(output.contains("  Files: 4"));
    assert!(output.contains("  Pruned: 0"));
    assert!(ctx.catalog().exists());

    let tree = ctx.catalog().load().unwrap();
    assert_eq!(tree.storages.len(), 1);
    let storage = &tree.storages[0];
    assert_eq!(storage.name, "src");
    assert_eq!(storage.size, 19);
    assert_eq!(storage.total_files, 4);
    assert!(storage.path.is_absolute());
}

#[test]
fn reindex_prunes_vanished_entries() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);
    index(&ctx, &source);

    fs::remove_file(source.join("photos/img.jpg")).unwrap();
    fs::write(source.join("docs/new.txt"), "1234").unwrap();
    let output = index(&ctx, &source);
    assert!(output.contains("  Pruned: 1"));

    let tree = ctx.catalog().load().unwrap();
    let storage = &tree.storages[0];
    assert!(storage.child("photos").unwrap().children.is_empty());
    assert!(storage.child("docs").unwrap().child("new.txt").is_some());
    assert_eq!(storage.size, 13);
    assert_eq!(storage.total_files, 4);
}

#[test]
fn reindex_keeps_single_storage_and_merges_tags() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);
    let tagged = |tag: &str| Commands::Index {
        path: source.clone(),
        name: Some("disk".to_string()),
        tags: vec![tag.to_string()],
        meta: Some("usb".to_string()),
        checksum: false,
        archive: false,
        ignore: Vec::new(),
        no_mime: true,
        force: true,
    };
    ctx.execute(&tagged("one")).unwrap();
    ctx.execute(&tagged("two")).unwrap();

    let tree = ctx.catalog().load().unwrap();
    assert_eq!(tree.storages.len(), 1);
    let tags: Vec<&str> = tree.storages[0].tags.iter().map(String::as_str).collect();
    assert_eq!(tags, vec!["one", "two"]);
    assert_eq!(tree.storages[0].meta, "usb");
}

#[test]
fn checksum_and_ignore_flags() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);
    ctx.execute(&Commands::Index {
        path: source.clone(),
        name: None,
        tags: Vec::new(),
        meta: None,
        checksum: true,
        archive: false,
        ignore: vec!["*.jpg".to_string()],
        no_mime: false,
        force: true,
    })
    .unwrap();

    let tree = ctx.catalog().load().unwrap();
    let storage = &tree.storages[0];
    assert!(storage.child("photos").unwrap().child("img.jpg").is_none());
    let readme = storage.child("docs").unwrap().child("readme.txt").unwrap();
    assert_eq!(
        readme.checksum.as_deref(),
        Some(blake3::hash(b"hello").to_hex().as_str())
    );
}

#[test]
fn invalid_source_is_an_index_error() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    let err = ctx
        .execute(&index_command(&dir.path().join("missing"), false))
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::IndexError(IndexError::InvalidSource(_))
    ));
    assert!(!ctx.catalog().exists());
}

#[test]
fn invalid_ignore_pattern_is_rejected() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);
    let err = ctx
        .execute(&Commands::Index {
            path: source,
            name: None,
            tags: Vec::new(),
            meta: None,
            checksum: false,
            archive: false,
            ignore: vec!["[".to_string()],
            no_mime: false,
            force: true,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::IndexError(IndexError::InvalidPattern { .. })
    ));
}

#[test]
fn catalog_format_follows_extension() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let mut config = offcat::config::OffcatConfig::default();
    config.catalog.path = dir.path().join("cat.yaml");
    let ctx = offcat::tooling::cli::CliContext::from_config(config);
    index(&ctx, &source);

    let text = fs::read_to_string(dir.path().join("cat.yaml")).unwrap();
    assert!(text.contains("storages:"));
    let tree = Catalog::new(dir.path().join("cat.yaml"), true).load().unwrap();
    assert_eq!(tree.storages[0].total_files, 4);
}
