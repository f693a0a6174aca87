use offcat::error::ApiError;
use offcat::tooling::cli::{Commands, StorageCommands};
use tempfile::TempDir;

use crate::integration::support::{context, index, ls, sample_source};

fn storage(command: StorageCommands) -> Commands {
    Commands::Storage { command }
}

#[test]
fn tag_untag_and_meta_are_persisted() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);
    index(&ctx, &source);

    ctx.execute(&storage(StorageCommands::Tag {
        name: "src".to_string(),
        tag: "cold".to_string(),
    }))
    .unwrap();
    ctx.execute(&storage(StorageCommands::Tag {
        name: "src".to_string(),
        tag: "offsite".to_string(),
    }))
    .unwrap();
    let output = ctx
        .execute(&storage(StorageCommands::Untag {
            name: "src".to_string(),
            tag: "cold".to_string(),
        }))
        .unwrap();
    assert_eq!(output, "Storage \"src\" untagged \"cold\"");
    let output = ctx
        .execute(&storage(StorageCommands::Untag {
            name: "src".to_string(),
            tag: "cold".to_string(),
        }))
        .unwrap();
    assert_eq!(output, "Storage \"src\" has no tag \"cold\"");
    ctx.execute(&storage(StorageCommands::Meta {
        name: "src".to_string(),
        meta: "blue usb disk".to_string(),
    }))
    .unwrap();

    let tree = ctx.catalog().load().unwrap();
    let sto = &tree.storages[0];
    assert_eq!(sto.meta, "blue usb disk");
    assert_eq!(sto.tags.iter().collect::<Vec<_>>(), vec!["offsite"]);

    let listing = ctx
        .execute(&storage(StorageCommands::List { raw_size: true }))
        .unwrap();
    assert!(listing.starts_with("Storages"));
    assert!(listing.contains("offsite"));
    assert!(listing.contains("blue usb disk"));
}

#[test]
fn rm_removes_storage() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);
    index(&ctx, &source);

    let output = ctx
        .execute(&storage(StorageCommands::Rm {
            name: "src".to_string(),
            force: true,
        }))
        .unwrap();
    assert_eq!(output, "Removed storage \"src\" (4 files)");
    assert_eq!(ctx.execute(&ls(None, false, false)).unwrap(), "");
    assert!(ctx.catalog().load().unwrap().storages.is_empty());
}

#[test]
fn unknown_storage_is_not_found() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);
    index(&ctx, &source);

    let err = ctx
        .execute(&storage(StorageCommands::Rm {
            name: "nope".to_string(),
            force: true,
        }))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(err.to_string(), "no such storage nope");

    let err = ctx
        .execute(&storage(StorageCommands::Tag {
            name: "nope".to_string(),
            tag: "x".to_string(),
        }))
        .unwrap_err();
    assert_eq!(err.to_string(), "no such storage nope");
}

#[test]
fn commands_need_an_existing_catalog() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    let err = ctx.execute(&ls(None, false, false)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(err.to_string().starts_with("no catalog at "));
}

#[test]
fn info_sets_note() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);
    index(&ctx, &source);

    let output = ctx
        .execute(&Commands::Info {
            note: Some("shelf 3".to_string()),
        })
        .unwrap();
    assert!(output.starts_with("Catalog\n"));
    assert!(output.contains("  Note: shelf 3"));
    assert!(output.contains("  Storages: 1"));
    assert!(output.contains("  Files: 4"));

    let tree = ctx.catalog().load().unwrap();
    assert_eq!(tree.note, "shelf 3");
    assert_eq!(tree.tool, "offcat");
}

#[test]
fn create_from_start_path() {
    let dir = TempDir::new().unwrap();
    let source = sample_source(&dir);
    let ctx = context(&dir);
    index(&ctx, &source);

    let dest = dir.path().join("out");
    let output = ctx
        .execute(&Commands::Create {
            local_path: dest.clone(),
            path: Some("docs".to_string()),
        })
        .unwrap();
    assert_eq!(output, format!("Created 3 entries under {}", dest.display()));
    assert!(dest.join("docs/notes.md").is_file());
    assert!(!dest.join("photos").exists());
}
