use clap::{CommandFactory, Parser};
use offcat::render::OutputFormat;
use offcat::tooling::cli::{Cli, Commands, StorageCommands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["offcat", "index", "/mnt/usb"],
        vec!["offcat", "index", "/mnt/usb", "usb", "-t", "a", "-t", "b", "-C", "-a", "-f"],
        vec!["offcat", "index", "/mnt/usb", "--ignore", "*.tmp", "--no-mime", "--meta", "x"],
        vec!["offcat", "ls"],
        vec!["offcat", "ls", "usb/dir", "-r", "-a", "-l", "-S"],
        vec!["offcat", "ls", "-f", "csv-with-header", "-D", "2"],
        vec!["offcat", "ls", "-r", "-D", "-1"],
        vec!["offcat", "find", "foo", "*.txt", "-p", "usb", "-f", "csv"],
        vec!["offcat", "find"],
        vec!["offcat", "tree", "usb", "-a", "-l", "-D", "3"],
        vec!["offcat", "du", "usb", "-s", "-S"],
        vec!["offcat", "storage", "list"],
        vec!["offcat", "storage", "rm", "usb", "--force"],
        vec!["offcat", "storage", "meta", "usb", "blue disk"],
        vec!["offcat", "storage", "tag", "usb", "cold"],
        vec!["offcat", "storage", "untag", "usb", "cold"],
        vec!["offcat", "create", "/tmp/out", "-p", "usb/dir"],
        vec!["offcat", "info", "--note", "shelf"],
        vec!["offcat", "-c", "my.catalog", "--no-color", "--debug", "ls"],
        vec!["offcat", "ls", "--catalog", "my.toml", "--config", "c.toml"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_input() {
    let invalid: Vec<Vec<&str>> = vec![
        vec!["offcat"],
        vec!["offcat", "index"],
        vec!["offcat", "ls", "-f", "xml"],
        vec!["offcat", "storage"],
        vec!["offcat", "storage", "tag", "usb"],
        vec!["offcat", "create"],
        vec!["offcat", "du", "-D", "many"],
    ];
    for args in invalid {
        assert!(
            Cli::try_parse_from(args.clone()).is_err(),
            "expected parse failure for args: {args:?}"
        );
    }
}

#[test]
fn parse_defaults() {
    let cli = Cli::try_parse_from(["offcat", "ls"]).unwrap();
    match cli.command {
        Commands::Ls {
            path,
            recursive,
            format,
            depth,
            ..
        } => {
            assert!(path.is_none());
            assert!(!recursive);
            assert_eq!(format, OutputFormat::Native);
            assert_eq!(depth, -1);
        }
        other => panic!("unexpected command: {other:?}"),
    }
    assert!(cli.catalog.is_none());
    assert!(!cli.no_color);
}

#[test]
fn parse_repeatable_flags() {
    let cli = Cli::try_parse_from([
        "offcat", "index", "/src", "-t", "a", "--tag", "b", "-i", "*.o", "-i", "*.tmp",
    ])
    .unwrap();
    match cli.command {
        Commands::Index { tags, ignore, .. } => {
            assert_eq!(tags, vec!["a", "b"]);
            assert_eq!(ignore, vec!["*.o", "*.tmp"]);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["offcat", "storage", "rm", "usb", "-f"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Storage {
            command: StorageCommands::Rm { force: true, .. }
        }
    ));
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
