// tests/cli_args.rs

use std::path::PathBuf;

use clap::Parser;
use watchmux::cli::CliArgs;
use watchmux::config::default_config_path;

#[test]
fn config_defaults_to_the_working_directory_file() {
    let args = CliArgs::parse_from(["watchmux", "--dir", "src"]);
    assert_eq!(args.config, default_config_path());
    assert_eq!(args.dirs, vec!["src".to_string()]);
    assert!(!args.recursive);
}

#[test]
fn explicit_config_and_repeated_watches() {
    let args = CliArgs::parse_from([
        "watchmux",
        "--config",
        "conf/watch.toml",
        "--file",
        "a.ts",
        "--file",
        "b.ts",
        "--recursive",
    ]);
    assert_eq!(args.config, PathBuf::from("conf/watch.toml"));
    assert_eq!(args.files, vec!["a.ts".to_string(), "b.ts".to_string()]);
    assert!(args.recursive);
}
