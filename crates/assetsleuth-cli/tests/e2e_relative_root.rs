//! `clear` invoked from inside the project with relative paths.
//!
//! Kept in its own test binary: it changes the process working directory,
//! which would race with the other end-to-end tests.
use assetsleuth_cli::session::{self, Mode};
use assetsleuth_cli::{Cli, Command};
use clap::Parser;
use std::fs;
use tempfile::TempDir;

#[test]
fn clear_from_project_dir_keeps_referenced_containers() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    for name in ["used", "orphan"] {
        let dir = root.join(format!("Assets/Images.xcassets/{name}.imageset"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.png")), vec![0u8; 256]).unwrap();
    }
    fs::create_dir_all(root.join("App")).unwrap();
    fs::write(root.join("App/Home.swift"), b"let i = R.image.used()").unwrap();

    std::env::set_current_dir(root).unwrap();
    let args = match Cli::try_parse_from(["assetsleuth", "clear", ".", "Assets"])
        .unwrap()
        .command
    {
        Some(Command::Clear(args)) => args,
        other => panic!("unexpected command {other:?}"),
    };
    session::run(Mode::Clear, &args).unwrap();

    let assets = root.join("Assets/Images.xcassets");
    assert!(assets.join("used.imageset").exists(), "referenced container was removed");
    assert!(!assets.join("orphan.imageset").exists());
}
