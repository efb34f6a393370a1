use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

/// A `photosorter` command whose home directory is the temp dir, so a
/// developer's own ~/.photosorter.json never leaks into tests.
pub fn photosorter(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("photosorter").unwrap();
    cmd.env("HOME", temp_dir.path());
    cmd
}

/// Source folder holding small but valid PNG files with the given names.
pub fn setup_source_dir(temp_dir: &TempDir, names: &[&str]) -> ChildPath {
    let source = temp_dir.child("inbox");
    source.create_dir_all().unwrap();
    for name in names {
        image::RgbImage::new(3, 2)
            .save_with_format(source.child(name).path(), image::ImageFormat::Png)
            .unwrap();
    }
    source
}

/// Empty destination folder `name` inside the temp dir.
pub fn setup_dest_dir(temp_dir: &TempDir, name: &str) -> ChildPath {
    let dest = temp_dir.child(name);
    dest.create_dir_all().unwrap();
    dest
}
