use geohash_cover::{CoverBuilder, CoverOptions, HashMode, Shape};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_options_from_toml_file() {
    let file = write_config(
        r#"
precision = 5
hash_mode = "border"
allow_duplicates = false
"#,
    );

    let engine = CoverBuilder::new()
        .config_file(file.path())
        .expect("config loads")
        .build()
        .expect("valid options");

    assert_eq!(engine.options().precision, 5);
    assert_eq!(engine.options().hash_mode, HashMode::Border);
    assert!(!engine.options().allow_duplicates);

    let cells = engine
        .cover(&Shape::point(13.36, 52.49))
        .expect("cover succeeds");
    assert_eq!(cells.len(), 1);
}

#[test]
fn test_invalid_toml_values_rejected() {
    let file = write_config("precision = 20\n");
    assert!(CoverBuilder::new().config_file(file.path()).is_err());

    let file = write_config("hash_mode = \"outline\"\n");
    assert!(CoverBuilder::new().config_file(file.path()).is_err());

    let file = write_config("precison = 5\n");
    assert!(CoverBuilder::new().config_file(file.path()).is_err());
}

#[test]
fn test_toml_written_by_options_reloads() {
    let options = CoverOptions::default()
        .with_precision(8)
        .with_hash_mode(HashMode::InsideOnly)
        .with_min_intersect_fraction(0.0)
        .with_parallel(true);
    let file = write_config(&options.to_toml().expect("serializes"));

    let engine = CoverBuilder::new()
        .config_file(file.path())
        .expect("config loads")
        .build()
        .expect("valid options");
    assert_eq!(engine.options(), &options);
}
