use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const CONFIG: &str = r#"
extension = "ggs"
separator = "|"
field = 1

[rule]
text = "cheap"
weight = 1

[suffix]
file = "suffix.txt"

[suffix.distance]
default = 1

[domains]
field = 0
weight = 1
file = "domains.txt"
"#;

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
    fs::write(dir.path().join("suffix.txt"), "\"buy\":2:1+0:a\n").unwrap();
    fs::write(dir.path().join("domains.txt"), "ru:3\n").unwrap();
    fs::write(
        dir.path().join("records.txt"),
        "http://pharma-deals.ru|buy cheap meds now\nhttp://example.com|nothing to see\n",
    )
    .unwrap();
    dir
}

fn sieve(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sieve"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn scores_file_into_destination() {
    let dir = fixture();
    let out = sieve(dir.path(), &["records.txt", "--destination", "out"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let scored = fs::read_to_string(dir.path().join("out/records.ggs")).unwrap();
    assert_eq!(scored, "http://pharma-deals.ru|buy cheap meds now|9\n");
}

#[test]
fn missing_input_exits_with_1() {
    let dir = fixture();
    let out = sieve(dir.path(), &["nope.txt"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn missing_config_exits_with_1() {
    let dir = fixture();
    let out = sieve(dir.path(), &["records.txt", "--config", "absent.toml"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn missing_separator_exits_with_3() {
    let dir = fixture();
    fs::write(
        dir.path().join("config.toml"),
        CONFIG.replace("separator = \"|\"", ""),
    )
    .unwrap();
    let out = sieve(dir.path(), &["records.txt"]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn malformed_suffix_exits_with_10() {
    let dir = fixture();
    fs::write(dir.path().join("suffix.txt"), "\"buy\":2:1+0:fuzzy\n").unwrap();
    let out = sieve(dir.path(), &["records.txt"]);
    assert_eq!(out.status.code(), Some(10));
}

#[test]
fn cli_rule_files_used_when_config_names_none() {
    let dir = fixture();
    let config = CONFIG
        .replace("file = \"suffix.txt\"", "")
        .replace("file = \"domains.txt\"", "");
    fs::write(dir.path().join("config.toml"), config).unwrap();

    let out = sieve(
        dir.path(),
        &["records.txt", "--suffix", "suffix.txt", "--domains", "domains.txt"],
    );
    assert!(out.status.success());

    let scored = fs::read_to_string(dir.path().join("records.ggs")).unwrap();
    assert!(scored.ends_with("|9\n"));
}

#[test]
fn logs_go_to_file_when_requested() {
    let dir = fixture();
    let out = sieve(
        dir.path(),
        &["records.txt", "--destination", "out", "--log-file", "logs/sieve.log"],
    );
    assert!(out.status.success());

    let log = fs::read_to_string(dir.path().join("logs/sieve.log")).unwrap();
    assert!(log.contains("analysis completed"));
}

#[test]
fn unusable_log_file_exits_with_14() {
    let dir = fixture();
    fs::create_dir(dir.path().join("logs")).unwrap();

    let out = sieve(dir.path(), &["records.txt", "--destination", "out", "--log-file", "logs"]);
    assert_eq!(out.status.code(), Some(14));
    assert!(!dir.path().join("out/records.ggs").exists());
}

#[test]
fn scoring_a_file_onto_itself_exits_with_13() {
    let dir = fixture();
    fs::rename(dir.path().join("records.txt"), dir.path().join("records.ggs")).unwrap();

    let out = sieve(dir.path(), &["records.ggs", "--destination", "."]);
    assert_eq!(out.status.code(), Some(13));

    let kept = fs::read_to_string(dir.path().join("records.ggs")).unwrap();
    assert!(kept.starts_with("http://pharma-deals.ru|buy cheap meds now\n"));
}
