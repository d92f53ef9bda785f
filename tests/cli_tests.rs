use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

fn baleen_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("baleen").unwrap();
    cmd.env("BALEEN_DB_HOST", dir.path().to_str().unwrap())
        .env("BALEEN_DB_NAME", "test")
        .env_remove("BALEEN_DB_PORT");
    cmd
}

fn add_feed(dir: &TempDir, xmlurl: &str) {
    baleen_cmd(dir)
        .args(["feeds", "add", xmlurl, "--category", "tech"])
        .assert()
        .success();
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    baleen_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("feeds"))
        .stdout(predicate::str::contains("posts"))
        .stdout(predicate::str::contains("--db-port"));
}

#[test]
fn test_info_uses_configured_defaults() {
    let dir = TempDir::new().unwrap();
    baleen_cmd(&dir)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database: test"))
        .stdout(predicate::str::contains("Port: 27017"));

    assert!(dir.path().join("test.db").exists());
}

#[test]
fn test_info_port_override_keeps_name_and_host() {
    let dir = TempDir::new().unwrap();
    baleen_cmd(&dir)
        .args(["info", "--db-port", "28017"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Port: 28017"))
        .stdout(predicate::str::contains("Database: test"))
        .stdout(predicate::str::contains(format!(
            "Host: {}",
            dir.path().to_str().unwrap()
        )));
}

#[test]
fn test_invalid_port_in_environment() {
    let dir = TempDir::new().unwrap();
    baleen_cmd(&dir)
        .env("BALEEN_DB_PORT", "not-a-port")
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("BALEEN_DB_PORT"));
}

#[test]
fn test_unreachable_host_is_connection_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    baleen_cmd(&dir)
        .args(["info", "--db-host", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not connect to store"));
}

#[test]
fn test_list_no_feeds_configured() {
    let dir = TempDir::new().unwrap();
    baleen_cmd(&dir)
        .args(["feeds", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No feeds configured"));
}

#[test]
fn test_add_and_list_feed() {
    let dir = TempDir::new().unwrap();
    baleen_cmd(&dir)
        .args([
            "feeds",
            "add",
            "https://example.com/atom.xml",
            "--category",
            "tech",
            "--type",
            "atom",
            "--title",
            "Example",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feed added successfully!"))
        .stdout(predicate::str::contains("Type: atom"));

    baleen_cmd(&dir)
        .args(["feeds", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type": "atom""#))
        .stdout(predicate::str::contains(r#""xmlurl": "https://example.com/atom.xml""#));
}

#[test]
fn test_csv_feed_type_rejected_and_not_persisted() {
    let dir = TempDir::new().unwrap();
    baleen_cmd(&dir)
        .args([
            "feeds",
            "add",
            "https://example.com/data.csv",
            "--category",
            "data",
            "--type",
            "csv",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));

    baleen_cmd(&dir)
        .args(["feeds", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No feeds configured"));
}

#[test]
fn test_duplicate_feed_rejected() {
    let dir = TempDir::new().unwrap();
    add_feed(&dir, "https://example.com/rss");

    baleen_cmd(&dir)
        .args(["feeds", "add", "https://example.com/rss", "--category", "tech"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate value for feeds.xmlurl"));
}

#[test]
fn test_add_post_from_stdin_sets_signature() {
    let dir = TempDir::new().unwrap();
    add_feed(&dir, "https://example.com/rss");

    baleen_cmd(&dir)
        .args([
            "posts",
            "add",
            "https://example.com/posts/1",
            "--content-file",
            "-",
            "--feed",
            "1",
            "--pubdate",
            "2024-05-01T12:00:00Z",
        ])
        .write_stdin("hello")
        .assert()
        .success()
        .stdout(predicate::str::contains(HELLO_SHA256));

    baleen_cmd(&dir)
        .args(["posts", "list", "--feed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.com/posts/1"));

    baleen_cmd(&dir)
        .args(["posts", "show", HELLO_SHA256])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""url": "https://example.com/posts/1""#))
        .stdout(predicate::str::contains(r#""feed": 1"#));
}

#[test]
fn test_show_feed_by_xmlurl() {
    let dir = TempDir::new().unwrap();
    add_feed(&dir, "https://example.com/rss");

    baleen_cmd(&dir)
        .args(["feeds", "show", "https://example.com/rss"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""category": "tech""#))
        .stdout(predicate::str::contains(r#""id": 1"#));

    baleen_cmd(&dir)
        .args(["feeds", "show", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No feed matches '2'"));
}

#[test]
fn test_padded_url_rejected() {
    let dir = TempDir::new().unwrap();
    baleen_cmd(&dir)
        .args(["feeds", "add", " https://example.com/rss", "--category", "tech"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid URL"));
}

#[test]
fn test_duplicate_content_rejected() {
    let dir = TempDir::new().unwrap();

    baleen_cmd(&dir)
        .args(["posts", "add", "https://example.com/posts/1", "--content-file", "-"])
        .write_stdin("hello")
        .assert()
        .success();

    baleen_cmd(&dir)
        .args(["posts", "add", "https://example.com/posts/2", "--content-file", "-"])
        .write_stdin("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("posts.signature"));
}

#[test]
fn test_feed_in_use_cannot_be_removed() {
    let dir = TempDir::new().unwrap();
    add_feed(&dir, "https://example.com/rss");

    baleen_cmd(&dir)
        .args([
            "posts",
            "add",
            "https://example.com/posts/1",
            "--content-file",
            "-",
            "--feed",
            "1",
        ])
        .write_stdin("hello")
        .assert()
        .success();

    baleen_cmd(&dir)
        .args(["feeds", "remove", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still referenced"));

    baleen_cmd(&dir)
        .args(["posts", "remove", "1"])
        .assert()
        .success();

    baleen_cmd(&dir)
        .args(["feeds", "remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed: https://example.com/rss"));
}
