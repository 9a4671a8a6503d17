use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const OWNER: &str = "owner@example.com";

fn qk_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("qk");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::create_dir_all(root.join("data")).unwrap();

    let config_content = format!(
        r#"[db]
path = "{root}/data/qk.sqlite"

[auth]
super_admin = "{owner}"

[preferences]
path = "{root}/data/prefs.json"

[server]
bind = "127.0.0.1:7341"
"#,
        root = root.display(),
        owner = OWNER,
    );

    let config_path = config_dir.join("qk.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_qk(config_path: &Path, user: Option<&str>, args: &[&str]) -> (String, String, bool) {
    let binary = qk_binary();
    let mut cmd = Command::new(&binary);
    cmd.arg("--config").arg(config_path.to_str().unwrap());
    if let Some(user) = user {
        cmd.arg("--user").arg(user);
    }
    let output = cmd
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run qk binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn init_and_seed(config_path: &Path) {
    let (stdout, stderr, success) = run_qk(config_path, None, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    let (stdout, stderr, success) = run_qk(config_path, Some(OWNER), &["seed"]);
    assert!(success, "seed failed: stdout={}, stderr={}", stdout, stderr);
}

/// Ids in the order `list`/`search` printed them.
fn ids(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|l| l.trim().strip_prefix("id: "))
        .map(str::to_string)
        .collect()
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success1) = run_qk(&config_path, None, &["init"]);
    assert!(success1, "First init failed");
    assert!(stdout.contains("initialized"));

    let (_, _, success2) = run_qk(&config_path, None, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_seed_requires_admin() {
    let (_tmp, config_path) = setup_test_env();
    run_qk(&config_path, None, &["init"]);

    let (_, stderr, success) = run_qk(&config_path, None, &["seed"]);
    assert!(!success);
    assert!(stderr.contains("permission denied"), "stderr={}", stderr);

    let (_, stderr, success) = run_qk(&config_path, Some("reader@example.com"), &["seed"]);
    assert!(!success);
    assert!(stderr.contains("permission denied"), "stderr={}", stderr);
}

#[test]
fn test_search_filters_and_feeds_analytics() {
    let (_tmp, config_path) = setup_test_env();
    init_and_seed(&config_path);

    let (stdout, _, success) = run_qk(&config_path, None, &["search", "vpn"]);
    assert!(success);
    assert_eq!(ids(&stdout).len(), 1);
    assert!(stdout.contains("How do I set up the VPN?"));

    let (stdout, _, _) = run_qk(&config_path, None, &["search", "wifi"]);
    assert_eq!(ids(&stdout).len(), 1);
    run_qk(&config_path, None, &["search", "wifi"]);

    let (stdout, _, success) = run_qk(&config_path, None, &["list", "--category", "IT"]);
    assert!(success);
    assert_eq!(ids(&stdout).len(), 2);

    let (stdout, _, success) = run_qk(&config_path, None, &["search", "nothing-matches-this"]);
    assert!(success);
    assert!(stdout.contains("No results."));

    let (stdout, stderr, success) = run_qk(&config_path, Some(OWNER), &["analytics"]);
    assert!(success, "analytics failed: {}", stderr);
    let wifi = stdout.find("wifi").expect("wifi listed");
    let vpn = stdout.find("vpn").expect("vpn listed");
    assert!(wifi < vpn, "wifi (2 searches) should rank above vpn:\n{}", stdout);
}

#[test]
fn test_import_export_round_trip() {
    let (tmp, config_path) = setup_test_env();
    run_qk(&config_path, None, &["init"]);

    let csv_path = tmp.path().join("faqs.csv");
    fs::write(
        &csv_path,
        "\u{FEFF}question,answer,category,tags\r\n\
         \"Where is the \"\"big\"\" room?\",\"Floor 3,\nnext to the kitchen\",Facilities,rooms floor3\r\n\
         ,missing question,IT,\r\n\
         How do I reset my password?,Use the self-service portal,IT,\r\n",
    )
    .unwrap();

    let (stdout, _, success) = run_qk(
        &config_path,
        Some(OWNER),
        &["import", csv_path.to_str().unwrap(), "--dry-run"],
    );
    assert!(success);
    assert!(stdout.contains("2 rows ready, 1 skipped"));
    assert!(stdout.contains("Dry run"));

    let (stdout, _, _) = run_qk(&config_path, None, &["list"]);
    assert!(ids(&stdout).is_empty());

    let (stdout, stderr, success) = run_qk(
        &config_path,
        Some(OWNER),
        &["import", csv_path.to_str().unwrap()],
    );
    assert!(success, "import failed: {}", stderr);
    assert!(stdout.contains("Imported 2 FAQs."));

    let out_path = tmp.path().join("out").join("export.csv");
    let (_, stderr, success) = run_qk(
        &config_path,
        Some(OWNER),
        &["export", "--output", out_path.to_str().unwrap()],
    );
    assert!(success, "export failed: {}", stderr);

    let bytes = fs::read(&out_path).unwrap();
    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("question,answer,category,tags\n"));
    assert!(text.contains("\"Where is the \"\"big\"\" room?\""));
    assert!(text.contains("\"Floor 3,\nnext to the kitchen\""));
    assert!(text.contains("rooms floor3"));
}

#[test]
fn test_import_rejects_header_only_file() {
    let (tmp, config_path) = setup_test_env();
    run_qk(&config_path, None, &["init"]);

    let csv_path = tmp.path().join("empty.csv");
    fs::write(&csv_path, "question,answer\n").unwrap();

    let (_, stderr, success) = run_qk(
        &config_path,
        Some(OWNER),
        &["import", csv_path.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("no data"), "stderr={}", stderr);
}

#[test]
fn test_show_counts_views_and_popular_ranks_them() {
    let (_tmp, config_path) = setup_test_env();
    init_and_seed(&config_path);

    let (stdout, _, _) = run_qk(&config_path, None, &["search", "vpn"]);
    let vpn = ids(&stdout).remove(0);

    let (stdout, _, _) = run_qk(&config_path, None, &["popular"]);
    assert!(stdout.contains("No results."));

    run_qk(&config_path, None, &["show", &vpn]);
    let (stdout, _, success) = run_qk(&config_path, None, &["show", &vpn, "--html"]);
    assert!(success);
    assert!(stdout.contains("views:    2"));
    assert!(stdout.contains("<code>vpn.company.com</code>"));

    let (stdout, _, _) = run_qk(&config_path, None, &["popular"]);
    assert_eq!(ids(&stdout), vec![vpn.clone()]);

    let (_, stderr, success) = run_qk(&config_path, None, &["show", "no-such-id"]);
    assert!(!success);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_favorites_and_helpful_votes() {
    let (_tmp, config_path) = setup_test_env();
    init_and_seed(&config_path);

    let (stdout, _, _) = run_qk(&config_path, None, &["search", "leave"]);
    let leave = ids(&stdout).remove(0);

    let (stdout, _, _) = run_qk(&config_path, None, &["favorite", &leave]);
    assert!(stdout.contains("Added to favorites"));
    let (stdout, _, _) = run_qk(&config_path, None, &["favorites"]);
    assert_eq!(ids(&stdout), vec![leave.clone()]);
    let (stdout, _, _) = run_qk(&config_path, None, &["favorite", &leave]);
    assert!(stdout.contains("Removed from favorites"));

    let (stdout, _, success) = run_qk(&config_path, None, &["helpful", &leave]);
    assert!(success);
    assert!(stdout.contains("1 found this helpful"));
    let (stdout, _, _) = run_qk(&config_path, None, &["helpful", &leave]);
    assert!(stdout.contains("already voted"));
}

#[test]
fn test_admin_management() {
    let (_tmp, config_path) = setup_test_env();
    run_qk(&config_path, None, &["init"]);

    let (_, stderr, success) = run_qk(
        &config_path,
        Some("editor@example.com"),
        &["admins", "add", "other@example.com"],
    );
    assert!(!success);
    assert!(stderr.contains("super-admin"));

    let (_, _, success) = run_qk(
        &config_path,
        Some(OWNER),
        &["admins", "add", "Editor@Example.com"],
    );
    assert!(success);

    let (stdout, _, _) = run_qk(&config_path, None, &["admins", "list"]);
    assert!(stdout.contains("editor@example.com"));
    assert!(stdout.contains("owner@example.com (super-admin)"));

    let (stdout, stderr, success) = run_qk(
        &config_path,
        Some("editor@example.com"),
        &["add", "--question", "New?", "--answer", "Yes.", "--tag", "misc"],
    );
    assert!(success, "editor add failed: {}", stderr);
    assert!(stdout.contains("Created"));

    let (_, _, success) = run_qk(&config_path, Some(OWNER), &["admins", "remove", OWNER]);
    assert!(!success);

    let (stdout, _, success) = run_qk(&config_path, Some(OWNER), &["delete-all", "--yes"]);
    assert!(success);
    assert!(stdout.contains("Deleted 1 FAQs (0 failed)."));
}
