use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn run_command(args: Vec<String>, test_dir: String) -> (bool, String, String) {
    // Use cargo run which will build if needed
    // Point LABEXT_CATALOG_DIR at the test directory so no stray config is picked up
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(&args)
        .env("LABEXT_CATALOG_DIR", &test_dir)
        .env_remove("RUST_LOG")
        .current_dir(env::current_dir().unwrap())
        .output()
        .expect("Failed to execute command");

    let success = output.status.success();
    let stdout = String::from_utf8(output.stdout).unwrap_or_default();
    let stderr = String::from_utf8(output.stderr).unwrap_or_default();

    // Filter out cargo compilation messages from stderr
    let filtered_stderr: String = stderr
        .lines()
        .filter(|line| {
            !line.contains("Compiling")
                && !line.contains("Finished")
                && !line.contains("warning:")
                && !line.contains("note:")
        })
        .collect::<Vec<_>>()
        .join("\n");

    let combined_output = if stdout.is_empty() {
        filtered_stderr.clone()
    } else if filtered_stderr.is_empty() {
        stdout.clone()
    } else {
        format!("{}\n{}", stdout, filtered_stderr)
    };

    (success, combined_output, filtered_stderr)
}

/// Run the binary off the async runtime so the mock server keeps serving
async fn run(args: &[&str], test_dir: &Path) -> (bool, String, String) {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let test_dir = test_dir.to_str().unwrap().to_string();
    tokio::task::spawn_blocking(move || run_command(args, test_dir))
        .await
        .unwrap()
}

fn setup_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

const LISTING: &str = "<?xml version='1.0'?><methodResponse><params><param><value><array><data>\
<value><array><data><value><string>jupyterlab_popular</string></value><value><string>3.0.0</string></value></data></array></value>\
<value><array><data><value><string>@scope/niche_ext</string></value><value><string>0.9.0</string></value></data></array></value>\
<value><array><data><value><string>@scope/niche_ext</string></value><value><string>1.0.0rc2</string></value></data></array></value>\
</data></array></value></param></params></methodResponse>";

async fn mount_listing(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/pypi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
        .mount(server)
        .await;
}

async fn mount_metadata(server: &MockServer, name: &str, version: &str, summary: &str) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/pypi/{}/{}/json",
            urlencoding::encode(name),
            version
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "info": {
                "author": "Extension Authors",
                "bugtrack_url": null,
                "docs_url": null,
                "home_page": "https://home.example",
                "license": "BSD-3-Clause",
                "package_url": format!("https://pypi.example/project/{}/", name),
                "project_url": format!("https://pypi.example/project/{}/", name),
                "project_urls": {"Source Code": format!("https://git.example/{}", name)},
                "summary": summary
            }
        })))
        .mount(server)
        .await;
}

async fn mount_stats(server: &MockServer, name: &str, last_month: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/stats/{}/recent", urlencoding::encode(name))))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": {"last_month": last_month}})),
        )
        .mount(server)
        .await;
}

fn mock_args<'a>(server_uri: &'a str, stats_template: &'a str) -> Vec<&'a str> {
    vec![
        "--base-url",
        server_uri,
        "--stats-url",
        stats_template,
        "--throttle",
        "0",
    ]
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = setup_test_dir();
    let (success, output, _) = run_command(
        vec!["--help".to_string()],
        temp_dir.path().to_str().unwrap().to_string(),
    );

    assert!(success, "--help should succeed. output: {}", output);
    assert!(output.contains("build"), "Expected 'build' in output: {}", output);
    assert!(output.contains("list"), "Expected 'list' in output: {}", output);
}

#[test]
fn test_negative_throttle_rejected() {
    let temp_dir = setup_test_dir();
    let output_path = temp_dir.path().join("catalog.json");
    let (success, output, _) = run_command(
        vec![
            "build".to_string(),
            "--throttle=-1".to_string(),
            "--output".to_string(),
            output_path.to_str().unwrap().to_string(),
        ],
        temp_dir.path().to_str().unwrap().to_string(),
    );

    assert!(!success, "Negative throttle should fail. output: {}", output);
    assert!(
        output.contains("rpc_request_throttling"),
        "Expected validation message in output: {}",
        output
    );
    assert!(!output_path.exists());
}

#[test]
fn test_invalid_config_file_rejected() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("labext-catalog.toml"),
        "rpc_request_throttling = \"fast\"\n",
    )
    .unwrap();

    let (success, output, _) = run_command(
        vec!["list".to_string()],
        temp_dir.path().to_str().unwrap().to_string(),
    );

    assert!(!success, "Invalid config should fail. output: {}", output);
    assert!(
        output.contains("Invalid config file"),
        "Expected config error in output: {}",
        output
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_build_writes_sorted_catalog() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    mount_metadata(&server, "jupyterlab_popular", "3.0.0", "Popular").await;
    mount_metadata(&server, "@scope/niche_ext", "1.0.0rc2", "Niche").await;
    mount_stats(&server, "jupyterlab_popular", 5000).await;
    mount_stats(&server, "@scope/niche_ext", 12).await;

    let temp_dir = setup_test_dir();
    let output_path = temp_dir.path().join("catalog.json");
    let base_url = format!("{}/pypi", server.uri());
    let stats_url = format!("{}/stats/{{package}}/recent", server.uri());

    let mut args = vec!["build", "--output", output_path.to_str().unwrap()];
    args.extend(mock_args(&base_url, &stats_url));
    let (success, output, _) = run(&args, temp_dir.path()).await;

    assert!(success, "Build should succeed. output: {}", output);
    assert!(
        output.contains("Wrote 2 extension(s)"),
        "Expected summary in output: {}",
        output
    );

    let text = fs::read_to_string(&output_path).unwrap();
    let catalog: serde_json::Value = serde_json::from_str(&text).unwrap();
    let entries = catalog.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["name"], "scope-niche-ext");
    assert_eq!(entries[0]["latest_version"], "1.0.0-rc.2");
    assert_eq!(entries[0]["monthly_download"], 12);
    assert_eq!(entries[0]["pkg_type"], "prebuilt");
    assert_eq!(entries[0]["homepage_url"], "https://home.example");
    assert_eq!(
        entries[0]["repository_url"],
        "https://git.example/@scope/niche_ext"
    );

    assert_eq!(entries[1]["name"], "jupyterlab-popular");
    assert_eq!(entries[1]["monthly_download"], 5000);
    assert_eq!(entries[1]["description"], "Popular");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_build_with_failing_statistics_still_succeeds() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    mount_metadata(&server, "jupyterlab_popular", "3.0.0", "Popular").await;
    mount_metadata(&server, "@scope/niche_ext", "1.0.0rc2", "Niche").await;
    // no statistics mocks: every lookup gets a 404

    let temp_dir = setup_test_dir();
    let output_path = temp_dir.path().join("catalog.json");
    let base_url = format!("{}/pypi", server.uri());
    let stats_url = format!("{}/stats/{{package}}/recent", server.uri());

    let mut args = vec!["build", "--output", output_path.to_str().unwrap()];
    args.extend(mock_args(&base_url, &stats_url));
    let (success, output, _) = run(&args, temp_dir.path()).await;

    assert!(success, "Build should succeed. output: {}", output);
    let catalog: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    let entries = catalog.as_array().unwrap();
    assert!(entries.iter().all(|e| e["monthly_download"] == 0));
    // equal counts keep listing order
    assert_eq!(entries[0]["name"], "jupyterlab-popular");
    assert_eq!(entries[1]["name"], "scope-niche-ext");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_build_metadata_failure_writes_nothing() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    mount_metadata(&server, "jupyterlab_popular", "3.0.0", "Popular").await;
    // @scope/niche_ext metadata is missing

    let temp_dir = setup_test_dir();
    let output_path = temp_dir.path().join("catalog.json");
    let base_url = format!("{}/pypi", server.uri());
    let stats_url = format!("{}/stats/{{package}}/recent", server.uri());

    let mut args = vec!["build", "--output", output_path.to_str().unwrap()];
    args.extend(mock_args(&base_url, &stats_url));
    let (success, output, _) = run(&args, temp_dir.path()).await;

    assert!(!success, "Build should fail. output: {}", output);
    assert!(
        output.contains("Failed to fetch metadata for '@scope/niche_ext'"),
        "Expected metadata error in output: {}",
        output
    );
    assert!(!output_path.exists(), "No partial catalog should be written");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_prints_extensions() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    mount_metadata(&server, "jupyterlab_popular", "3.0.0", "Popular").await;
    mount_metadata(&server, "@scope/niche_ext", "1.0.0rc2", "Niche").await;
    mount_stats(&server, "jupyterlab_popular", 5000).await;

    let temp_dir = setup_test_dir();
    let base_url = format!("{}/pypi", server.uri());
    let stats_url = format!("{}/stats/{{package}}/recent", server.uri());

    let mut args = vec!["list"];
    args.extend(mock_args(&base_url, &stats_url));
    let (success, output, _) = run(&args, temp_dir.path()).await;

    assert!(success, "List should succeed. output: {}", output);
    assert!(output.contains("jupyterlab-popular"), "output: {}", output);
    assert!(output.contains("5000 downloads/month"), "output: {}", output);
    assert!(output.contains("scope-niche-ext"), "output: {}", output);
}
