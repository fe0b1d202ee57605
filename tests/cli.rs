use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::Server;
use predicates::prelude::*;

const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";

fn mock_releases(server: &mut Server) -> (mockito::Mock, mockito::Mock) {
    let latest = server
        .mock("GET", "/repos/owner/repo/releases/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "tag_name": "v1.2.0",
                "prerelease": false,
                "assets": [
                    {"name": "unkn.zip", "browser_download_url": "https://dl.example/v1.2.0/unkn.zip"}
                ]
            }"#,
        )
        .create();

    let list = server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"tag_name": "v1.3.0-nightly", "prerelease": true, "assets": [
                    {"name": "unkn.zip", "browser_download_url": "https://dl.example/nightly/unkn.zip"}
                ]},
                {"tag_name": "v1.2.0", "prerelease": false, "assets": []}
            ]"#,
        )
        .create();

    (latest, list)
}

#[test]
fn test_classify_mobile() {
    Command::new(cargo::cargo_bin!("unkn-landing"))
        .arg("classify")
        .arg(IPHONE_UA)
        .assert()
        .success()
        .stdout("mobile\n");
}

#[test]
fn test_classify_desktop() {
    Command::new(cargo::cargo_bin!("unkn-landing"))
        .arg("classify")
        .arg("Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
        .assert()
        .success()
        .stdout("desktop\n");
}

#[test]
fn test_links_resolves_both_buttons() {
    let mut server = Server::new();
    let url = server.url();
    let (latest, list) = mock_releases(&mut server);

    Command::new(cargo::cargo_bin!("unkn-landing"))
        .args(["links", "--repo", "owner/repo", "--api-url", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "stable: https://dl.example/v1.2.0/unkn.zip",
        ))
        .stdout(predicate::str::contains(
            "nightly: https://dl.example/nightly/unkn.zip",
        ));

    latest.assert();
    list.assert();
}

#[test]
fn test_links_json_reports_failures() {
    let mut server = Server::new();
    let url = server.url();

    let _latest = server
        .mock("GET", "/repos/owner/repo/releases/latest")
        .with_status(404)
        .create();
    let _list = server
        .mock("GET", "/repos/owner/repo/releases")
        .with_status(200)
        .with_body(r#"[{"tag_name": "v1.0.0", "prerelease": false, "assets": []}]"#)
        .create();

    let output = Command::new(cargo::cargo_bin!("unkn-landing"))
        .args(["links", "--json", "--repo", "owner/repo", "--api-url", &url])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["stable"]["state"], "disabled");
    assert_eq!(json["stable"]["cause"]["reason"], "fetch_failed");
    assert_eq!(json["nightly"]["state"], "disabled");
    assert_eq!(json["nightly"]["cause"]["reason"], "no_release");
}

#[test]
fn test_links_unreachable_api_does_not_fail() {
    Command::new(cargo::cargo_bin!("unkn-landing"))
        .args(["links", "--api-url", "http://127.0.0.1:1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stable: disabled (fetch failed"))
        .stdout(predicate::str::contains("nightly: disabled (fetch failed"));
}

#[test]
fn test_links_rejects_bad_repo() {
    Command::new(cargo::cargo_bin!("unkn-landing"))
        .args(["links", "--repo", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --repo"));
}

#[test]
fn test_simulate_desktop_reveal() {
    Command::new(cargo::cargo_bin!("unkn-landing"))
        .args(["simulate", "--offline", "--video-ended", "--press", "Insert"])
        .assert()
        .success()
        .stdout(predicate::str::contains("device: desktop"))
        .stdout(predicate::str::contains(
            "video: src=static/assets/background_loop.mp4 loop=true",
        ))
        .stdout(predicate::str::contains(".gui: height=400px opacity=1 pointer-events=auto"))
        .stdout(predicate::str::contains(".logo: opacity=1"))
        .stdout(predicate::str::contains(".warn: opacity=0"));
}

#[test]
fn test_simulate_desktop_without_key_keeps_panel_hidden() {
    Command::new(cargo::cargo_bin!("unkn-landing"))
        .args(["simulate", "--offline", "--press", "Enter"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".warn: opacity=1"))
        .stdout(predicate::str::contains(".gui:").not());
}

#[test]
fn test_simulate_mobile() {
    Command::new(cargo::cargo_bin!("unkn-landing"))
        .args(["simulate", "--user-agent", IPHONE_UA])
        .assert()
        .success()
        .stdout(predicate::str::contains("device: mobile"))
        .stdout(predicate::str::contains("class=\"gui-mobile\""))
        .stdout(predicate::str::contains(".logo: opacity=1"));
}

#[test]
fn test_simulate_binds_buttons() {
    let mut server = Server::new();
    let url = server.url();
    let (_latest, _list) = mock_releases(&mut server);

    Command::new(cargo::cargo_bin!("unkn-landing"))
        .args(["simulate", "--repo", "owner/repo", "--api-url", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "#release: [href=https://dl.example/v1.2.0/unkn.zip]",
        ))
        .stdout(predicate::str::contains(
            "#nightly: [href=https://dl.example/nightly/unkn.zip]",
        ));
}
