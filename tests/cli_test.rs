use assert_cmd::Command;
use predicates::prelude::*;

// Nothing listens here, so every request fails fast with a connection error.
const DEAD_API: &str = "http://127.0.0.1:9/api";

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("aerodesk"));
    cmd.env_remove("AERODESK_API")
        .env_remove("AERODESK_PROXY")
        .env_remove("AERODESK_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn session_file(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("aerodesk-cli-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("session.json")
}

#[test]
fn top_level_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Search the airline booking backend from the terminal",
        ))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("destinations"))
        .stdout(predicate::str::contains("Examples:"))
        .stdout(predicate::str::contains("aerodesk search -d Córdoba --ym 2025-03"));
}

#[test]
fn top_level_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aerodesk 0.3.0"));
}

#[test]
fn search_help_shows_all_flags() {
    cmd()
        .args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-o, --origin <CITY>"))
        .stdout(predicate::str::contains("-d, --destination <CITY>"))
        .stdout(predicate::str::contains("-f, --from-date <YYYY-MM-DD>"))
        .stdout(predicate::str::contains("--ym <YYYY-MM>"))
        .stdout(predicate::str::contains("--query <QS>"))
        .stdout(predicate::str::contains("--page <N>"))
        .stdout(predicate::str::contains("--resolve"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--pretty"))
        .stdout(predicate::str::contains("--api <URL>"))
        .stdout(predicate::str::contains("--proxy <URL>"))
        .stdout(predicate::str::contains("--timeout <SECS>"))
        .stdout(predicate::str::contains("Whole month:"));
}

#[test]
fn no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn missing_destination_shows_empty_results() {
    cmd()
        .args(["search", "-o", "Rosario", "--api", DEAD_API])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 results in 0 pages"))
        .stdout(predicate::str::contains("No flights found"));
}

#[test]
fn invalid_from_date_fails() {
    cmd()
        .args([
            "search", "-o", "Rosario", "-d", "Salta", "-f", "14/03/2025", "--api", DEAD_API,
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must be YYYY-MM-DD"));
}

#[test]
fn json_mode_invalid_month_is_structured() {
    let output = cmd()
        .args(["search", "-d", "Salta", "--ym", "2025-13", "--json", "--api", DEAD_API])
        .assert()
        .code(2);
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON error");
    assert_eq!(parsed["error"]["kind"], "invalid_month");
}

#[test]
fn query_conflicts_with_explicit_flags() {
    cmd()
        .args(["search", "--query", "destination=Salta", "-d", "Jujuy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn unreachable_backend_shows_empty_results() {
    cmd()
        .args([
            "search", "-d", "Córdoba", "--ym", "2025-03", "--api", DEAD_API, "--timeout", "5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 results in 0 pages"))
        .stdout(predicate::str::contains("No flights found matching those criteria"));
}

#[test]
fn unreachable_backend_json_is_empty_page() {
    let output = cmd()
        .args([
            "search",
            "--query",
            "destination=C%C3%B3rdoba&ym=2025-03",
            "--json",
            "--api",
            DEAD_API,
            "--timeout",
            "5",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON page");
    assert_eq!(parsed["state"], "empty");
    assert_eq!(parsed["total"], 0);
    assert_eq!(parsed["totalPages"], 0);
    assert_eq!(parsed["days"], serde_json::json!([]));
}

#[test]
fn destinations_degrade_to_no_suggestions() {
    cmd()
        .args(["destinations", "bar", "--api", DEAD_API, "--timeout", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching destinations."));
}

#[test]
fn destinations_json_is_empty_array() {
    cmd()
        .args(["destinations", "bar", "--json", "--api", DEAD_API, "--timeout", "5"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn login_rejects_unknown_credentials() {
    let path = session_file("reject");
    cmd()
        .env("AERODESK_SESSION", &path)
        .args(["login", "--email", "admin@aerolinea.com", "--password", "nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("incorrect credentials"));
    assert!(!path.exists());
}

#[test]
fn login_whoami_logout_cycle() {
    let path = session_file("cycle");

    cmd()
        .env("AERODESK_SESSION", &path)
        .args(["login", "--email", "admin@aerolinea.com", "--password", "admin123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as admin@aerolinea.com (admin)"));

    cmd()
        .env("AERODESK_SESSION", &path)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Admin Demo <admin@aerolinea.com> (admin)"));

    cmd()
        .env("AERODESK_SESSION", &path)
        .arg("logout")
        .assert()
        .success();

    cmd()
        .env("AERODESK_SESSION", &path)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}
