use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("portal_core_cli").unwrap();
    cmd.env("PORTAL_CORE_HOME", home.path())
        .env("PORTAL_CORE_CLI_SCRIPT", "1")
        .env("PORTAL_CORE_COLUMNS", "60")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

const CUSTOMER_SCRIPT: &str = "Ada Lovelace\nada@example.com\n3125551234\n\n1 Main St\nSpringfield\nIL\n62701\nEmail\n\nyes\n";

#[test]
fn formats_phone_numbers() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["format-phone", "31255512349999"])
        .assert()
        .success()
        .stdout("(312) 555-1234\n");
}

#[test]
fn status_keeps_pending_active_rule() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["status", "pending", "true"])
        .assert()
        .success()
        .stdout("Inactive [bg-yellow-100 text-yellow-800]\n");
}

#[test]
fn avatar_for_numeric_id() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["avatar", "9"])
        .assert()
        .success()
        .stdout(contains("background: #FEF9C3"))
        .stdout(contains("initials").not());
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("add-custmer")
        .assert()
        .failure()
        .stderr(contains("Did you mean `add-customer`?"));
}

#[test]
fn version_prints_package_version() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(format!("portal_core {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn version_lists_build_metadata() {
    let home = TempDir::new().unwrap();
    let output = cli(&home).arg("version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let commit = Regex::new(r"(?m)^commit:\s+\S+ \((clean|dirty|unknown)\)$").unwrap();
    assert!(commit.is_match(&stdout), "unexpected version output:\n{}", stdout);
    assert!(stdout.lines().any(|line| line.starts_with("rustc:")));
}

#[test]
fn add_customer_from_script() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("add-customer")
        .write_stdin(CUSTOMER_SCRIPT)
        .assert()
        .success()
        .stdout(contains("Step 1 of 3: Personal details"))
        .stdout(contains("[ok] Add Customer saved"))
        .stdout(contains("\"full_name\": \"Ada Lovelace\""))
        .stdout(contains("\"phone\": \"(312) 555-1234\""));
}

#[test]
fn add_customer_reprompts_after_invalid_answers() {
    let home = TempDir::new().unwrap();
    let script = format!("\n{}", CUSTOMER_SCRIPT);
    cli(&home)
        .arg("add-customer")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("[!] Full name is required"))
        .stdout(contains("[ok] Add Customer saved"));
}

#[test]
fn add_customer_retries_after_server_failure() {
    let home = TempDir::new().unwrap();
    let script = format!("{}:keep\n:keep\nyes\n", CUSTOMER_SCRIPT);
    cli(&home)
        .args(["add-customer", "--fail", "Service unavailable"])
        .write_stdin(script)
        .assert()
        .success()
        .stderr(contains("[x] Service unavailable"))
        .stdout(contains("! Service unavailable"))
        .stdout(contains("[ok] Add Customer saved"));
}

#[test]
fn add_customer_cancels_at_end_of_input() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("add-customer")
        .write_stdin("Ada Lovelace\n")
        .assert()
        .success()
        .stdout(contains("Cancelled, nothing was saved."))
        .stdout(contains("\"full_name\"").not());
}

#[test]
fn config_set_persists_between_runs() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "set", "page_size", "2"])
        .assert()
        .success()
        .stdout(contains("page_size = 2"));
    cli(&home)
        .args(["config", "get", "page_size"])
        .assert()
        .success()
        .stdout("2\n");
    cli(&home)
        .arg("products")
        .assert()
        .success()
        .stdout(contains("Showing 1-2 of 3 (page 1 of 2)"));
}

#[test]
fn config_rejects_unknown_keys() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "set", "colour", "red"])
        .assert()
        .failure()
        .stderr(contains("unknown setting `colour`"));
}

#[test]
fn products_sort_by_price_descending() {
    let home = TempDir::new().unwrap();
    let output = cli(&home)
        .args(["products", "--sort", "price", "--desc"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let first = stdout.lines().next().unwrap();
    assert!(first.starts_with("SY-300"), "unexpected first row: {}", first);
}

#[test]
fn session_commands_share_the_stored_session() {
    let home = TempDir::new().unwrap();
    cli(&home).arg("whoami").assert().success().stdout("Not signed in\n");
    cli(&home)
        .args(["login", "maya@example.com", "doctor"])
        .assert()
        .success()
        .stdout(contains("Signed in as maya@example.com (Doctor)"));
    cli(&home)
        .arg("whoami")
        .assert()
        .success()
        .stdout("maya <maya@example.com> (Doctor)\n");
    cli(&home)
        .args(["portal", "doctor"])
        .assert()
        .success();
    cli(&home)
        .args(["portal", "admin"])
        .assert()
        .failure()
        .stderr(contains("Doctor accounts cannot open the admin portal"));
    cli(&home).arg("logout").assert().success();
    cli(&home).arg("whoami").assert().success().stdout("Not signed in\n");
}

#[test]
fn import_reports_rejected_rows() {
    let home = TempDir::new().unwrap();
    let csv = home.path().join("products.csv");
    std::fs::write(&csv, "sku,name,price,stock\nA-1,Gloves,3.25,10\n,Mask,abc,5\n").unwrap();
    cli(&home)
        .arg("import-products")
        .arg(&csv)
        .assert()
        .success()
        .stdout(contains("row 3: SKU is required; price `abc` is not a valid amount"))
        .stdout(contains("Imported 1 product, 1 rows rejected"));
}
