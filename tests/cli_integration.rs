use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn crmdesk(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("crmdesk").unwrap();
    cmd.env("CRMDESK_HOME", home)
        .env_remove("CRMDESK_API_URL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn customers_json() -> serde_json::Value {
    json!([
        {
            "id": "c1",
            "name": "John Doe",
            "email": "j@x.com",
            "company": "Acme",
            "status": "active",
            "created_at": "2024-03-01T09:30:00"
        },
        {
            "id": "c2",
            "name": "Jane Roe",
            "email": "jane@y.com",
            "company": "Beta",
            "status": "prospect",
            "created_at": "2024-03-02T10:00:00"
        }
    ])
}

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customers_json()))
        .mount(&server)
        .await;
    server
}

// ── offline ─────────────────────────────────────────────────────

#[test]
fn test_fields_lists_editable_fields() {
    let temp_dir = tempfile::tempdir().unwrap();
    crmdesk(temp_dir.path())
        .args(["customers", "fields"])
        .assert()
        .success()
        .stdout(predicate::str::contains("billing_address"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_offline_add_reports_field_errors() {
    let temp_dir = tempfile::tempdir().unwrap();
    crmdesk(temp_dir.path())
        .args(["--offline", "customers", "add", "name=", "email=not-an-email", "company=Acme"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Please enter customer name"))
        .stderr(predicate::str::contains("Please enter a valid email"))
        .stderr(predicate::str::contains("company").not())
        .stdout(predicate::str::contains("successfully").not());
}

#[test]
fn test_offline_add_succeeds() {
    let temp_dir = tempfile::tempdir().unwrap();
    crmdesk(temp_dir.path())
        .args([
            "--offline",
            "customers",
            "add",
            "name=John Doe",
            "email=j@x.com",
            "company=Acme",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer created successfully"));

    crmdesk(temp_dir.path())
        .args(["--offline", "leads", "add", "name=Big deal", "status=qualified"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lead created successfully"));
}

#[test]
fn test_offline_list_is_empty() {
    let temp_dir = tempfile::tempdir().unwrap();
    crmdesk(temp_dir.path())
        .args(["--offline", "customers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No customers found."))
        .stdout(predicate::str::contains("0 of 0 customers"));
}

#[test]
fn test_offline_employee_add() {
    let temp_dir = tempfile::tempdir().unwrap();
    crmdesk(temp_dir.path())
        .args(["--offline", "employees", "add", "full_name=Grace Hopper"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Please enter employee ID"))
        .stderr(predicate::str::contains("Please select hire date"));

    crmdesk(temp_dir.path())
        .args([
            "--offline",
            "emp",
            "add",
            "employee_id=E-042",
            "full_name=Grace Hopper",
            "email=grace@x.com",
            "position=Engineer",
            "hire_date=2023-01-09",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Employee created successfully"));
}

#[test]
fn test_unknown_field_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    crmdesk(temp_dir.path())
        .args(["--offline", "customers", "add", "nickname=JD"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown field: nickname"));
}

// ── config ──────────────────────────────────────────────────────

#[test]
fn test_config_set_and_get() {
    let temp_dir = tempfile::tempdir().unwrap();

    crmdesk(temp_dir.path())
        .args(["config", "page-size", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("page-size = 25"));

    crmdesk(temp_dir.path())
        .args(["config", "page-size"])
        .assert()
        .success()
        .stdout(predicate::str::diff("25\n"));

    crmdesk(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("api-url = http://localhost:5000/api/v1"));

    assert!(temp_dir.path().join("config.json").exists());
}

#[test]
fn test_config_rejects_unknown_keys() {
    let temp_dir = tempfile::tempdir().unwrap();
    crmdesk(temp_dir.path())
        .args(["config", "theme", "dark"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown config key: theme"));
}

// ── against a backend ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_filters_and_summarizes() {
    let server = backend().await;
    let temp_dir = tempfile::tempdir().unwrap();

    crmdesk(temp_dir.path())
        .args(["--api-url", &format!("{}/api/v1", server.uri())])
        .args(["customers", "list", "--search", "jo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("John Doe"))
        .stdout(predicate::str::contains("Jane Roe").not())
        .stdout(predicate::str::contains("1-1 of 1 customers"));

    crmdesk(temp_dir.path())
        .env("CRMDESK_API_URL", format!("{}/api/v1", server.uri()))
        .args(["customers", "list", "--status", "prospect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Roe"))
        .stdout(predicate::str::contains("John Doe").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_prints_every_field() {
    let server = backend().await;
    let temp_dir = tempfile::tempdir().unwrap();

    crmdesk(temp_dir.path())
        .args(["--api-url", &format!("{}/api/v1", server.uri())])
        .args(["customers", "show", "c2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Roe"))
        .stdout(predicate::str::contains("jane@y.com"))
        .stdout(predicate::str::contains("billing_address"))
        .stdout(predicate::str::contains("prospect"))
        .stdout(predicate::str::contains("John Doe").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_employees_use_their_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/employees/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "7",
            "employee_id": "E-042",
            "full_name": "Grace Hopper",
            "email": "grace@x.com",
            "position": "Engineer",
            "hire_date": "2023-01-09",
            "status": "on_leave",
            "created_at": "2023-01-09T08:00:00"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = tempfile::tempdir().unwrap();

    crmdesk(temp_dir.path())
        .args(["--api-url", &format!("{}/api/v1", server.uri())])
        .args(["employees", "list", "--status", "on-leave", "--search", "e-042"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Grace Hopper"))
        .stdout(predicate::str::contains("1-1 of 1 employees"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_confirmation_does_nothing() {
    let server = backend().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let temp_dir = tempfile::tempdir().unwrap();

    crmdesk(temp_dir.path())
        .args(["--api-url", &format!("{}/api/v1", server.uri())])
        .args(["customers", "delete", "c1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Are you sure you want to delete this customer?",
        ))
        .stdout(predicate::str::contains("Cancelled."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes() {
    let server = backend().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/customers/c1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = tempfile::tempdir().unwrap();

    crmdesk(temp_dir.path())
        .args(["--api-url", &format!("{}/api/v1", server.uri())])
        .args(["customers", "delete", "c1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer deleted successfully"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_edit_unknown_id_is_not_found() {
    let server = backend().await;
    let temp_dir = tempfile::tempdir().unwrap();

    crmdesk(temp_dir.path())
        .args(["--api-url", &format!("{}/api/v1", server.uri())])
        .args(["customers", "edit", "nope", "status=inactive"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Record not found: nope"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_load_is_reported_without_backend_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("relation customers does not exist"),
        )
        .mount(&server)
        .await;
    let temp_dir = tempfile::tempdir().unwrap();

    crmdesk(temp_dir.path())
        .args(["--api-url", &format!("{}/api/v1", server.uri())])
        .args(["customers", "list"])
        .assert()
        .code(1)
        .stdout(predicate::str::diff("Failed to load customers\n"))
        .stderr(predicate::str::contains("relation").not())
        .stderr(predicate::str::contains("500").not())
        .stderr(predicate::str::contains("Error:").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_delete_is_reported_without_backend_details() {
    let server = backend().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/customers/c1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("replica set unavailable"))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = tempfile::tempdir().unwrap();

    crmdesk(temp_dir.path())
        .args(["--api-url", &format!("{}/api/v1", server.uri())])
        .args(["customers", "delete", "c1", "--yes"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed to delete customer"))
        .stdout(predicate::str::contains("replica").not())
        .stderr(predicate::str::contains("replica").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_verbose_logs_backend_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("relation customers does not exist"),
        )
        .mount(&server)
        .await;
    let temp_dir = tempfile::tempdir().unwrap();

    crmdesk(temp_dir.path())
        .args(["--api-url", &format!("{}/api/v1", server.uri())])
        .args(["customers", "list", "-v"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed to load customers"))
        .stderr(predicate::str::contains("relation customers does not exist"));
}
