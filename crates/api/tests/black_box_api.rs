use std::sync::Arc;

use chrono::Utc;
use partstrack_api::app::{AppServices, Backends};
use partstrack_auth::{CredentialHasher, HashingConfig, LifecycleConfig};
use partstrack_core::{Decimal, PartId, SaleId, SupplierId};
use partstrack_infra::{InMemoryAccountStore, InMemoryCatalog, InMemorySessionStore, RecordingMailer};
use partstrack_inventory::{CatalogError, InventoryCatalog, Part, Sale, SalesLedger, Supplier};
use reqwest::StatusCode;
use serde_json::{json, Value};

const ADMIN_PASSWORD: &str = "admin-password-1";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    catalog: Arc<InMemoryCatalog>,
}

impl TestServer {
    async fn spawn() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        Self::spawn_with(catalog.clone(), catalog.clone(), catalog).await
    }

    async fn spawn_with(
        catalog: Arc<dyn InventoryCatalog>,
        ledger: Arc<dyn SalesLedger>,
        handle_catalog: Arc<InMemoryCatalog>,
    ) -> Self {
        let backends = Backends {
            accounts: Arc::new(InMemoryAccountStore::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
            mailer: Arc::new(RecordingMailer::new()),
            catalog,
            ledger,
        };
        let hasher = CredentialHasher::new(HashingConfig::testing()).unwrap();
        let services = AppServices::new(backends, hasher, LifecycleConfig::default(), false);
        services
            .lifecycle
            .bootstrap_administrator("admin", "admin@example.com", ADMIN_PASSWORD)
            .unwrap();

        // Build app (same router as prod), but bind to an ephemeral port.
        let app = partstrack_api::app::build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            catalog: handle_catalog,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn part(number: &str, name: &str, quantity: u32, minimum_stock: u32, cents: i64) -> Part {
    Part {
        id: PartId::new(),
        part_number: number.to_string(),
        part_name: name.to_string(),
        category: "Engine".to_string(),
        quantity,
        minimum_stock,
        price: Decimal::new(cents, 2),
        supplier_id: None,
        location: String::new(),
        description: String::new(),
    }
}

fn sale(number: &str, part: &Part, quantity_sold: u32) -> Sale {
    Sale {
        id: SaleId::new(),
        sale_number: number.to_string(),
        part_id: part.id,
        quantity_sold,
        total_price: part.price * Decimal::from(quantity_sold),
        employee_id: None,
        created_at: Utc::now(),
        notes: String::new(),
    }
}

async fn login(client: &reqwest::Client, srv: &TestServer, identifier: &str, password: &str) -> reqwest::Response {
    client
        .post(srv.url("/login"))
        .json(&json!({ "identifier": identifier, "password": password }))
        .send()
        .await
        .unwrap()
}

async fn login_token(client: &reqwest::Client, srv: &TestServer, identifier: &str, password: &str) -> String {
    let res = login(client, srv, identifier, password).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// Provision an employee as admin and return (id, generated credential).
async fn provision(client: &reqwest::Client, srv: &TestServer, admin: &str, username: &str) -> (String, String) {
    let res = client
        .post(srv.url("/employees"))
        .bearer_auth(admin)
        .json(&json!({
            "username": username,
            "first_name": "Alice",
            "last_name": "Smith",
            "email": format!("{username}@example.com"),
            "mobile": ""
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    (
        body["id"].as_str().unwrap().to_string(),
        body["credential"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/whoami", "/dashboard", "/api/stock-status", "/employees"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
    }

    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth("not-a-session")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let wrong = login(&client, &srv, "admin", "nope").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong: Value = wrong.json().await.unwrap();

    let unknown = login(&client, &srv, "ghost", "nope").await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown: Value = unknown.json().await.unwrap();

    assert_eq!(wrong, unknown);
}

#[tokio::test]
async fn admin_can_log_in_by_email() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = login(&client, &srv, "admin@example.com", ADMIN_PASSWORD).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["role"], "admin");
    assert_eq!(body["must_change_password"], false);
    assert_eq!(body["next"], "/dashboard");

    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth(body["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    let who: Value = res.json().await.unwrap();
    assert_eq!(who["username"], "admin");
    assert_eq!(who["role"], "admin");
}

#[tokio::test]
async fn employee_onboarding_requires_password_change() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = login_token(&client, &srv, "admin", ADMIN_PASSWORD).await;

    let (_, credential) = provision(&client, &srv, &admin, "alice").await;

    let res = login(&client, &srv, "alice", &credential).await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["role"], "employee");
    assert_eq!(body["must_change_password"], true);
    assert_eq!(body["next"], "/force-password-change");
    let token = body["token"].as_str().unwrap().to_string();

    // Gated until the password changes.
    let res = client.get(srv.url("/dashboard")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "password_change_required");

    let res = client
        .post(srv.url("/force-password-change"))
        .bearer_auth(&token)
        .json(&json!({ "new_password": "fresh-pass-1", "confirm_password": "fresh-pass-2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/force-password-change"))
        .bearer_auth(&token)
        .json(&json!({ "new_password": "fresh-pass-1", "confirm_password": "fresh-pass-1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The old session is gone.
    let res = client.get(srv.url("/whoami")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = login_token(&client, &srv, "alice", "fresh-pass-1").await;
    let res = client.get(srv.url("/dashboard")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["role"], "employee");
    assert!(body.get("stock_value").is_none());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = login_token(&client, &srv, "admin", ADMIN_PASSWORD).await;

    provision(&client, &srv, &admin, "alice").await;

    let res = client
        .post(srv.url("/employees"))
        .bearer_auth(&admin)
        .json(&json!({
            "username": "alice",
            "first_name": "Other",
            "last_name": "Alice",
            "email": "other@example.com",
            "mobile": ""
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client.get(srv.url("/employees")).bearer_auth(&admin).send().await.unwrap();
    let list: Value = res.json().await.unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn employees_cannot_manage_accounts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = login_token(&client, &srv, "admin", ADMIN_PASSWORD).await;
    let (bob_id, _) = provision(&client, &srv, &admin, "bob").await;
    let (_, credential) = provision(&client, &srv, &admin, "alice").await;

    let token = login_token(&client, &srv, "alice", &credential).await;
    client
        .post(srv.url("/force-password-change"))
        .bearer_auth(&token)
        .json(&json!({ "new_password": "fresh-pass-1", "confirm_password": "fresh-pass-1" }))
        .send()
        .await
        .unwrap();
    let token = login_token(&client, &srv, "alice", "fresh-pass-1").await;

    let res = client.get(srv.url("/employees")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(srv.url(&format!("/employees/{bob_id}/deactivate")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client.get(srv.url("/purchase-list")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deactivation_ends_sessions_and_logins() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = login_token(&client, &srv, "admin", ADMIN_PASSWORD).await;
    let (id, credential) = provision(&client, &srv, &admin, "alice").await;
    let token = login_token(&client, &srv, "alice", &credential).await;

    for _ in 0..2 {
        let res = client
            .post(srv.url(&format!("/employees/{id}/deactivate")))
            .bearer_auth(&admin)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    let res = client.get(srv.url("/whoami")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let res = login(&client, &srv, "alice", &credential).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client.get(srv.url("/employees")).bearer_auth(&admin).send().await.unwrap();
    let list: Value = res.json().await.unwrap();
    assert!(list.as_array().unwrap().is_empty());

    let res = client
        .post(srv.url("/employees/not-a-uuid/deactivate"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_edits_employee_contact() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = login_token(&client, &srv, "admin", ADMIN_PASSWORD).await;
    let (id, _) = provision(&client, &srv, &admin, "alice").await;

    let res = client
        .post(srv.url(&format!("/employees/{id}")))
        .bearer_auth(&admin)
        .json(&json!({ "last_name": "Jones", "mobile_number": "555-0199" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["last_name"], "Jones");
    assert_eq!(body["mobile_number"], "555-0199");
}

#[tokio::test]
async fn chart_endpoints_report_stock_and_sales() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = login_token(&client, &srv, "admin", ADMIN_PASSWORD).await;

    // Empty catalog first.
    let res = client.get(srv.url("/api/top-parts")).bearer_auth(&admin).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["labels"], json!(["No data"]));
    assert_eq!(body["quantities"], json!([0]));

    let filter = part("P-1", "Oil Filter", 0, 5, 899);
    let belt = part("P-2", "Timing Belt", 5, 5, 5900);
    let plug = part("P-3", "Spark Plug", 10, 5, 525);
    for p in [&filter, &belt, &plug] {
        srv.catalog.upsert_part(p.clone()).unwrap();
    }
    srv.catalog.record_sale(sale("S-1", &plug, 7)).unwrap();
    srv.catalog.record_sale(sale("S-2", &belt, 2)).unwrap();

    let res = client.get(srv.url("/api/stock-status")).bearer_auth(&admin).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["in_stock"], 1);
    assert_eq!(body["low_stock"], 1);
    assert_eq!(body["out_of_stock"], 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["success"], true);
    assert_eq!(body["timestamp"].as_str().unwrap().len(), "2024-01-01 00:00:00".len());

    let res = client.get(srv.url("/api/top-parts")).bearer_auth(&admin).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["labels"], json!(["Spark Plug", "Timing Belt"]));
    assert_eq!(body["quantities"], json!([7, 2]));
    assert_eq!(body["categories"], json!(["Engine", "Engine"]));
    assert_eq!(body["basis"], "sales");

    let res = client.get(srv.url("/dashboard")).bearer_auth(&admin).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["stock_value"], "347.50");
    assert_eq!(body["sales"]["count"], 2);
    assert_eq!(body["site_name"], "PartsTrack");
}

#[tokio::test]
async fn purchase_list_exports_requested_rows() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = login_token(&client, &srv, "admin", ADMIN_PASSWORD).await;

    let p1 = part("P1", "Oil Filter", 1, 5, 899);
    let p2 = part("P2", "Air Filter", 0, 5, 1450);
    let p3 = part("P3", "Spark Plug", 50, 5, 525);
    for p in [&p1, &p2, &p3] {
        srv.catalog.upsert_part(p.clone()).unwrap();
    }

    let res = client.get(srv.url("/purchase-list")).bearer_auth(&admin).send().await.unwrap();
    let candidates: Value = res.json().await.unwrap();
    let numbers: Vec<_> = candidates
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["part_number"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(numbers, vec!["P1", "P2"]);

    let res = client
        .post(srv.url("/purchase-list"))
        .bearer_auth(&admin)
        .json(&json!({ "quantities": { (p1.id.to_string()): "10", (p2.id.to_string()): "" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains("purchase_list.csv"));
    let csv = res.text().await.unwrap();
    assert_eq!(csv, "Part Number,Part Name,Quantity To Purchase\r\nP1,Oil Filter,10\r\n");

    let res = client
        .post(srv.url("/purchase-list"))
        .bearer_auth(&admin)
        .json(&json!({ "quantities": { "bogus": "1" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_listings_respect_roles() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = login_token(&client, &srv, "admin", ADMIN_PASSWORD).await;

    let filter = part("P-1", "Oil Filter", 0, 5, 899);
    let plug = part("P-2", "Spark Plug", 10, 5, 525);
    for p in [&filter, &plug] {
        srv.catalog.upsert_part(p.clone()).unwrap();
    }
    srv.catalog.record_sale(sale("S-1", &plug, 3)).unwrap();
    for name in ["Zenith Supply", "Acme Auto"] {
        srv.catalog
            .upsert_supplier(Supplier {
                id: SupplierId::new(),
                name: name.to_string(),
                email: String::new(),
                phone: String::new(),
                address: String::new(),
            })
            .unwrap();
    }

    let res = client.get(srv.url("/parts")).bearer_auth(&admin).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["parts"][0]["part_number"], "P-1");
    assert_eq!(body["parts"][0]["level"], "OUT_OF_STOCK");
    assert_eq!(body["parts"][1]["level"], "IN_STOCK");
    assert_eq!(body["stock_value"], "52.50");

    let res = client
        .get(srv.url(&format!("/parts/{}", plug.id)))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["part_name"], "Spark Plug");

    let res = client
        .get(srv.url(&format!("/parts/{}", PartId::new())))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(srv.url("/sales")).bearer_auth(&admin).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["summary"]["count"], 1);
    assert_eq!(body["summary"]["revenue"], "15.75");
    assert_eq!(body["sales"].as_array().unwrap().len(), 1);

    let res = client.get(srv.url("/suppliers")).bearer_auth(&admin).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["total_suppliers"], 2);
    assert_eq!(body["suppliers"][0]["name"], "Acme Auto");
    assert_eq!(body["suppliers"][1]["name"], "Zenith Supply");

    // Employees see parts without the valuation and nothing else.
    let (_, credential) = provision(&client, &srv, &admin, "alice").await;
    let first = login_token(&client, &srv, "alice", &credential).await;
    let res = client
        .post(srv.url("/force-password-change"))
        .bearer_auth(&first)
        .json(&json!({ "new_password": "new-secret-1", "confirm_password": "new-secret-1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let employee = login_token(&client, &srv, "alice", "new-secret-1").await;

    let res = client.get(srv.url("/parts")).bearer_auth(&employee).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert!(body.get("stock_value").is_none());
    assert_eq!(body["parts"].as_array().unwrap().len(), 2);

    for path in ["/sales", "/suppliers"] {
        let res = client.get(srv.url(path)).bearer_auth(&employee).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{path}");
    }
}

#[tokio::test]
async fn overflowing_valuation_fails_without_panicking() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let admin = login_token(&client, &srv, "admin", ADMIN_PASSWORD).await;

    let mut huge = part("P-MAX", "Gold Plated Gearbox", 2, 5, 0);
    huge.price = Decimal::MAX;
    srv.catalog.upsert_part(huge).unwrap();

    for path in ["/dashboard", "/analytics", "/parts"] {
        let res = client.get(srv.url(path)).bearer_auth(&admin).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "aggregation_failure");
    }

    // The server is still up and counting stock.
    let res = client.get(srv.url("/api/stock-status")).bearer_auth(&admin).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["low_stock"], 1);
}

struct OfflineCatalog;

impl InventoryCatalog for OfflineCatalog {
    fn parts(&self) -> Result<Vec<Part>, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }

    fn part(&self, _id: PartId) -> Result<Option<Part>, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }

    fn suppliers(&self) -> Result<Vec<Supplier>, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }
}

impl SalesLedger for OfflineCatalog {
    fn sales(&self) -> Result<Vec<Sale>, CatalogError> {
        Err(CatalogError::Unavailable("database offline".to_string()))
    }
}

#[tokio::test]
async fn chart_endpoints_degrade_on_catalog_failure() {
    let offline = Arc::new(OfflineCatalog);
    let srv = TestServer::spawn_with(offline.clone(), offline, Arc::new(InMemoryCatalog::new())).await;
    let client = reqwest::Client::new();
    let admin = login_token(&client, &srv, "admin", ADMIN_PASSWORD).await;

    let res = client.get(srv.url("/api/stock-status")).bearer_auth(&admin).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("database offline"));

    let res = client.get(srv.url("/api/top-parts")).bearer_auth(&admin).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["labels"], json!(["Error"]));
    assert_eq!(body["quantities"], json!([0]));
}
