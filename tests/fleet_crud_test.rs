mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, money, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn company_create_get_replace_and_soft_delete() {
    let app = TestApp::new().await;

    let created = app
        .create(
            "/api/v1/companies",
            json!({
                "name": "Lucky Seven SRL",
                "registration_number": "J12/345/2019",
                "tax_id": "RO40123456",
                "email": "office@luckyseven.ro",
            }),
        )
        .await;
    let id = id_of(&created);
    assert_eq!(created["name"], "Lucky Seven SRL");
    assert_eq!(created["is_active"], true);

    let fetched = app.get_data(&format!("/api/v1/companies/{id}")).await;
    assert_eq!(fetched["registration_number"], "J12/345/2019");
    assert_eq!(fetched["tax_id"], "RO40123456");

    // PUT replaces every editable field, so omitted optionals are cleared
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/companies/{id}"),
            Some(json!({
                "name": "Lucky Seven Gaming SRL",
                "registration_number": "J12/345/2019",
                "email": "contact@luckyseven.ro",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["name"], "Lucky Seven Gaming SRL");
    assert!(body["data"]["tax_id"].is_null());

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/companies/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let listed = app.get_data("/api/v1/companies").await;
    assert_eq!(listed["total"], 0);

    let with_inactive = app.get_data("/api/v1/companies?include_inactive=true").await;
    assert_eq!(with_inactive["total"], 1);
    assert_eq!(with_inactive["items"][0]["is_active"], false);
}

#[tokio::test]
async fn missing_rows_are_not_found() {
    let app = TestApp::new().await;
    let unknown = uuid::Uuid::new_v4();

    for path in ["companies", "slots", "billing-plans", "automated-bills"] {
        let (status, body) = app
            .send(Method::GET, &format!("/api/v1/{path}/{unknown}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}: {body}");
        assert!(body["message"].as_str().unwrap().contains(&unknown.to_string()));
    }

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/providers/{unknown}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/companies",
            Some(json!({
                "name": "Bad Mail SRL",
                "registration_number": "J01/1/2020",
                "email": "not-an-email",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // missing required field
    let (status, _) = app
        .send(Method::POST, "/api/v1/providers", Some(json!({ "website": "https://x.io" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/slots",
            Some(json!({ "serial_number": "EGT-0001", "rtp_percent": "150" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/invoices",
            Some(json!({
                "invoice_number": "INV-1",
                "company_id": uuid::Uuid::new_v4(),
                "issue_date": "2024-03-10",
                "due_date": "2024-03-01",
                "amount": "100.00",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new().await;
    let response = app
        .request_with_token(Method::POST, "/api/v1/companies", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_references_are_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/locations",
            Some(json!({
                "company_id": uuid::Uuid::new_v4(),
                "name": "Orphan Hall",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("company"));
}

#[tokio::test]
async fn duplicate_unique_values_conflict() {
    let app = TestApp::new().await;
    app.create("/api/v1/providers", json!({ "name": "Novomatic" }))
        .await;

    let (status, _) = app
        .send(Method::POST, "/api/v1/providers", Some(json!({ "name": "Novomatic" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_paginates_and_searches() {
    let app = TestApp::new().await;
    for name in ["EGT", "Novomatic", "Amatic", "Apollo Games", "Synot"] {
        app.create("/api/v1/providers", json!({ "name": name })).await;
    }

    let page = app.get_data("/api/v1/providers?page=2&limit=2").await;
    assert_eq!(page["total"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);

    let clamped = app.get_data("/api/v1/providers?page=0&limit=1000").await;
    assert_eq!(clamped["page"], 1);
    assert_eq!(clamped["limit"], 100);

    let found = app.get_data("/api/v1/providers?search=mat").await;
    assert_eq!(found["total"], 2);

    let blank = app.get_data("/api/v1/providers?search=%20%20").await;
    assert_eq!(blank["total"], 5);
}

#[tokio::test]
async fn search_matches_wildcards_literally() {
    let app = TestApp::new().await;
    for name in ["Hot 50% Spins", "Hot 500 Spins", "Mega_Jack", "MegaXJack"] {
        app.create("/api/v1/providers", json!({ "name": name })).await;
    }

    let percent = app.get_data("/api/v1/providers?search=50%25").await;
    assert_eq!(percent["total"], 1);
    assert_eq!(percent["items"][0]["name"], "Hot 50% Spins");

    let underscore = app.get_data("/api/v1/providers?search=Mega_").await;
    assert_eq!(underscore["total"], 1);
    assert_eq!(underscore["items"][0]["name"], "Mega_Jack");
}

#[tokio::test]
async fn unreachable_pages_are_rejected() {
    let app = TestApp::new().await;
    app.create("/api/v1/providers", json!({ "name": "EGT" })).await;

    let (status, body) = app
        .send(
            Method::GET,
            "/api/v1/providers?page=18446744073709551615&limit=100",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(body["message"].as_str().unwrap().contains("out of range"));

    let empty = app.get_data("/api/v1/providers?page=1000000&limit=100").await;
    assert_eq!(empty["total"], 1);
    assert_eq!(empty["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn nested_listings_filter_by_parent() {
    let app = TestApp::new().await;
    let company = app.seed_company("Diamond Play").await;
    let other = app.seed_company("Royal Spin").await;

    for (company_id, name) in [(&company, "Hall A"), (&company, "Hall B"), (&other, "Hall C")] {
        app.create(
            "/api/v1/locations",
            json!({ "company_id": company_id, "name": name }),
        )
        .await;
    }

    let locations = app
        .get_data(&format!("/api/v1/companies/{company}/locations"))
        .await;
    assert_eq!(locations["total"], 2);

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/v1/companies/{}/locations", uuid::Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn slots_link_fleet_records() {
    let app = TestApp::new().await;
    let location = app.seed_location("Casino Arad").await;
    let provider = id_of(&app.create("/api/v1/providers", json!({ "name": "EGT" })).await);
    let cabinet = id_of(
        &app.create(
            "/api/v1/cabinets",
            json!({ "provider_id": provider, "name": "P42V", "model_name": "P-42V Curved" }),
        )
        .await,
    );
    let mix = id_of(
        &app.create(
            "/api/v1/game-mixes",
            json!({ "provider_id": provider, "name": "Collection 7", "game_count": 40 }),
        )
        .await,
    );

    let slot = app
        .create(
            "/api/v1/slots",
            json!({
                "serial_number": "EGT-2024-0001",
                "location_id": location,
                "cabinet_id": cabinet,
                "game_mix_id": mix,
                "provider_id": provider,
                "denomination": "0.01",
                "rtp_percent": "96.50",
                "commissioned_on": "2024-02-01",
            }),
        )
        .await;
    assert_eq!(slot["status"], "active");
    assert_eq!(money(&slot["rtp_percent"]), dec!(96.50));

    let slots = app.get_data(&format!("/api/v1/locations/{location}/slots")).await;
    assert_eq!(slots["total"], 1);

    let mixes = app
        .get_data(&format!("/api/v1/providers/{provider}/game-mixes"))
        .await;
    assert_eq!(mixes["items"][0]["game_count"], 40);
}

#[tokio::test]
async fn onjn_report_submission_is_stamped() {
    let app = TestApp::new().await;
    let company = app.seed_company("Regal Slots").await;

    let draft = app
        .create(
            "/api/v1/onjn-reports",
            json!({
                "report_number": "ONJN-2024-03",
                "company_id": company,
                "report_type": "monthly_tax",
                "period_start": "2024-03-01",
                "period_end": "2024-03-31",
            }),
        )
        .await;
    assert_eq!(draft["status"], "draft");
    assert!(draft["submitted_at"].is_null());

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/onjn-reports/{}", id_of(&draft)),
            Some(json!({
                "report_number": "ONJN-2024-03",
                "company_id": company,
                "report_type": "monthly_tax",
                "period_start": "2024-03-01",
                "period_end": "2024-03-31",
                "status": "submitted",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["submitted_at"].is_string());
}

#[tokio::test]
async fn invoice_currency_defaults_from_configuration() {
    let app = TestApp::new().await;
    let company = app.seed_company("Golden Reel").await;

    let invoice = app
        .create(
            "/api/v1/invoices",
            json!({
                "invoice_number": "INV-2024-0007",
                "company_id": company,
                "issue_date": "2024-03-01",
                "due_date": "2024-03-16",
                "amount": "1250.50",
            }),
        )
        .await;
    assert_eq!(invoice["currency"], "RON");
    assert_eq!(invoice["status"], "draft");
    assert_eq!(money(&invoice["amount"]), dec!(1250.50));
}

#[tokio::test]
async fn api_token_guards_resources_but_not_status() {
    let token = "t".repeat(40);
    let app = TestApp::with_config(|cfg| cfg.api_token = Some(token.clone())).await;

    let response = app
        .request_with_token(Method::GET, "/api/v1/companies", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request_with_token(Method::GET, "/api/v1/companies", None, Some("wrong"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request_with_token(Method::GET, "/api/v1/companies", None, Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request_with_token(Method::GET, "/api/v1/status", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn status_and_health_report_ok() {
    let app = TestApp::new().await;

    let status = app.get_data("/api/v1/status").await;
    assert_eq!(status["status"], "ok");
    assert_eq!(status["environment"], "test");

    let health = app.get_data("/api/v1/health").await;
    assert_eq!(health["database"], "healthy");
}

#[tokio::test]
async fn responses_echo_request_id() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/v1/status", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}
