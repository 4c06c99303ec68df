//! HTTP gateway tests against a mock backend
//!
//! Each test starts its own `wiremock` server, so they can run in parallel.

use apihub::catalog::models::Interface;
use apihub::catalog::services::{CatalogGateway, GatewayErrorKind, HttpCatalogGateway};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gateway(server: &MockServer) -> HttpCatalogGateway {
    HttpCatalogGateway::new(&server.uri()).unwrap()
}

fn cat_facts() -> Value {
    json!({
        "id": 1,
        "name": "Cat Facts",
        "type": "REST",
        "base_url": "https://catfact.ninja",
        "description": "Random cat facts",
        "auth_type": "NONE",
        "is_active": true,
        "created_at": "2025-11-03T15:09:16.753671",
        "updated_at": "2025-11-03T15:09:16.753671"
    })
}

#[tokio::test]
async fn list_interfaces_should_decode_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interfaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            cat_facts(),
            {"id": 2, "name": "Weather", "type": "REST", "base_url": "https://weather.example", "is_active": false}
        ])))
        .mount(&server)
        .await;

    let interfaces = gateway(&server).await.list_interfaces().await.unwrap();

    assert_eq!(interfaces.len(), 2);
    assert_eq!(interfaces[0].display_name(), "Cat Facts");
    assert_eq!(interfaces[1].is_active, Some(false));
}

#[tokio::test]
async fn get_interface_should_map_not_found_to_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interfaces/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = gateway(&server).await.get_interface(99).await.unwrap_err();

    assert_eq!(error.kind(), GatewayErrorKind::Application);
    assert_eq!(error.status(), Some(404));
    assert_eq!(error.message(), "Error Code: 404\nMessage: Not Found");
}

#[tokio::test]
async fn get_interface_by_name_should_percent_encode_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interfaces/name/Cat%20Facts%2Fv2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cat_facts()))
        .expect(1)
        .mount(&server)
        .await;

    let interface = gateway(&server)
        .await
        .get_interface_by_name("Cat Facts/v2")
        .await
        .unwrap();

    assert_eq!(interface.id, Some(1));
}

#[tokio::test]
async fn create_interface_should_send_backend_field_names() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/interfaces"))
        .and(body_partial_json(json!({
            "id": null,
            "name": "Cat Facts",
            "type": "REST",
            "base_url": "https://catfact.ninja",
            "auth_type": "NONE",
            "is_active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(cat_facts()))
        .expect(1)
        .mount(&server)
        .await;

    let draft = Interface::new("Cat Facts", "REST", "https://catfact.ninja");
    let created = gateway(&server).await.create_interface(&draft).await.unwrap();

    assert_eq!(created.id, Some(1));

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let object = body.as_object().unwrap();
    assert!(!object.contains_key("created_at"));
    assert!(!object.contains_key("updated_at"));
    assert!(!object.contains_key("endpoints"));
}

#[tokio::test]
async fn update_interface_should_put_full_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/interfaces/1"))
        .and(body_partial_json(json!({
            "id": 1,
            "name": "Cat Facts",
            "description": null,
            "is_active": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cat_facts()))
        .expect(1)
        .mount(&server)
        .await;

    let mut replacement = Interface::new("Cat Facts", "REST", "https://catfact.ninja").with_id(1);
    replacement.is_active = Some(false);

    gateway(&server)
        .await
        .update_interface(1, &replacement)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_interface_should_accept_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/interfaces/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server).await.delete_interface(1).await.unwrap();
}

#[tokio::test]
async fn delete_interface_should_surface_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/interfaces/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let error = gateway(&server).await.delete_interface(1).await.unwrap_err();

    assert_eq!(error.status(), Some(500));
    assert_eq!(error.message(), "Error Code: 500\nMessage: Internal Server Error");
}

#[tokio::test]
async fn list_endpoints_should_decode_parent_reference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interfaces/1/endpoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "apiInterface": {"id": 1, "name": "Cat Facts"}, "httpMethod": "GET", "path": "/fact"},
            {"id": 11, "apiInterface": 1, "httpMethod": "GET", "path": "/facts", "isActive": false}
        ])))
        .mount(&server)
        .await;

    let endpoints = gateway(&server).await.list_endpoints(1).await.unwrap();

    assert_eq!(endpoints.len(), 2);
    assert!(endpoints.iter().all(|endpoint| endpoint.parent_id == Some(1)));
    assert_eq!(endpoints[1].status_label(), "Inactive");
}

#[tokio::test]
async fn list_large_interfaces_should_use_large_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interfaces/large"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([cat_facts()])))
        .expect(1)
        .mount(&server)
        .await;

    let large = gateway(&server).await.list_large_interfaces().await.unwrap();

    assert_eq!(large.len(), 1);
}

#[tokio::test]
async fn server_info_should_read_root_banner() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Mini API Hub Backend API",
            "version": "1.0.0",
            "endpoints": {
                "apiInterfaces": "/api/interfaces",
                "largeInterfaces": "/api/interfaces/large"
            }
        })))
        .mount(&server)
        .await;

    let info = gateway(&server).await.server_info().await.unwrap();

    assert_eq!(info.version, "1.0.0");
    assert_eq!(info.endpoints.len(), 2);
}

#[tokio::test]
async fn unreadable_body_should_be_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interfaces"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let error = gateway(&server).await.list_interfaces().await.unwrap_err();

    assert_eq!(error.kind(), GatewayErrorKind::Application);
    assert_eq!(error.status(), Some(200));
    assert!(error.message().contains("Http failure during parsing"));
}

#[tokio::test]
async fn base_path_prefix_should_be_prepended() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hub/api/interfaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpCatalogGateway::new(&format!("{}/hub/", server.uri())).unwrap();

    assert!(gateway.list_interfaces().await.unwrap().is_empty());
}
