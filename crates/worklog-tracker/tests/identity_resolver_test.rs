//! Tests for the HTTP identity resolver against a local stub API.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use worklog_core::error::WorklogError;
use worklog_core::repository::IdentityResolver;
use worklog_tracker::{HttpIdentityResolver, TrackerConfig};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PassportQuery {
    passport_serie: u16,
    passport_number: u32,
}

/// Knows one passport, fails loudly on serie 9999.
async fn info(Query(q): Query<PassportQuery>) -> Result<Json<serde_json::Value>, StatusCode> {
    match (q.passport_serie, q.passport_number) {
        (1234, 567890) => Ok(Json(serde_json::json!({
            "name": "Ivan",
            "surname": "Ivanov",
            "patronymic": "Ivanovich",
            "address": "Moscow, Lenina 1",
        }))),
        (9999, _) => Err(StatusCode::SERVICE_UNAVAILABLE),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

/// Serve the stub API on an ephemeral port and return a resolver for it.
async fn resolver() -> HttpIdentityResolver {
    let app = Router::new().route("/info", get(info));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    HttpIdentityResolver::new(&TrackerConfig {
        passport_api_host: format!("http://{addr}/"),
        request_timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn resolves_known_passport() {
    let resolver = resolver().await;

    let info = resolver.resolve(1234, 567890).await.unwrap();
    assert_eq!(info.surname, "Ivanov");
    assert_eq!(info.name, "Ivan");
    assert_eq!(info.patronymic, "Ivanovich");
    assert_eq!(info.address, "Moscow, Lenina 1");
}

#[tokio::test]
async fn unknown_passport_is_identity_not_found() {
    let resolver = resolver().await;

    let err = resolver.resolve(1111, 222222).await.unwrap_err();
    assert!(matches!(
        err,
        WorklogError::IdentityNotFound {
            serie: 1111,
            number: 222222
        }
    ));
}

#[tokio::test]
async fn upstream_failure_is_infrastructure() {
    let resolver = resolver().await;

    let err = resolver.resolve(9999, 1).await.unwrap_err();
    assert!(matches!(err, WorklogError::IdentityLookup(_)));
    assert!(err.is_infrastructure());
}

#[tokio::test]
async fn unreachable_api_is_infrastructure() {
    // Bind and drop a listener to get a port nobody is serving.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let resolver = HttpIdentityResolver::new(&TrackerConfig {
        passport_api_host: format!("http://{addr}"),
        request_timeout_secs: 1,
    })
    .unwrap();

    let err = resolver.resolve(1234, 567890).await.unwrap_err();
    assert!(err.is_infrastructure());
}
