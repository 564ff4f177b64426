//! HTTP Server - 聊天助手 REST API

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Request,
    routing::{get, post},
    Router,
};
use giftchoice_observability::create_request_span;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, catalog, classify, sessions};
use crate::state::AppState;

/// 创建路由
pub fn create_router(state: AppState, cors: bool) -> Router {
    let state = Arc::new(state);

    let router = Router::new()
        // 健康检查
        .route("/health", get(handlers::health_handler))
        // 无状态分类
        .route("/api/classify", post(classify::classify_handler))
        // 会话管理
        .route(
            "/api/sessions",
            post(sessions::create_session_handler).get(sessions::list_sessions_handler),
        )
        .route(
            "/api/sessions/:session_id",
            get(sessions::get_session_handler).delete(sessions::delete_session_handler),
        )
        .route(
            "/api/sessions/:session_id/messages",
            post(sessions::send_message_handler),
        )
        .route(
            "/api/sessions/:session_id/messages/:message_id/action",
            post(sessions::activate_action_handler),
        )
        .route(
            "/api/sessions/:session_id/suggestions",
            post(sessions::activate_suggestion_handler),
        )
        // 商品目录
        .route("/api/catalog", get(catalog::get_catalog_handler))
        .route("/api/catalog/refresh", post(catalog::refresh_catalog_handler))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            create_request_span(request.method().as_str(), request.uri().path())
        }))
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// 运行 HTTP 服务器
pub async fn run_server(state: AppState, host: &str, port: u16, cors: bool) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let app = create_router(state, cors);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("GiftChoice server starting on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("GiftChoice server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, StatusCode};
    use async_trait::async_trait;
    use giftchoice_catalog::{CatalogError, CatalogStore, ProductSource, StaticProductSource};
    use giftchoice_core::{Product, ProductSize};
    use giftchoice_responder::Responder;
    use giftchoice_session::{SessionManager, SessionManagerConfig};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct UnreachableSource;

    #[async_trait]
    impl ProductSource for UnreachableSource {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn fetch_products(&self) -> giftchoice_catalog::Result<Vec<Product>> {
            Err(CatalogError::Network("connection refused".to_string()))
        }
    }

    fn products() -> Vec<Product> {
        vec![
            Product::new("1", "Men's Watch", "Classic watch for men").with_sizes(vec![
                ProductSize {
                    size: Some("Small".to_string()),
                    price: json!(1299),
                },
                ProductSize {
                    size: Some("Large".to_string()),
                    price: json!("899.50"),
                },
            ]),
            Product::new("2", "Men's Wallet", "Leather wallet").with_keywords(["men", "leather"]),
            Product::new("3", "Teddy Bear", "Soft toy"),
        ]
    }

    fn build_app(
        config: SessionManagerConfig,
        catalog: CatalogStore,
        source: Arc<dyn ProductSource>,
    ) -> Router {
        let sessions = Arc::new(SessionManager::new(config, Arc::new(Responder::default())));
        create_router(AppState::new(sessions, catalog, source), true)
    }

    fn app_with(catalog: CatalogStore, source: Vec<Product>) -> Router {
        build_app(
            SessionManagerConfig::default(),
            catalog,
            Arc::new(StaticProductSource::new(source)),
        )
    }

    fn app() -> Router {
        app_with(CatalogStore::with_products(products()), products())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                builder = builder.header("content-type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_classify() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/classify",
            Some(json!({"text": "Gift for my boyfriend"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["action"], "products");
        assert_eq!(body["products"].as_array().unwrap().len(), 2);
        assert!(body["text"].as_str().unwrap().contains("for him"));
    }

    #[tokio::test]
    async fn test_chat_flow() {
        let app = app();

        let (status, session) = send(&app, Method::POST, "/api/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = session["id"].as_str().unwrap().to_string();
        assert_eq!(session["messages"][0]["text"], "Birthdays, Anniversaries, and more!");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/sessions/{}/messages", id),
            Some(json!({"text": "gift for my boyfriend"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["sender"], "user");
        assert_eq!(messages[1]["id"], 3);

        let (status, navigation) = send(
            &app,
            Method::POST,
            &format!("/api/sessions/{}/messages/3/action", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(navigation["type"], "reply");

        let (_, session) = send(&app, Method::GET, &format!("/api/sessions/{}", id), None).await;
        assert_eq!(session["messages"].as_array().unwrap().len(), 4);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_blank_message_is_ignored() {
        let app = app();
        let (_, session) = send(&app, Method::POST, "/api/sessions", None).await;
        let id = session["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/sessions/{}/messages", id),
            Some(json!({"text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["messages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let (status, body) = send(&app(), Method::GET, "/api/sessions/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_suggestions() {
        let app = app();
        let (_, session) = send(&app, Method::POST, "/api/sessions", None).await;
        let id = session["id"].as_str().unwrap();
        let uri = format!("/api/sessions/{}/suggestions", id);

        let (status, navigation) =
            send(&app, Method::POST, &uri, Some(json!({"label": "Contact Us"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(navigation["type"], "external");
        assert!(navigation["url"].as_str().unwrap().starts_with("https://wa.me/917976948872"));

        let (status, body) =
            send(&app, Method::POST, &uri, Some(json!({"label": "Dance"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "UNKNOWN_SUGGESTION");
    }

    #[tokio::test]
    async fn test_catalog_refresh() {
        let app = app_with(CatalogStore::new(), products());

        let (_, body) = send(&app, Method::GET, "/api/catalog", None).await;
        assert_eq!(body["count"], 0);

        let (status, body) = send(&app, Method::POST, "/api/catalog/refresh", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);

        let (_, body) = send(&app, Method::GET, "/api/catalog", None).await;
        assert_eq!(body["products"][2]["name"], "Teddy Bear");
    }

    #[tokio::test]
    async fn test_catalog_reports_price_range() {
        let (status, body) = send(&app(), Method::GET, "/api/catalog", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["products"][0]["id"], "1");
        assert_eq!(body["products"][0]["price_range"], json!({"min": 899.5, "max": 1299.0}));
        assert!(body["products"][1].get("price_range").is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_is_bad_gateway() {
        let app = build_app(
            SessionManagerConfig::default(),
            CatalogStore::with_products(products()),
            Arc::new(UnreachableSource),
        );

        let (status, body) = send(&app, Method::POST, "/api/catalog/refresh", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "CATALOG_ERROR");

        // previous snapshot is still served
        let (_, body) = send(&app, Method::GET, "/api/catalog", None).await;
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn test_session_limit_is_service_unavailable() {
        let app = build_app(
            SessionManagerConfig::default().with_max_sessions(1),
            CatalogStore::with_products(products()),
            Arc::new(StaticProductSource::new(products())),
        );

        let (status, _) = send(&app, Method::POST, "/api/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, Method::POST, "/api/sessions", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "SESSION_LIMIT");
    }
}
