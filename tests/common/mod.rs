#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use contentdesk::app::{build_router, AppState};
use contentdesk::config::DatabaseSettings;
use contentdesk::db::connection::MongoConnection;
use contentdesk::db::memory::InMemoryContentRepository;
use contentdesk::db::repository::{ContentRepository, MongoContentRepository};

/// Holds a running MongoDB container and the Axum router wired to it.
///
/// The container is kept alive for as long as this struct lives. When
/// dropped, it is stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub router: Router,
    pub repo: Arc<dyn ContentRepository>,
    pub database: mongodb::Database,
}

impl TestEnv {
    /// Spin up MongoDB and build a router backed by the real repository.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let database =
            mongo_client.database(&format!("contentdesk_test_{}", uuid::Uuid::new_v4().simple()));

        let connection = Arc::new(MongoConnection::from_database(database.clone()));
        let repo: Arc<dyn ContentRepository> = Arc::new(MongoContentRepository::new(connection));

        Self {
            _mongo: mongo_container,
            router: build_router(AppState::new(repo.clone())),
            repo,
            database,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        test_server(self.router.clone(), true)
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        test_server(self.router.clone(), false)
    }
}

fn test_server(router: Router, expect_success: bool) -> axum_test::TestServer {
    let builder = axum_test::TestServer::builder();
    let builder = if expect_success {
        builder.expect_success_by_default()
    } else {
        builder
    };
    builder.build(router)
}

/// A permissive `TestServer` over the in-memory store; needs no containers.
pub fn memory_server() -> axum_test::TestServer {
    let repo: Arc<dyn ContentRepository> = Arc::new(InMemoryContentRepository::new());
    test_server(build_router(AppState::new(repo)), false)
}

/// A permissive `TestServer` whose database can never be reached.
pub fn unreachable_database_server(uri: Option<&str>) -> axum_test::TestServer {
    let connection = Arc::new(MongoConnection::new(DatabaseSettings {
        uri: uri.map(String::from),
        ..Default::default()
    }));
    let repo: Arc<dyn ContentRepository> = Arc::new(MongoContentRepository::new(connection));
    test_server(build_router(AppState::new(repo)), false)
}

/// A create payload that passes validation.
pub fn valid_payload(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Short summary",
        "content": "Full body text",
        "categories": ["launch"],
        "contentType": "Blog",
        "format": "Article",
        "platform": "Website",
        "marketingPatterns": ["Storytelling"],
        "engagementMetrics": {
            "views": 0,
            "likes": 0,
            "shares": 0,
            "comments": 0,
            "conversionRate": 0
        }
    })
}
