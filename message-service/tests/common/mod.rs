use message_service::config::MessageConfig;
use message_service::services::MessageStore;
use message_service::startup::Application;
use service_core::config::{Config as CoreConfig, MongoConfig, StoreBackend};
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn MessageStore>,
}

pub fn memory_config() -> MessageConfig {
    MessageConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        mongodb: MongoConfig {
            uri: String::new(),
            database: "danmaku_test".to_string(),
        },
        store: StoreBackend::Memory,
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let app = Application::build(memory_config())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
        }
    }

    pub fn messages_url(&self) -> String {
        format!("{}/api/messages", self.address)
    }

    /// Posts `text` and waits past the current millisecond so the next
    /// record gets a strictly later timestamp.
    pub async fn post_message(&self, client: &reqwest::Client, text: &str) -> reqwest::Response {
        let response = client
            .post(self.messages_url())
            .json(&serde_json::json!({ "message": text }))
            .send()
            .await
            .expect("Failed to execute request");
        tokio::time::sleep(tokio::time::Duration::from_millis(3)).await;
        response
    }

    pub async fn get_messages(&self, client: &reqwest::Client, query: &str) -> Vec<(String, i64)> {
        let response = client
            .get(format!("{}{}", self.messages_url(), query))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        body["messages"]
            .as_array()
            .expect("messages is not an array")
            .iter()
            .map(|m| {
                (
                    m["message"].as_str().unwrap().to_string(),
                    m["timestamp"].as_i64().unwrap(),
                )
            })
            .collect()
    }
}
