use counter_service::config::CounterConfig;
use counter_service::services::CounterStore;
use counter_service::startup::Application;
use service_core::config::{Config as CoreConfig, MongoConfig, StoreBackend};
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn CounterStore>,
}

pub fn memory_config() -> CounterConfig {
    CounterConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        mongodb: MongoConfig {
            uri: String::new(),
            database: "counter_test".to_string(),
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

    pub fn counter_url(&self) -> String {
        format!("{}/api/counter", self.address)
    }
}
