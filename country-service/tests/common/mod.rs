#![allow(dead_code)]

use country_service::config::{CountryConfig, GeminiSettings, GoogleConfig};
use country_service::services::providers::mock::MockTextProvider;
use country_service::services::providers::TextProvider;
use country_service::startup::{build_router, AppState, Application};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

/// Configuration for an app bound to a random port.
pub fn test_config() -> CountryConfig {
    CountryConfig {
        common: CoreConfig { port: 0 },
        google: GoogleConfig {
            api_key: Secret::new("test-api-key".to_string()),
        },
        gemini: GeminiSettings {
            model: "gemini-2.5-flash".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            timeout_secs: 5,
        },
    }
}

/// Router wired to `provider`, for in-process `oneshot` requests.
pub fn router_with(provider: Arc<MockTextProvider>) -> axum::Router {
    let text_provider: Arc<dyn TextProvider> = provider;
    build_router(AppState { text_provider })
}

pub struct TestApp {
    pub address: String,
    pub provider: Arc<MockTextProvider>,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application on a random port backed by `provider`.
    pub async fn spawn(provider: MockTextProvider) -> Self {
        let provider = Arc::new(provider);
        let text_provider: Arc<dyn TextProvider> = provider.clone();

        let app = Application::build_with_provider(test_config(), text_provider)
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.http_port());

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
            provider,
            client,
        }
    }

    pub async fn post_country(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/get-country", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }
}
