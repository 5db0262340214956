use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::config::{GivTcpConfig, GivTcpHost};
use crate::error::SourceError;
use crate::model::SourceFetcher;

const READ_DATA_PATH: &str = "/readData";

pub struct Client {
    http_client: HttpClient,
    base_url: String,
}

impl Client {
    pub fn new(config: &GivTcpConfig) -> Self {
        let http_client = HttpClient::new();
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn read_data_url(&self, host: &GivTcpHost) -> String {
        format!("{}:{}{}", self.base_url, host.port, READ_DATA_PATH)
    }
}

#[async_trait]
impl SourceFetcher for Client {
    async fn fetch(&self, host: &GivTcpHost) -> Result<Value, SourceError> {
        let url = self.read_data_url(host);
        let response = self
            .http_client
            .get(&url)
            .header("user-agent", "reqwest")
            .send()
            .await
            .map_err(|e| SourceError::http(&host.name, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::http(&host.name, e))?;

        if !status.is_success() {
            return Err(SourceError::server_error(&host.name, status, body));
        }

        serde_json::from_str(&body).map_err(|e| SourceError::invalid_json(&host.name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito;
    use serde_json::json;

    fn test_config() -> GivTcpConfig {
        GivTcpConfig {
            base_url: "http://127.0.0.1".to_string(),
            hosts: vec![],
        }
    }

    fn host_for(server: &mockito::Server) -> GivTcpHost {
        GivTcpHost {
            name: "Inverter 1".to_string(),
            port: server.socket_address().port(),
            sort_order: 0,
        }
    }

    #[test]
    fn test_read_data_url() {
        let client = Client::new(&GivTcpConfig {
            base_url: "http://givtcp.local/".to_string(),
            hosts: vec![],
        });
        let host = GivTcpHost {
            name: "Inverter 1".to_string(),
            port: 6345,
            sort_order: 0,
        };

        assert_eq!(client.read_data_url(&host), "http://givtcp.local:6345/readData");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/readData")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Power":{"Power":{"PV_Power":1250}}}"#)
            .create_async()
            .await;

        let client = Client::new(&test_config());
        let result = client.fetch(&host_for(&server)).await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), json!({"Power": {"Power": {"PV_Power": 1250}}}));
    }

    #[tokio::test]
    async fn test_fetch_500_error() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/readData")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let client = Client::new(&test_config());
        let error = client.fetch(&host_for(&server)).await.unwrap_err();

        assert!(matches!(error, SourceError::ServerError { status: 500, .. }));
        assert!(error.to_string().contains("Internal Server Error"));
    }

    #[tokio::test]
    async fn test_fetch_invalid_json() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/readData")
            .with_status(200)
            .with_body("<html>GivTCP is starting</html>")
            .create_async()
            .await;

        let client = Client::new(&test_config());
        let error = client.fetch(&host_for(&server)).await.unwrap_err();

        assert!(matches!(error, SourceError::InvalidJson { .. }));
        assert!(error.to_string().contains("Inverter 1"));
    }

    #[tokio::test]
    async fn test_fetch_connection_error() {
        let client = Client::new(&GivTcpConfig {
            base_url: "http://non-existent-server.local".to_string(),
            hosts: vec![],
        });
        let host = GivTcpHost {
            name: "Inverter 1".to_string(),
            port: 12345,
            sort_order: 0,
        };

        let error = client.fetch(&host).await.unwrap_err();
        assert!(matches!(error, SourceError::Http { .. }));
    }
}
