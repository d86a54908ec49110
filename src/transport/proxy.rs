use log::{debug, warn};
use serde_json::Value;

use crate::config::ServiceConfig;
use crate::core::{Card, CardToken, GameCode};
use crate::protocol::{CardBody, CheckWinBody, CodeQuery, ErrorBody, NewGameBody, TokenQuery};
use crate::transport::{BingoApi, NewGame, ServiceError};

/// Client for the local proxy surface served by `bingo serve`.
///
/// Follows the same contract as the browser front end: `/checkwin` never
/// fails hard, `/getcard` answers `0` when there is no card.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str, config: &ServiceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turn a non-success proxy reply into a `ServiceError`, keeping the proxy's
/// `error` message when there is one.
async fn reject(response: reqwest::Response) -> ServiceError {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => {
            warn!("[ProxyClient] proxy answered {}: {}", status, body.error);
        }
        Err(_) => warn!("[ProxyClient] proxy answered {}", status),
    }
    ServiceError::Status(status.as_u16())
}

#[async_trait::async_trait]
impl BingoApi for ProxyClient {
    async fn new_game(&self) -> Result<NewGame, ServiceError> {
        let response = self.client.get(self.endpoint("newgame")).send().await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        let body: NewGameBody = response.json().await?;
        let code = GameCode::new(&body.bcode)
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        Ok(NewGame {
            code,
            dashboard_url: body.url,
        })
    }

    async fn get_card(&self, code: &GameCode) -> Result<Option<Card>, ServiceError> {
        let query = CodeQuery {
            bcode: Some(code.to_string()),
        };
        let response = self
            .client
            .get(self.endpoint("getcard"))
            .query(&query)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        let reply: Value = response.json().await?;
        if reply.as_u64() == Some(0) {
            debug!("[ProxyClient] no card for {}", code);
            return Ok(None);
        }
        let body: CardBody = serde_json::from_value(reply)
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        Card::try_from(body)
            .map(Some)
            .map_err(|e| ServiceError::Malformed(e.to_string()))
    }

    async fn check_win(&self, token: &CardToken) -> Result<bool, ServiceError> {
        let query = TokenQuery {
            playcard_token: Some(token.to_string()),
        };
        let response = self
            .client
            .get(self.endpoint("checkwin"))
            .query(&query)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        let body: CheckWinBody = response.json().await?;
        Ok(body.is_win())
    }
}
