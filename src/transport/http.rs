use log::{debug, info, warn};
use serde_json::Value;

use crate::config::ServiceConfig;
use crate::core::{Card, CardToken, GameCode};
use crate::protocol::{
    dashboard_url, decode_remote_card, extract_game_code, parse_win_signal, CodeQuery,
    TokenQuery, CHECK_WIN_PATH, GET_CARD_PATH, NEW_GAME_PATH,
};
use crate::transport::{BingoApi, NewGame, ServiceError};

/// Talks to the hosted Bingo service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, &config.remote_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get<Q: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<reqwest::Response, ServiceError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            warn!("[HttpTransport] {} answered with status {}", path, status);
            return Err(ServiceError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl BingoApi for HttpTransport {
    async fn new_game(&self) -> Result<NewGame, ServiceError> {
        let no_query: &[(&str, &str)] = &[];
        let html = self.get(NEW_GAME_PATH, no_query).await?.text().await?;
        let code = extract_game_code(&html).ok_or_else(|| {
            warn!("[HttpTransport] no game code in new-game reply");
            ServiceError::Malformed("could not extract game code".to_string())
        })?;
        info!("[HttpTransport] created game {}", code);
        Ok(NewGame {
            dashboard_url: dashboard_url(&self.base_url, &code),
            code,
        })
    }

    async fn get_card(&self, code: &GameCode) -> Result<Option<Card>, ServiceError> {
        let query = CodeQuery {
            bcode: Some(code.to_string()),
        };
        let reply: Value = self.get(GET_CARD_PATH, &query).await?.json().await?;
        let card = decode_remote_card(&reply)
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        match &card {
            Some(card) => debug!("[HttpTransport] dealt card {} for {}", card.token(), code),
            None => debug!("[HttpTransport] no card for {}: {}", code, reply),
        }
        Ok(card)
    }

    async fn check_win(&self, token: &CardToken) -> Result<bool, ServiceError> {
        let query = TokenQuery {
            playcard_token: Some(token.to_string()),
        };
        let body = self.get(CHECK_WIN_PATH, &query).await?.text().await?;
        debug!("[HttpTransport] win check for {}: {:?}", token, body);
        Ok(parse_win_signal(&body))
    }
}
