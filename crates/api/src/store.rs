use async_trait::async_trait;
use news_nest_model::{HistoryTurn, SessionStore, StoreError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::ApiClient;

/// Body of the session endpoint, in both directions.
#[derive(Debug, Serialize, Deserialize)]
struct SessionBody {
    turns: Vec<HistoryTurn>,
}

#[async_trait]
impl SessionStore for ApiClient {
    async fn load_session(
        &self,
        user: &str,
        session: &str,
    ) -> Result<Vec<HistoryTurn>, StoreError> {
        let url = self.endpoint(&format!("/sessions/{user}/{session}"));
        let resp = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|err| StoreError::new(format!("{err}")))?;

        // A session that was never saved is an empty one.
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(vec![]);
        }
        let resp = resp
            .error_for_status()
            .map_err(|err| StoreError::new(format!("{err}")))?;
        let body: SessionBody = resp
            .json()
            .await
            .map_err(|err| StoreError::new(format!("{err}")))?;
        debug!(user, session, turns = body.turns.len(), "loaded session");
        Ok(body.turns)
    }

    async fn save_session(
        &self,
        user: &str,
        session: &str,
        turns: &[HistoryTurn],
    ) -> Result<(), StoreError> {
        let url = self.endpoint(&format!("/sessions/{user}/{session}"));
        let body = SessionBody {
            turns: turns.to_vec(),
        };
        self.authorize(self.client.put(&url))
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| StoreError::new(format!("{err}")))?;
        debug!(user, session, turns = turns.len(), "saved session");
        Ok(())
    }
}
