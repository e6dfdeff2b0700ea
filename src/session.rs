//! Client-side session handling for the auth API and the downstream
//! document-index/QA endpoints. The server keeps no session state, so the
//! client owns the token and the Anonymous/Authenticated transition: any
//! protected call answered with 401 drops the token and the caller has to
//! sign in again.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::dto::{PublicUser, TokenResponse};

const DEFAULT_TOP_K: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated { username: String, token: String },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error("session expired, please log in again")]
    Unauthorized,
    #[error("{detail}")]
    Api { status: u16, detail: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndexesResponse {
    indexes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct QaRequest<'a> {
    question: &'a str,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct QaResponse {
    answer: String,
}

pub struct SessionClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl SessionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session: Session::Anonymous,
        }
    }

    /// Rebuilds a client around a previously issued token, e.g. one a UI kept
    /// across restarts. The token is still subject to expiry server-side.
    pub fn resume(base_url: impl Into<String>, username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session: Session::Authenticated {
                username: username.into(),
                token: token.into(),
            },
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn logout(&mut self) {
        self.session = Session::Anonymous;
    }

    fn token(&self) -> Result<String, ClientError> {
        match &self.session {
            Session::Authenticated { token, .. } => Ok(token.clone()),
            Session::Anonymous => Err(ClientError::NotAuthenticated),
        }
    }

    async fn api_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| "request failed".to_string());
        ClientError::Api { status, detail }
    }

    /// Gate for every protected response: a 401 means the token is no longer
    /// accepted (expired, tampered, revoked account), so the session resets
    /// to Anonymous before the error reaches the caller.
    async fn check_authorized(
        &mut self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            self.session = Session::Anonymous;
            return Err(ClientError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response)
    }

    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<PublicUser, ClientError> {
        let response = self
            .http
            .post(format!("{}/register", self.base_url))
            .json(&serde_json::json!({
                "email": email,
                "username": username,
                "password": password,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response.json::<PublicUser>().await?)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let token = response.json::<TokenResponse>().await?;
        self.session = Session::Authenticated {
            username: username.to_string(),
            token: token.access_token,
        };
        Ok(())
    }

    pub async fn whoami(&mut self) -> Result<PublicUser, ClientError> {
        let token = self.token()?;
        let response = self
            .http
            .get(format!("{}/users/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        let response = self.check_authorized(response).await?;
        Ok(response.json::<PublicUser>().await?)
    }

    pub async fn list_indexes(&mut self) -> Result<Vec<String>, ClientError> {
        let token = self.token()?;
        let response = self
            .http
            .get(format!("{}/indexes", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        let response = self.check_authorized(response).await?;
        Ok(response.json::<IndexesResponse>().await?.indexes)
    }

    pub async fn ask(
        &mut self,
        index: &str,
        question: &str,
        top_k: Option<u32>,
    ) -> Result<String, ClientError> {
        let token = self.token()?;
        let response = self
            .http
            .post(format!("{}/qa/{}", self.base_url, index))
            .bearer_auth(token)
            .json(&QaRequest {
                question,
                top_k: top_k.unwrap_or(DEFAULT_TOP_K),
            })
            .send()
            .await?;
        let response = self.check_authorized(response).await?;
        Ok(response.json::<QaResponse>().await?.answer)
    }
}
