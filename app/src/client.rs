//! Typed client for the tracker API, the layer the dashboard builds on.
//!
//! Holds the bearer token captured at register/login and re-sends it on
//! every protected call. Dropping an in-flight future cancels the request;
//! the server has no cooperative cancellation beyond that.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("not authenticated - register or log in first")]
    MissingToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Done,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    pub activity_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_by: String,
    pub status: Status,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityUpdate {
    pub update_id: String,
    pub activity_id: String,
    pub updated_by: String,
    pub status: Status,
    pub remark: Option<String>,
    pub progress: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityDetail {
    #[serde(flatten)]
    pub activity: Activity,
    pub creator: Option<User>,
    pub updates: Vec<ActivityUpdate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityUpdateDetail {
    #[serde(flatten)]
    pub update: ActivityUpdate,
    pub activity: Option<Activity>,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewActivity {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewActivityUpdate {
    pub activity_id: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityUpdatePatch {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatedUser {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message: String,
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(builder.bearer_auth(token))
    }

    async fn handle<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Err(ClientError::Api { status, message })
    }

    pub async fn register(&mut self, payload: &Registration) -> Result<AuthPayload, ClientError> {
        let response = self
            .http
            .post(self.url("/register"))
            .json(payload)
            .send()
            .await?;
        let auth: AuthPayload = Self::handle(response).await?;

        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthPayload, ClientError> {
        let response = self
            .http
            .post(self.url("/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let auth: AuthPayload = Self::handle(response).await?;

        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn logout(&mut self) -> Result<Message, ClientError> {
        let request = self.authorized(self.http.post(self.url("/logout")))?;
        let message = Self::handle(request.send().await?).await?;

        self.token = None;
        Ok(message)
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        let request = self.authorized(self.http.get(self.url("/user")))?;
        Self::handle(request.send().await?).await
    }

    pub async fn create_activities(
        &self,
        items: &[NewActivity],
    ) -> Result<Vec<Activity>, ClientError> {
        let request = self
            .authorized(self.http.post(self.url("/activities")))?
            .json(items);
        Self::handle(request.send().await?).await
    }

    pub async fn activities(&self) -> Result<Vec<ActivityDetail>, ClientError> {
        let request = self.authorized(self.http.get(self.url("/activities")))?;
        Self::handle(request.send().await?).await
    }

    pub async fn activity(&self, activity_id: &str) -> Result<ActivityDetail, ClientError> {
        let request =
            self.authorized(self.http.get(self.url(&format!("/activities/{}", activity_id))))?;
        Self::handle(request.send().await?).await
    }

    pub async fn edit_activity(
        &self,
        activity_id: &str,
        patch: &ActivityPatch,
    ) -> Result<Activity, ClientError> {
        let request = self
            .authorized(self.http.put(self.url(&format!("/activities/{}", activity_id))))?
            .json(patch);
        Self::handle(request.send().await?).await
    }

    pub async fn daily_activities(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ActivityDetail>, ClientError> {
        let request = self
            .authorized(self.http.get(self.url("/activities/daily")))?
            .query(&[("date", date.format("%Y-%m-%d").to_string())]);
        Self::handle(request.send().await?).await
    }

    pub async fn weekly_activities(
        &self,
    ) -> Result<BTreeMap<String, Vec<ActivityDetail>>, ClientError> {
        let request = self.authorized(self.http.get(self.url("/activities/weekly")))?;
        Self::handle(request.send().await?).await
    }

    pub async fn hourly_activities(
        &self,
        date: NaiveDate,
    ) -> Result<BTreeMap<String, Vec<ActivityUpdateDetail>>, ClientError> {
        let request = self
            .authorized(self.http.get(self.url("/activities/hourly")))?
            .query(&[("date", date.format("%Y-%m-%d").to_string())]);
        Self::handle(request.send().await?).await
    }

    pub async fn create_activity_updates(
        &self,
        items: &[NewActivityUpdate],
    ) -> Result<Vec<ActivityUpdate>, ClientError> {
        let request = self
            .authorized(self.http.post(self.url("/activity-updates")))?
            .json(items);
        Self::handle(request.send().await?).await
    }

    pub async fn activity_updates(&self) -> Result<Vec<ActivityUpdateDetail>, ClientError> {
        let request = self.authorized(self.http.get(self.url("/activity-updates")))?;
        Self::handle(request.send().await?).await
    }

    pub async fn activity_update(
        &self,
        update_id: &str,
    ) -> Result<ActivityUpdateDetail, ClientError> {
        let request = self.authorized(
            self.http
                .get(self.url(&format!("/activity-updates/{}", update_id))),
        )?;
        Self::handle(request.send().await?).await
    }

    pub async fn edit_activity_update(
        &self,
        update_id: &str,
        patch: &ActivityUpdatePatch,
    ) -> Result<ActivityUpdate, ClientError> {
        let request = self
            .authorized(
                self.http
                    .put(self.url(&format!("/activity-updates/{}", update_id))),
            )?
            .json(patch);
        Self::handle(request.send().await?).await
    }

    pub async fn report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ActivityUpdateDetail>, ClientError> {
        let request = self
            .authorized(self.http.get(self.url("/activity-updates/report")))?
            .query(&[
                ("from", from.format("%Y-%m-%d").to_string()),
                ("to", to.format("%Y-%m-%d").to_string()),
            ]);
        Self::handle(request.send().await?).await
    }

    pub async fn users(&self) -> Result<Vec<User>, ClientError> {
        let request = self.authorized(self.http.get(self.url("/users")))?;
        Self::handle(request.send().await?).await
    }

    pub async fn user(&self, user_id: &str) -> Result<User, ClientError> {
        let request = self.authorized(self.http.get(self.url(&format!("/users/{}", user_id))))?;
        Self::handle(request.send().await?).await
    }

    pub async fn edit_user(
        &self,
        user_id: &str,
        patch: &UserPatch,
    ) -> Result<UpdatedUser, ClientError> {
        let request = self
            .authorized(self.http.put(self.url(&format!("/users/{}", user_id))))?
            .json(patch);
        Self::handle(request.send().await?).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<Message, ClientError> {
        let request =
            self.authorized(self.http.delete(self.url(&format!("/users/{}", user_id))))?;
        Self::handle(request.send().await?).await
    }
}
