//! This module provides a client to connect to the task backend

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::auth::{AuthSession, LoginRequest, RegisterRequest, User};
use crate::error::{not_found_as_none, Error, Result};
use crate::resource::Resource;
use crate::statistics::StatisticsSnapshot;
use crate::task::{NewTask, Priority, Category, Task, TaskId, TaskUpdate};
use crate::traits::TaskSource;

/// The body of `POST /tasks/add`
#[derive(Serialize)]
struct NewTaskBody<'a> {
    #[serde(flatten)]
    task: &'a NewTask,
    done: bool,
}

/// The body of `PUT /tasks/edit/{id}`
#[derive(Serialize)]
struct EditBody<'a> {
    id: &'a TaskId,
    #[serde(flatten)]
    update: &'a TaskUpdate,
}

/// A task source that talks to the backend over HTTP
pub struct Client {
    resource: Resource,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S, token: Option<String>) -> Result<Self> {
        let url = Url::parse(url.as_ref())?;
        let http = reqwest::Client::builder()
            .user_agent(crate::config::user_agent())
            .build()?;

        Ok(Self {
            resource: Resource::new(url, token),
            http,
        })
    }

    /// Create a client for the URL set in [`API_BASE`](crate::config::API_BASE)
    pub fn default_from_config(token: Option<String>) -> Result<Self> {
        Self::new(crate::config::api_base(), token)
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn is_authenticated(&self) -> bool {
        self.resource.token().is_some()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.resource.set_token(token);
    }

    /// Forget the token. Further task requests will fail with [`Error::NotAuthenticated`]
    pub fn sign_out(&mut self) {
        log::info!("Signing out");
        self.resource.set_token(None);
    }

    fn endpoint(&self, path: &str, segment: Option<&str>) -> Result<Url> {
        let mut url = self.resource.combine(path)?;
        if let Some(segment) = segment {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(segment);
            }
        }
        Ok(url)
    }

    /// Prepare a request that carries the bearer token
    fn authenticated_request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = match self.resource.token() {
            None => {
                log::warn!("Not sending {} {}: please sign in to continue", method, url);
                return Err(Error::NotAuthenticated);
            },
            Some(token) => token,
        };

        Ok(self.http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, "application/json"))
    }

    /// Send a request, and turns non-2xx replies into errors
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        log::debug!("Backend replied {}: {}", status, body);
        Err(Error::from_status(status, body))
    }

    async fn send_and_parse<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let text = self.send(request).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn get_list(&self, path: &str, segment: Option<&str>) -> Result<Vec<Task>> {
        let url = self.endpoint(path, segment)?;
        let request = self.authenticated_request(Method::GET, url)?;
        let tasks: Vec<Task> = self.send_and_parse(request).await?;
        log::debug!("Fetched {} tasks from {}", tasks.len(), path);
        Ok(tasks)
    }


    /// Sign in, and keep the returned token for the next requests
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthSession> {
        let url = self.endpoint("auth/login", None)?;
        let body = LoginRequest { email: email.to_string(), password: password.to_string() };
        let request = self.http.post(url).json(&body);

        let session: AuthSession = self.send_and_parse(request).await?;
        log::info!("Signed in as {}", session.user.display_name());
        self.resource.set_token(Some(session.token.clone()));
        Ok(session)
    }

    /// Create an account, and keep the returned token for the next requests
    pub async fn register(&mut self, registration: &RegisterRequest) -> Result<AuthSession> {
        registration.validate()?;
        let url = self.endpoint("auth/register", None)?;
        let request = self.http.post(url).json(registration);

        let session: AuthSession = self.send_and_parse(request).await?;
        log::info!("Account created for {}", session.user.display_name());
        self.resource.set_token(Some(session.token.clone()));
        Ok(session)
    }

    /// Ask the backend whether the current token is still valid
    pub async fn validate_token(&self) -> Result<bool> {
        let url = self.endpoint("auth/validate", None)?;
        let request = self.authenticated_request(Method::POST, url)?;
        match self.send_and_parse::<bool>(request).await {
            Ok(valid) => Ok(valid),
            Err(err) if err.is_auth_failure() => Ok(false),
            Err(Error::Status{ status, .. }) if status == reqwest::StatusCode::BAD_REQUEST => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// The user the current token belongs to
    pub async fn current_user(&self) -> Result<User> {
        let url = self.endpoint("auth/me", None)?;
        let request = self.authenticated_request(Method::GET, url)?;
        self.send_and_parse(request).await
    }


    /// Completed (`true`) or pending (`false`) tasks, as computed by the server
    pub async fn get_tasks_by_status(&self, done: bool) -> Result<Vec<Task>> {
        self.get_list("tasks/status", Some(if done { "true" } else { "false" })).await
    }

    pub async fn get_tasks_by_priority(&self, priority: &Priority) -> Result<Vec<Task>> {
        self.get_list("tasks/priority", Some(priority.as_str())).await
    }

    pub async fn get_tasks_by_category(&self, category: &Category) -> Result<Vec<Task>> {
        self.get_list("tasks/category", Some(category.as_str())).await
    }

    pub async fn get_overdue_tasks(&self) -> Result<Vec<Task>> {
        self.get_list("tasks/overdue", None).await
    }

    pub async fn get_today_tasks(&self) -> Result<Vec<Task>> {
        self.get_list("tasks/today", None).await
    }

    pub async fn get_tasks_starting_soon(&self) -> Result<Vec<Task>> {
        self.get_list("tasks/starting-soon", None).await
    }

    /// Statistics, as computed by the server (in the server time zone)
    pub async fn get_statistics(&self) -> Result<StatisticsSnapshot> {
        let url = self.endpoint("tasks/statistics", None)?;
        let request = self.authenticated_request(Method::GET, url)?;
        self.send_and_parse(request).await
    }
}

#[async_trait]
impl TaskSource for Client {
    async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.get_list("tasks/all", None).await
    }

    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>> {
        let url = self.endpoint("tasks/get", Some(id.as_str()))?;
        let request = self.authenticated_request(Method::GET, url)?;
        not_found_as_none(self.send_and_parse(request).await)
    }

    async fn add_task(&mut self, task: NewTask) -> Result<Task> {
        let url = self.endpoint("tasks/add", None)?;
        let body = NewTaskBody { task: &task, done: false };
        let request = self.authenticated_request(Method::POST, url)?.json(&body);
        let created: Task = self.send_and_parse(request).await?;
        log::info!("Task {} added", created.id());
        Ok(created)
    }

    async fn update_task(&mut self, id: &TaskId, update: TaskUpdate) -> Result<Option<Task>> {
        let url = self.endpoint("tasks/edit", Some(id.as_str()))?;
        let body = EditBody { id, update: &update };
        let request = self.authenticated_request(Method::PUT, url)?.json(&body);
        not_found_as_none(self.send_and_parse(request).await)
    }

    async fn delete_task(&mut self, id: &TaskId) -> Result<bool> {
        let url = self.endpoint("tasks/delete", Some(id.as_str()))?;
        let request = self.authenticated_request(Method::DELETE, url)?;
        match self.send(request).await {
            Ok(_) => {
                log::info!("Task {} deleted", id);
                Ok(true)
            },
            Err(Error::NotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn toggle_task(&mut self, id: &TaskId) -> Result<Option<Task>> {
        let url = self.endpoint("tasks/toggle", Some(id.as_str()))?;
        let request = self.authenticated_request(Method::PUT, url)?;
        not_found_as_none(self.send_and_parse(request).await)
    }
}
