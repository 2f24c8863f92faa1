#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use portfolio_site::app::{app, AppState};
use portfolio_site::auth::hash_password;
use portfolio_site::config::AppConfig;
use portfolio_site::models::Project;
use portfolio_site::store::{MemoryStore, ProjectStore};
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::{Response, StatusCode};

pub const PEPPER: &str = "test-pepper";
pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_as(&self, path: &str, cookie: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .header(COOKIE, cookie)
            .send()
            .await?)
    }

    pub async fn post_form(
        &self,
        path: &str,
        cookie: Option<&str>,
        form: &[(&str, &str)],
    ) -> Result<Response> {
        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        Ok(request.send().await?)
    }

    /// Log in with the configured password and return the `session=...`
    /// pair to send back as a Cookie header
    pub async fn login(&self) -> Result<String> {
        let res = self
            .post_form("/admin/login", None, &[("pass", PASSWORD)])
            .await?;
        anyhow::ensure!(res.status() == StatusCode::FOUND, "login failed: {}", res.status());
        session_cookie(&res).context("login did not set a session cookie")
    }
}

fn test_config() -> Result<AppConfig> {
    let vars: HashMap<&str, String> = HashMap::from([
        ("pepper", PEPPER.to_string()),
        ("password_hash", hash_password(PEPPER, PASSWORD)),
        ("app_secret", "integration-test-secret".to_string()),
    ]);
    Ok(AppConfig::from_lookup(|key| vars.get(key).cloned())?)
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_with_projects(Vec::new()).await
}

pub async fn spawn_with_projects(projects: Vec<Project>) -> Result<TestServer> {
    let store = Arc::new(MemoryStore::with_projects(projects)?);
    let state = AppState::new(&test_config()?, store.clone() as Arc<dyn ProjectStore>)?;

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    let router = app(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        store,
        client,
    })
}

pub fn project(id: &str, featured: bool) -> Project {
    Project {
        id: id.to_string(),
        name: format!("Project {}", id),
        summary: format!("Summary of {}", id),
        description: format!("Description of {}", id),
        link: format!("https://example.com/{}", id),
        featured,
    }
}

/// `session=<token>` from a response's Set-Cookie header, if any
pub fn session_cookie(res: &Response) -> Option<String> {
    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with("session="))
        .map(str::to_string)
}

pub fn location(res: &Response) -> Option<String> {
    res.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
