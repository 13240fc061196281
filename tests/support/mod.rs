//! Scripted backend shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shoplist::access::{
    HttpMethod, HttpRequest, HttpResponse, RecordingNavigator, Transport, TransportError,
};
use shoplist::storage::{CookieRecord, CredentialStore, MemoryCredentialStore};
use shoplist::{Config, Shoplist};

pub const API: &str = "https://api.test";
pub const AUTH: &str = "https://auth.test";
pub const HERE: &str = "https://app.test/lists/l1";

#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    After(Duration, HttpResponse),
    Fail(TransportError),
}

/// In-memory [`Transport`]. Replies are queued per method and path; the
/// last reply for a route repeats. Unscripted routes answer 404.
///
/// Credentialed requests carry the cookies held in an in-memory store and
/// feed `Set-Cookie` replies back into it, the way the real transport does.
#[derive(Debug, Default)]
pub struct FakeBackend {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
    cookies: Mutex<MemoryCredentialStore>,
    credential_clears: AtomicUsize,
}

fn path_of(url: &str) -> String {
    reqwest::Url::parse(url).map_or_else(|_| url.to_string(), |u| u.path().to_string())
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: HttpMethod, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn json(&self, method: HttpMethod, path: &str, status: u16, body: Value) -> &Self {
        self.reply(method, path, Reply::Respond(HttpResponse::json(status, &body)))
    }

    pub fn raw(&self, method: HttpMethod, path: &str, status: u16, body: &str) -> &Self {
        self.reply(method, path, Reply::Respond(HttpResponse::new(status, body)))
    }

    pub fn with_cookie(&self, name: &str, value: &str) -> &Self {
        self.cookies
            .lock()
            .unwrap()
            .put(CookieRecord::new(name, value))
            .unwrap();
        self
    }

    pub fn cookie_header(&self) -> Option<String> {
        self.cookies.lock().unwrap().cookie_header().unwrap()
    }

    pub fn signed_in(&self) -> &Self {
        self.json(
            HttpMethod::Get,
            "/auth/me",
            200,
            json!({ "authenticated": true, "profile": profile_json() }),
        )
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && path_of(&r.url) == path)
            .count()
    }

    pub fn refreshes(&self) -> usize {
        self.count(HttpMethod::Post, "/auth/refresh")
    }

    pub fn credential_clears(&self) -> usize {
        self.credential_clears.load(Ordering::SeqCst)
    }

    fn next_reply(&self, method: HttpMethod, path: &str) -> Option<Reply> {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut recorded = request.clone();
        if request.with_credentials {
            if let Some(cookie) = self.cookie_header() {
                recorded.headers.push(("Cookie".to_string(), cookie));
            }
        }
        self.requests.lock().unwrap().push(recorded);
        let path = path_of(&request.url);

        let response = match self.next_reply(request.method, &path) {
            Some(Reply::Respond(response)) => response,
            Some(Reply::After(delay, response)) => {
                tokio::time::sleep(delay).await;
                response
            }
            Some(Reply::Fail(error)) => return Err(error),
            None => HttpResponse::json(404, &json!({ "error": "not found" })),
        };

        if request.with_credentials {
            self.cookies
                .lock()
                .unwrap()
                .absorb_set_cookies(&response.set_cookies)
                .unwrap();
        }
        Ok(response)
    }

    fn clear_credentials(&self) -> shoplist::Result<()> {
        self.credential_clears.fetch_add(1, Ordering::SeqCst);
        self.cookies.lock().unwrap().clear()
    }
}

pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: Shoplist,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_backend(FakeBackend::new())
    }

    pub fn with_backend(backend: Arc<FakeBackend>) -> Self {
        let config = Config {
            api_base_url: API.to_string(),
            auth_base_url: AUTH.to_string(),
            return_to: HERE.to_string(),
            ..Config::default()
        };
        let navigator = Arc::new(RecordingNavigator::new(HERE));
        let transport: Arc<dyn Transport> = backend.clone();
        let client = Shoplist::with_parts(config, transport, navigator.clone());
        Self {
            backend,
            navigator,
            client,
        }
    }

    /// The login address a redirect from [`HERE`] should target.
    pub fn login_url() -> String {
        format!("{AUTH}/auth/login?returnTo=https%3A%2F%2Fapp.test%2Flists%2Fl1")
    }
}

pub fn profile_json() -> Value {
    json!({
        "given_name": "Ada",
        "family_name": "Lovelace",
        "email": "ada@example.com"
    })
}

pub fn list_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "createdAt": "2024-05-01T09:00:00Z",
        "updatedAt": "2024-05-01T09:00:00Z"
    })
}

pub fn item_json(id: &str, name: &str, purchased: bool) -> Value {
    json!({
        "_id": id,
        "listId": "l1",
        "name": name,
        "quantity": 1,
        "weight": null,
        "purchased": purchased,
        "createdAt": "2024-05-01T09:00:00Z",
        "updatedAt": "2024-05-01T09:00:00Z"
    })
}

pub fn article_json(id: &str, name: &str, usage_count: u64) -> Value {
    json!({ "_id": id, "name": name, "usageCount": usage_count })
}

pub fn search_json(query: &str, articles: &[Value]) -> Value {
    json!({
        "articles": articles,
        "query": query,
        "total": articles.len(),
        "type": "search"
    })
}
