//! In-process stand-in for Nominatim and OSRM
//!
//! Answers every request with one configurable status and body, and
//! records what it was asked.

use crate::config::Config;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::Router;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub uri: String,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
struct Shared {
    requests: Arc<Mutex<Vec<Recorded>>>,
    reply: Arc<Mutex<(StatusCode, String)>>,
}

pub(crate) struct FakeUpstream {
    pub base_url: String,
    shared: Shared,
}

impl FakeUpstream {
    pub async fn start(status: StatusCode, body: &str) -> Self {
        let shared = Shared {
            requests: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(Mutex::new((status, body.to_string()))),
        };

        let app: Router = Router::new().fallback(reply).with_state(shared.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            shared,
        }
    }

    pub async fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self::start(status, &body.to_string()).await
    }

    pub fn set_reply(&self, status: StatusCode, body: &str) {
        *self.shared.reply.lock().unwrap() = (status, body.to_string());
    }

    pub fn set_json(&self, status: StatusCode, body: serde_json::Value) {
        self.set_reply(status, &body.to_string());
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.shared.requests.lock().unwrap().len()
    }
}

async fn reply(State(shared): State<Shared>, uri: Uri, headers: HeaderMap) -> (StatusCode, String) {
    shared.requests.lock().unwrap().push(Recorded {
        uri: uri.to_string(),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
    shared.reply.lock().unwrap().clone()
}

/// Config pointing both services at fakes
pub(crate) fn config_for(nominatim: &FakeUpstream, osrm: &FakeUpstream) -> Config {
    let mut config = Config::default();
    config.services.nominatim_url = nominatim.base_url.clone();
    config.services.osrm_url = osrm.base_url.clone();
    config
}
