// ABOUTME: Test support utilities.
// ABOUTME: Scripted in-memory orchestrator gateway and a recording observer.

// Each test binary only uses some of these helpers, so allow dead_code.
#![allow(dead_code)]

use async_trait::async_trait;
use convoy::app::ApplicationDescriptor;
use convoy::clock::ManualClock;
use convoy::deploy::{Deployment, Timeouts};
use convoy::gateway::{ApiResponse, OrchestratorGateway, TransportError};
use convoy::observer::{DeployObserver, Level, WaitTarget};
use convoy::query::ActiveDeployment;
use convoy::types::{AppId, TaskId};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Once};
use std::time::Duration;

pub const ENDPOINT: &str = "http://marathon.test:8080";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("convoy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub verb: Verb,
    pub url: String,
    pub body: Option<Value>,
}

enum Reply {
    Ok(ApiResponse),
    Refused,
}

/// Gateway answering from per-route queues.
///
/// The last queued reply of a route is repeated once the queue drains.
/// Unscripted routes answer 404.
#[derive(Default)]
pub struct ScriptedGateway {
    routes: Mutex<HashMap<(Verb, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, verb: Verb, path: &str, status: u16, body: Value) -> &Self {
        self.routes
            .lock()
            .entry((verb, url(path)))
            .or_default()
            .push_back(Reply::Ok(ApiResponse::new(status, body)));
        self
    }

    pub fn refuse(&self, verb: Verb, path: &str) -> &Self {
        self.routes
            .lock()
            .entry((verb, url(path)))
            .or_default()
            .push_back(Reply::Refused);
        self
    }

    /// Queue one active-deployments list per call.
    pub fn deployments(&self, lists: Vec<Value>) -> &Self {
        for list in lists {
            self.on(Verb::Get, "/v2/deployments", 200, list);
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, verb: Verb, path: &str) -> usize {
        let target = url(path);
        self.calls
            .lock()
            .iter()
            .filter(|c| c.verb == verb && c.url == target)
            .count()
    }

    fn answer(&self, verb: Verb, url: &str, body: Option<&Value>) -> Result<ApiResponse, TransportError> {
        self.calls.lock().push(Call {
            verb,
            url: url.to_string(),
            body: body.cloned(),
        });

        let mut routes = self.routes.lock();
        let Some(queue) = routes.get_mut(&(verb, url.to_string())) else {
            return Ok(ApiResponse::new(404, json!({"message": "not scripted"})));
        };
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(|r| match r {
                Reply::Ok(resp) => Reply::Ok(resp.clone()),
                Reply::Refused => Reply::Refused,
            })
        };

        match reply {
            Some(Reply::Ok(resp)) => Ok(resp),
            Some(Reply::Refused) | None => Err(TransportError::Connect {
                address: "marathon.test:8080".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
            }),
        }
    }
}

pub fn url(path: &str) -> String {
    format!("{ENDPOINT}{path}")
}

#[async_trait]
impl OrchestratorGateway for ScriptedGateway {
    async fn get(&self, url: &str) -> Result<ApiResponse, TransportError> {
        self.answer(Verb::Get, url, None)
    }

    async fn post(&self, url: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        self.answer(Verb::Post, url, Some(body))
    }

    async fn put(&self, url: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        self.answer(Verb::Put, url, Some(body))
    }

    async fn delete(&self, url: &str) -> Result<ApiResponse, TransportError> {
        self.answer(Verb::Delete, url, None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Progress(String),
    Detail(String),
    Finished(String),
    Unhealthy(Vec<String>),
    Partial(usize),
    Healthy(usize),
    NoHealthChecks,
    Message(Level, String),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().push(event);
    }
}

fn ids(tasks: &[TaskId]) -> Vec<String> {
    tasks.iter().map(|t| t.to_string()).collect()
}

impl DeployObserver for RecordingObserver {
    fn deployment_progress(&self, target: &WaitTarget, _elapsed: Duration) {
        self.push(Event::Progress(target.to_string()));
    }

    fn deployment_detail(&self, record: &ActiveDeployment) {
        self.push(Event::Detail(record.id.to_string()));
    }

    fn deployment_finished(&self, target: &WaitTarget, _elapsed: Duration) {
        self.push(Event::Finished(target.to_string()));
    }

    fn unhealthy_tasks(&self, _app: &AppId, unhealthy: &[TaskId], _instances: u32) {
        self.push(Event::Unhealthy(ids(unhealthy)));
    }

    fn partially_healthy(&self, _app: &AppId, healthy: &[TaskId], _instances: u32) {
        self.push(Event::Partial(healthy.len()));
    }

    fn healthy(&self, _app: &AppId, healthy: &[TaskId], _instances: u32) {
        self.push(Event::Healthy(healthy.len()));
    }

    fn no_health_checks(&self, _app: &AppId) {
        self.push(Event::NoHealthChecks);
    }

    fn message(&self, level: Level, text: &str) {
        self.push(Event::Message(level, text.to_string()));
    }
}

pub fn descriptor(id: &str, instances: u32) -> ApplicationDescriptor {
    ApplicationDescriptor::from_value(json!({
        "id": id,
        "instances": instances,
        "healthChecks": [{"protocol": "HTTP", "path": "/health"}]
    }))
    .unwrap()
}

pub fn timeouts() -> Timeouts {
    Timeouts {
        deployment: Duration::from_secs(30),
        deployment_recheck: Duration::from_secs(3),
        healthy_wait: Duration::from_secs(20),
        healthy_recheck: Duration::from_secs(2),
    }
}

/// Everything a controller test needs, wired to fakes.
pub struct Harness {
    pub gateway: Arc<ScriptedGateway>,
    pub clock: Arc<ManualClock>,
    pub observer: Arc<RecordingObserver>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        Self {
            gateway: ScriptedGateway::new(),
            clock: Arc::new(ManualClock::new()),
            observer: RecordingObserver::new(),
        }
    }

    pub fn deployment<'a>(
        &self,
        app: &'a ApplicationDescriptor,
    ) -> Deployment<'a, Arc<ScriptedGateway>> {
        Deployment::new(ENDPOINT, app, self.gateway.clone())
            .unwrap()
            .clock(self.clock.clone())
            .observer(self.observer.clone())
            .timeouts(timeouts())
    }
}

/// `{app: {...}}` body with the given health results, one task per entry.
pub fn app_body(id: &str, alive: &[Option<bool>]) -> Value {
    let tasks: Vec<Value> = alive
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let task_id = format!("{id}.task{i}");
            let result = match a {
                Some(b) => json!({"alive": b, "taskId": task_id}),
                None => json!({"taskId": task_id}),
            };
            json!({"id": task_id, "healthCheckResults": [result]})
        })
        .collect();

    json!({
        "app": {
            "id": format!("/{id}"),
            "instances": alive.len(),
            "healthChecks": [{"protocol": "HTTP"}],
            "deployments": [],
            "tasks": tasks
        }
    })
}
