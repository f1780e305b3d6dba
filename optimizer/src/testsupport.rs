//! Servicio de optimización falso para las pruebas: implementa el
//! contrato fijo (crear job, estado, registro final) más una ruta de
//! descarga, sobre un listener efímero de localhost.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use common::wire::OptimizeRequest;
use serde_json::{json, Value};

use crate::config::Config;

pub const TOKEN: &str = "tok-0001";
pub const IMAGE_BYTES: &[u8] = b"bytes-de-imagen-optimizada";

/// Contadores de llamadas por endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hits {
    pub submit: u32,
    pub status: u32,
    pub fetch: u32,
    pub download: u32,
}

#[derive(Clone)]
pub struct FakeService {
    hits: Arc<Mutex<Hits>>,
    /// Secuencia de estados a devolver; el último se repite.
    statuses: Arc<Mutex<VecDeque<&'static str>>>,
    /// Si está activo, todo POST de creación responde 502.
    reject_all: bool,
    /// URL de imagen concreta cuyos submits se rechazan con 502.
    rejected_url: Option<&'static str>,
    /// URL base del servicio, rellenada al arrancar el listener.
    base: Arc<Mutex<String>>,
}

impl FakeService {
    pub fn new(statuses: &[&'static str]) -> FakeService {
        FakeService {
            hits: Arc::new(Mutex::new(Hits::default())),
            statuses: Arc::new(Mutex::new(statuses.iter().copied().collect())),
            reject_all: false,
            rejected_url: None,
            base: Arc::new(Mutex::new(String::new())),
        }
    }

    pub fn reject_all_submits(mut self) -> FakeService {
        self.reject_all = true;
        self
    }

    pub fn reject_url(mut self, url: &'static str) -> FakeService {
        self.rejected_url = Some(url);
        self
    }

    /// Arranca el servicio en un puerto efímero y devuelve su URL base.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/", post(create_job))
            .route("/files/:name", get(download))
            .route("/:token/status", get(job_status))
            .route("/:token", get(job_record))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        *self.base.lock().unwrap() = base.clone();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        base
    }

    pub fn hits(&self) -> Hits {
        *self.hits.lock().unwrap()
    }
}

async fn create_job(
    State(svc): State<FakeService>,
    Json(req): Json<OptimizeRequest>,
) -> (StatusCode, Json<Value>) {
    svc.hits.lock().unwrap().submit += 1;

    let image_url = req
        .items
        .first()
        .and_then(|item| item.images.first())
        .map(|img| img.image_url.as_str())
        .unwrap_or_default();

    if svc.reject_all || svc.rejected_url == Some(image_url) {
        return (StatusCode::BAD_GATEWAY, Json(json!({"error": "rechazado"})));
    }
    (StatusCode::OK, Json(json!({"data": [{"token": TOKEN}]})))
}

async fn job_status(
    State(svc): State<FakeService>,
    UrlPath(_token): UrlPath<String>,
) -> Json<Value> {
    svc.hits.lock().unwrap().status += 1;

    let mut statuses = svc.statuses.lock().unwrap();
    let status = if statuses.len() > 1 {
        statuses.pop_front().unwrap()
    } else {
        statuses.front().copied().unwrap_or("complete")
    };
    Json(json!({"data": [{"status": status}]}))
}

async fn job_record(
    State(svc): State<FakeService>,
    UrlPath(_token): UrlPath<String>,
) -> Json<Value> {
    svc.hits.lock().unwrap().fetch += 1;

    let modified_url = format!("{}/files/foo_opt.jpg", svc.base.lock().unwrap());
    Json(json!({
        "data": [{"sampleAttribute": [{"images": [{"modifiedUrl": modified_url}]}]}]
    }))
}

async fn download(State(svc): State<FakeService>, UrlPath(_name): UrlPath<String>) -> Vec<u8> {
    svc.hits.lock().unwrap().download += 1;
    IMAGE_BYTES.to_vec()
}

/// Configuración de pruebas apuntando al servicio falso, con un
/// intervalo de polling corto para no alargar la suite.
pub fn test_config(base: String, dir: &Path) -> Config {
    Config {
        service_url: base,
        user: "usuario".to_string(),
        password: "clave".to_string(),
        timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(10),
        log_dir: dir.join("logs"),
        max_concurrency: None,
    }
}
