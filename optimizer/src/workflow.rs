use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use common::wire::{OptimizeRequest, ResultResponse, StatusResponse, SubmitResponse};
use common::{Job, JobOutcome, OptimizeError, PollStatus};
use reqwest::Client;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::Config;

/// Ejecuta el ciclo completo de un job (submit → poll → fetch) y lo
/// reduce al par (éxito, URL). Cualquier error queda contenido aquí:
/// se registra y se reporta, pero nunca toca a los jobs hermanos.
pub async fn optimize_image(client: Client, config: Arc<Config>, mut job: Job) -> JobOutcome {
    let url = job.image_url.clone();
    match run_job(&client, &config, &mut job).await {
        Ok(saved) => {
            info!("imagen optimizada guardada en {}", saved.display());
            JobOutcome { success: true, url }
        }
        Err(e) => {
            match &job.token {
                Some(token) => warn!("job fallido para {url} (token `{token}`): {e}"),
                None => warn!("job fallido para {url}: {e}"),
            }
            JobOutcome { success: false, url }
        }
    }
}

async fn run_job(
    client: &Client,
    config: &Config,
    job: &mut Job,
) -> Result<PathBuf, OptimizeError> {
    let token = submit(client, config, &job.image_url).await?;
    job.token = Some(token.clone());

    poll_until_complete(client, config, &token).await?;
    fetch_result(client, config, &token, &job.dest_dir).await
}

/// Paso 1: crea el job en el servicio y extrae el token de seguimiento
/// de la primera entrada de la respuesta.
async fn submit(client: &Client, config: &Config, image_url: &str) -> Result<String, OptimizeError> {
    let resp = client
        .post(base_url(config))
        .basic_auth(&config.user, Some(&config.password))
        .json(&OptimizeRequest::for_url(image_url))
        .send()
        .await
        .map_err(|e| classify("submit", e))?;

    let status = resp.status();
    let body = resp.text().await.map_err(|e| classify("submit", e))?;
    // El cuerpo crudo se registra antes de inspeccionarlo
    info!("{body}");

    if !status.is_success() {
        return Err(OptimizeError::Unexpected(anyhow!(
            "el servicio respondió {status} al crear el job para {image_url}"
        )));
    }

    let parsed: SubmitResponse =
        serde_json::from_str(&body).map_err(|e| OptimizeError::Unexpected(e.into()))?;
    parsed
        .first_token()
        .map(|t| t.to_string())
        .ok_or_else(|| OptimizeError::Unexpected(anyhow!("respuesta de creación sin token")))
}

/// Paso 2: consulta el estado del token hasta verlo terminal. Sin tope
/// de reintentos ni backoff: un estado no terminal siempre espera
/// `poll_interval` y vuelve a preguntar.
async fn poll_until_complete(
    client: &Client,
    config: &Config,
    token: &str,
) -> Result<(), OptimizeError> {
    let status_url = format!("{}/{}/status", base_url(config), token);

    loop {
        let resp = client
            .get(&status_url)
            .basic_auth(&config.user, Some(&config.password))
            .send()
            .await
            .map_err(|e| classify("status", e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| classify("status", e))?;
        info!("{body}");

        if !status.is_success() {
            return Err(OptimizeError::Unexpected(anyhow!(
                "el servicio respondió {status} al consultar el token `{token}`"
            )));
        }

        let parsed: StatusResponse =
            serde_json::from_str(&body).map_err(|e| OptimizeError::Unexpected(e.into()))?;
        let raw = parsed
            .first_status()
            .ok_or_else(|| OptimizeError::Unexpected(anyhow!("respuesta de estado sin entradas")))?;

        match PollStatus::parse(raw) {
            PollStatus::Complete => return Ok(()),
            PollStatus::Failed => {
                return Err(OptimizeError::RemoteOptimizationFailed {
                    token: token.to_string(),
                })
            }
            PollStatus::Pending => sleep(config.poll_interval).await,
        }
    }
}

/// Paso 3: recupera el registro del job terminado, descarga la imagen
/// modificada y la guarda como `<destino>/<último segmento de la URL>`.
async fn fetch_result(
    client: &Client,
    config: &Config,
    token: &str,
    dest_dir: &Path,
) -> Result<PathBuf, OptimizeError> {
    let record_url = format!("{}/{}", base_url(config), token);
    let resp = client
        .get(&record_url)
        .basic_auth(&config.user, Some(&config.password))
        .send()
        .await
        .map_err(|e| classify("fetch", e))?;

    let status = resp.status();
    let body = resp.text().await.map_err(|e| classify("fetch", e))?;
    info!("{body}");

    if !status.is_success() {
        return Err(OptimizeError::Unexpected(anyhow!(
            "el servicio respondió {status} al recuperar el token `{token}`"
        )));
    }

    let parsed: ResultResponse =
        serde_json::from_str(&body).map_err(|e| OptimizeError::Unexpected(e.into()))?;
    let modified_url = parsed
        .first_modified_url()
        .ok_or_else(|| OptimizeError::Unexpected(anyhow!("registro sin imagen modificada")))?
        .to_string();

    let file_name = file_name_from_url(&modified_url).ok_or_else(|| {
        OptimizeError::Unexpected(anyhow!(
            "no se pudo derivar un nombre de archivo de `{modified_url}`"
        ))
    })?;

    let download = client
        .get(&modified_url)
        .send()
        .await
        .map_err(|e| classify("download", e))?;
    if !download.status().is_success() {
        return Err(OptimizeError::Unexpected(anyhow!(
            "la descarga de `{modified_url}` respondió {}",
            download.status()
        )));
    }
    let bytes = download.bytes().await.map_err(|e| classify("download", e))?;

    let dest_path = dest_dir.join(file_name);
    fs::write(&dest_path, &bytes).map_err(|e| OptimizeError::Unexpected(e.into()))?;
    Ok(dest_path)
}

fn base_url(config: &Config) -> &str {
    config.service_url.trim_end_matches('/')
}

/// Último segmento de la ruta de una URL, sin query ni fragmento.
fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => Some(name),
        _ => None,
    }
}

/// Clasifica un error de reqwest dentro de la enumeración cerrada:
/// timeout frente a cualquier otro fallo de transporte.
fn classify(stage: &'static str, err: reqwest::Error) -> OptimizeError {
    if err.is_timeout() {
        OptimizeError::TransportTimeout { stage }
    } else {
        OptimizeError::Unexpected(err.into())
    }
}
