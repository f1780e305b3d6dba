use std::fs;
use std::path::Path;
use std::sync::Arc;

use common::{Job, JobOutcome, OptimizeError};
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::Config;
use crate::workflow;

/// Lee el archivo de URLs: una por línea, sin espacios finales; las
/// líneas en blanco se descartan. La existencia se comprueba antes de
/// leer para distinguir `SourceNotFound` del resto de errores de E/S.
pub fn read_source_urls(path: &Path) -> Result<Vec<String>, OptimizeError> {
    if !path.exists() {
        return Err(OptimizeError::SourceNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| OptimizeError::Unexpected(e.into()))?;
    Ok(content
        .lines()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

/// Crea el directorio si no existe; repetir la llamada no es un error.
pub fn ensure_dir(path: &Path) -> Result<(), OptimizeError> {
    fs::create_dir_all(path).map_err(|e| OptimizeError::Unexpected(e.into()))
}

/// Lanza un job por URL sobre un pool acotado por semáforo y reporta
/// cada resultado según termina (orden de finalización, no de envío):
/// una línea por job. El fallo de un job nunca aborta a los demás.
pub async fn run_batch(
    config: Arc<Config>,
    urls: Vec<String>,
    dest_dir: &Path,
) -> Result<Vec<JobOutcome>, OptimizeError> {
    let client = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| OptimizeError::Unexpected(e.into()))?;

    // Por defecto el pool abarca la lista completa; el tope de la
    // configuración permite acotarlo para lotes grandes.
    let pool_size = match config.max_concurrency {
        Some(cap) => cap.max(1),
        None => urls.len().max(1),
    };
    let semaphore = Arc::new(Semaphore::new(pool_size));
    info!("lanzando {} jobs con un pool de {pool_size}", urls.len());

    let mut pool = JoinSet::new();
    for url in urls {
        let client = client.clone();
        let config = config.clone();
        let semaphore = semaphore.clone();
        let job = Job::new(url, dest_dir.to_path_buf());

        pool.spawn(async move {
            // El permiso se retiene durante todo el ciclo del job; un
            // semáforo cerrado se reporta como fallo del job, no como pánico
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!(
                        "no se pudo obtener un permiso del pool para {}",
                        job.image_url
                    );
                    return JobOutcome {
                        success: false,
                        url: job.image_url,
                    };
                }
            };
            workflow::optimize_image(client, config, job).await
        });
    }

    let mut outcomes = Vec::with_capacity(pool.len());
    while let Some(joined) = pool.join_next().await {
        match joined {
            Ok(outcome) => {
                if outcome.success {
                    println!("optimize: imagen procesada [{}]", outcome.url);
                } else {
                    println!("optimize: no se pudo procesar la imagen [{}]", outcome.url);
                }
                outcomes.push(outcome);
            }
            Err(e) => warn!("una tarea del pool terminó abruptamente: {e:?}"),
        }
    }

    Ok(outcomes)
}
