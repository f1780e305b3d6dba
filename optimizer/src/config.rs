use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Cota por defecto, en segundos, de cada llamada HTTP al servicio.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const DEFAULT_SERVICE_URL: &str = "https://sample-api.example/optimizations";
const DEFAULT_USER: &str = "sample_user_name";
const DEFAULT_PASSWORD: &str = "sample_password";
const DEFAULT_LOG_DIR: &str = "./logs";

/// Configuración explícita del optimizador: se construye una sola vez
/// en el arranque y se pasa al driver. No hay estado global mutable.
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint base del servicio de optimización.
    pub service_url: String,

    /// Credenciales de basic auth del servicio.
    pub user: String,
    pub password: String,

    /// Límite superior de cada petición HTTP.
    pub timeout: Duration,

    /// Espera bloqueante entre consultas de estado; por defecto es la
    /// misma duración que el timeout.
    pub poll_interval: Duration,

    /// Directorio donde se escribe el log de cada corrida.
    pub log_dir: PathBuf,

    /// Tope opcional del pool de jobs concurrentes. Sin tope, el pool
    /// se dimensiona al tamaño de la lista de entrada.
    pub max_concurrency: Option<usize>,
}

impl Config {
    /// Valores por defecto, sobreescribibles por variables de entorno:
    /// OPTIMIZE_SERVICE_URL, OPTIMIZE_USER, OPTIMIZE_PASSWORD,
    /// OPTIMIZE_TIMEOUT_SECS y OPTIMIZE_CONCURRENCY.
    pub fn from_env() -> Config {
        let timeout_secs = env::var("OPTIMIZE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Config {
            service_url: env::var("OPTIMIZE_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string()),
            user: env::var("OPTIMIZE_USER").unwrap_or_else(|_| DEFAULT_USER.to_string()),
            password: env::var("OPTIMIZE_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_PASSWORD.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            poll_interval: Duration::from_secs(timeout_secs),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            max_concurrency: env::var("OPTIMIZE_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse::<usize>().ok()),
        }
    }
}
