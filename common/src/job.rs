use std::path::PathBuf;

/* --------- Ciclo de vida de un job de optimización --------- */

/// Un job cubre el ciclo completo de una URL: submit → poll → fetch.
/// Lo crea el driver a partir de una línea del archivo de entrada y
/// solo su propio workflow lo muta (el token se asigna tras el submit).
#[derive(Debug, Clone)]
pub struct Job {
    pub image_url: String,
    pub dest_dir: PathBuf,

    /// Token de seguimiento que devuelve el servicio; opaco, solo
    /// sirve como clave de correlación para poll y fetch.
    pub token: Option<String>,
}

impl Job {
    pub fn new(image_url: String, dest_dir: PathBuf) -> Job {
        Job {
            image_url,
            dest_dir,
            token: None,
        }
    }
}

/// Resultado final de un job: el par (éxito, URL) que reporta el driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub success: bool,
    pub url: String,
}

/// Clasificación del campo `status` del servicio. Solo `complete` y
/// `failed` son terminales; cualquier otro valor significa seguir
/// consultando.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Complete,
    Failed,
    Pending,
}

impl PollStatus {
    pub fn parse(raw: &str) -> PollStatus {
        match raw {
            "complete" => PollStatus::Complete,
            "failed" => PollStatus::Failed,
            _ => PollStatus::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollStatus::Pending)
    }
}
