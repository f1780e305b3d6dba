use std::path::PathBuf;

use thiserror::Error;

/// Enumeración cerrada de fallos del optimizador. Los errores se
/// contienen a nivel de job: ninguno aborta a los jobs hermanos. Solo
/// `SourceNotFound` (y un error totalmente inesperado durante el
/// arranque) termina la ejecución completa, siempre con estado 0.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// El archivo de URLs de entrada no existe.
    #[error("no se encontró el archivo [{}]", .0.display())]
    SourceNotFound(PathBuf),

    /// Una llamada HTTP superó el tiempo límite configurado.
    #[error("la llamada `{stage}` superó el tiempo límite")]
    TransportTimeout { stage: &'static str },

    /// El endpoint de estado reportó `failed` para el token.
    #[error("el servicio reportó la optimización como fallida (token `{token}`)")]
    RemoteOptimizationFailed { token: String },

    /// Cualquier otro fallo: HTTP no-2xx, JSON inválido, E/S, etc.
    #[error("error inesperado: {0}")]
    Unexpected(#[from] anyhow::Error),
}
