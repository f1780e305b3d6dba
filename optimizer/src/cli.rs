use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use common::OptimizeError;
use tracing::info;

use crate::config::Config;
use crate::driver;

#[derive(Parser)]
#[command(name = "optimize")]
#[command(about = "Optimiza una colección de imágenes usando un servicio RESTful")]
struct Cli {
    /// Archivo de texto con una URL de imagen por línea
    #[arg(value_name = "ARCHIVO_URLS")]
    source_file: PathBuf,

    /// Directorio donde guardar las imágenes optimizadas
    #[arg(value_name = "DIR_DESTINO")]
    dest_dir: PathBuf,
}

pub async fn run() -> Result<(), OptimizeError> {
    let cli = Cli::parse();
    let config = Arc::new(Config::from_env());

    // Validamos la entrada antes de crear directorios o tocar la red
    let urls = driver::read_source_urls(&cli.source_file)?;

    driver::ensure_dir(&cli.dest_dir)?;
    driver::ensure_dir(&config.log_dir)?;
    let log_path = init_log_file(&config)?;

    println!("optimize: el script de optimización está en ejecución");
    info!("logging iniciado en {}", log_path.display());

    driver::run_batch(config, urls, &cli.dest_dir).await?;

    info!("logging detenido");
    Ok(())
}

/// Crea el archivo de log de esta corrida (uno por ejecución, con el
/// timestamp en el nombre, sin `:` ni `.`) y apunta el subscriber de
/// tracing hacia él. La consola queda solo para las líneas de resultado.
fn init_log_file(config: &Config) -> Result<PathBuf, OptimizeError> {
    let stamp = Local::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
        .replace([':', '.'], "-");
    let path = config.log_dir.join(format!("{stamp}.log"));

    let file = File::create(&path).map_err(|e| OptimizeError::Unexpected(e.into()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter("optimize=debug,reqwest=info")
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();

    Ok(path)
}
