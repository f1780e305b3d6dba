mod cli;
mod config;
mod driver;
#[cfg(test)]
mod testsupport;
mod workflow;

use common::OptimizeError;

/// El proceso siempre termina con estado 0: los fallos de arranque se
/// reportan por consola con una sola línea y nada más.
#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        match e {
            OptimizeError::SourceNotFound(_) => println!("optimize: {e}"),
            other => println!("optimize: error inesperado durante el arranque [{other}]"),
        }
    }
}
