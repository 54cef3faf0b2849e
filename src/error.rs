// One error type for the whole app.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Config error: {0}")]
    Config(String), // An explicitly requested config file could not be used
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error), // Reading/writing the local store file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error), // Store contents or translations were malformed
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] image::ImageError), // Encoding a PNG snapshot failed
}
