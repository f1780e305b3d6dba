use serde::{Deserialize, Serialize};

/* --------- Cuerpo de la petición de optimización --------- */

// Identificadores fijos que exige el contrato del servicio.
pub const SAMPLE_ID: u64 = 77_777;
pub const ITEM_ID: u64 = 123;
pub const IMAGE_ID: u64 = 987_456;

/// Cuerpo JSON del POST de creación de un job:
/// `{sampleId, items: [{id, images: [{imageId, imageUrl}]}]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub sample_id: u64,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub image_id: u64,
    pub image_url: String,
}

impl OptimizeRequest {
    /// Construye la petición para una sola URL de imagen, con los
    /// identificadores fijos del contrato.
    pub fn for_url(url: &str) -> OptimizeRequest {
        OptimizeRequest {
            sample_id: SAMPLE_ID,
            items: vec![Item {
                id: ITEM_ID,
                images: vec![ImageRef {
                    image_id: IMAGE_ID,
                    image_url: url.to_string(),
                }],
            }],
        }
    }
}

/* --------- Respuestas del servicio --------- */

/// Respuesta al POST de creación: `{data: [{token}]}`
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub data: Vec<SubmitEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitEntry {
    pub token: String,
}

impl SubmitResponse {
    /// Token de la primera entrada, si existe.
    pub fn first_token(&self) -> Option<&str> {
        self.data.first().map(|e| e.token.as_str())
    }
}

/// Respuesta del endpoint de estado: `{data: [{status}]}`
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub data: Vec<StatusEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusEntry {
    pub status: String,
}

impl StatusResponse {
    pub fn first_status(&self) -> Option<&str> {
        self.data.first().map(|e| e.status.as_str())
    }
}

/// Respuesta del job terminado:
/// `{data: [{sampleAttribute: [{images: [{modifiedUrl}]}]}]}`
#[derive(Debug, Clone, Deserialize)]
pub struct ResultResponse {
    pub data: Vec<ResultEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub sample_attribute: Vec<AttributeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeEntry {
    pub images: Vec<ModifiedImage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedImage {
    pub modified_url: String,
}

impl ResultResponse {
    /// URL de la imagen modificada de la primera entrada anidada.
    pub fn first_modified_url(&self) -> Option<&str> {
        self.data
            .first()?
            .sample_attribute
            .first()?
            .images
            .first()
            .map(|img| img.modified_url.as_str())
    }
}
