//! Wire bodies of the docstore REST API.
//!
//! Field names are camelCase on the wire (`filePath`) to stay compatible with existing clients.
//! Response fields are declared in alphabetical order so bodies serialise with sorted keys,
//! as existing clients have always received them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Multipart form accepted by `POST /upload`. Only used to describe the endpoint.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// Display name for the document
    pub name: String,
    /// The PDF itself; the filename must end in `.pdf`
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadRes {
    /// Upload date, `dd/mm/yyyy`
    pub date: String,
    /// Server-side path of the stored file, e.g. `upload/<id>.pdf`
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub message: String,
}

/// One entry of `GET /documents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DocumentRes {
    pub date: String,
    /// File identifier; pass it to `/download/{id}` or `/delete`
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteReq {
    /// File identifier of the document to delete
    #[serde(rename = "filePath", default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}
