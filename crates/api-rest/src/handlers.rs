//! Request handlers for the REST API.

use crate::{ApiError, AppState};
use api_shared::{
    DeleteReq, DocumentRes, ErrorRes, HealthRes, HealthService, MessageRes, UploadRes,
};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, Path as AxumPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use docstore_core::{UploadFile, PDF_MEDIA_TYPE};

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Plaintext liveness probe", body = String, content_type = "text/plain")
    )
)]
/// Plaintext liveness probe
pub(crate) async fn index() -> &'static str {
    HealthService::liveness_text()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub(crate) async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = api_shared::UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document stored", body = UploadRes),
        (status = 400, description = "Missing field or not a .pdf filename", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Upload a PDF
///
/// Expects multipart fields `name` (text) and `file` (a file part whose filename ends in
/// `.pdf`). The document is stored under a freshly generated identifier and recorded in the
/// metadata store.
///
/// # Returns
/// * `201` with the stored file path and the upload date
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - `name` or `file` is missing, or the body is not multipart,
/// - the file part has an empty filename,
/// - the filename does not end in `.pdf`.
///
/// Returns `500 Internal Server Error` if storing the file or its record fails.
#[axum::debug_handler]
pub(crate) async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let (name, file) = match multipart {
        Ok(multipart) => match read_upload_form(multipart).await {
            Ok(form) => form,
            Err(e) => {
                tracing::warn!("unreadable multipart body: {}", e);
                return Ok((e.status(), Json(ErrorRes { error: e.body_text() })).into_response());
            }
        },
        Err(rejection) => {
            tracing::debug!("upload without multipart body: {}", rejection);
            (None, None)
        }
    };

    let uploaded = state.documents.upload(name, file)?;

    Ok((
        StatusCode::CREATED,
        Json(UploadRes {
            message: "File successfully uploaded".into(),
            file_path: uploaded.file_path.display().to_string(),
            date: uploaded.date,
        }),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/documents",
    responses(
        (status = 200, description = "Every document record", body = [DocumentRes]),
        (status = 404, description = "Nothing has been uploaded yet", body = ErrorRes),
        (status = 500, description = "Metadata store unreadable", body = ErrorRes)
    )
)]
/// List every document record, in upload order
#[axum::debug_handler]
pub(crate) async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentRes>>, ApiError> {
    let records = state.documents.list()?;

    Ok(Json(
        records
            .into_iter()
            .map(|r| DocumentRes {
                name: r.name,
                file_path: r.file_path,
                date: r.date,
            })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/download/{identifier}",
    params(
        ("identifier" = String, Path, description = "File identifier returned by /documents")
    ),
    responses(
        (status = 200, description = "The stored PDF as an attachment", content_type = "application/pdf"),
        (status = 404, description = "No stored file for the identifier", body = ErrorRes)
    )
)]
/// Download a stored PDF as an attachment
///
/// Only the upload directory is consulted; a file without a metadata record is still served.
#[axum::debug_handler]
pub(crate) async fn download(
    State(state): State<AppState>,
    AxumPath(identifier): AxumPath<String>,
) -> Result<Response, ApiError> {
    let document = state.documents.download(&identifier)?;

    let headers = [
        (header::CONTENT_TYPE, PDF_MEDIA_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.file_name),
        ),
    ];
    Ok((headers, document.content).into_response())
}

#[utoipa::path(
    post,
    path = "/delete",
    request_body = DeleteReq,
    responses(
        (status = 200, description = "File and record removed", body = MessageRes),
        (status = 400, description = "filePath missing", body = ErrorRes),
        (status = 404, description = "No stored file for the identifier", body = ErrorRes),
        (status = 500, description = "Removal failed", body = ErrorRes)
    )
)]
/// Delete a stored PDF and its metadata record
///
/// # Errors
/// Returns `400 Bad Request` if the body is not a JSON object with a string `filePath`.
/// Returns `404 Not Found` if no file is stored for it.
/// Returns `500 Internal Server Error`, carrying the failure text, if removal fails.
#[axum::debug_handler]
pub(crate) async fn delete(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageRes>, ApiError> {
    let req: DeleteReq = serde_json::from_slice(&body).unwrap_or_default();

    state.documents.delete(req.file_path.as_deref())?;

    Ok(Json(MessageRes {
        message: "File successfully deleted".into(),
    }))
}

/// Collects the `name` text field and the `file` file part.
///
/// Like a classic form parser, a part only counts as the file if it carries a `filename`
/// attribute, and `name` only counts if it does not. The first occurrence of each wins.
async fn read_upload_form(
    mut multipart: Multipart,
) -> Result<(Option<String>, Option<UploadFile>), axum::extract::multipart::MultipartError> {
    let mut name = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_owned);

        match (field_name.as_str(), filename) {
            ("file", Some(filename)) if file.is_none() => {
                let content = field.bytes().await?;
                file = Some(UploadFile {
                    filename,
                    content: content.to_vec(),
                });
            }
            ("name", None) if name.is_none() => {
                name = Some(field.text().await?);
            }
            _ => {}
        }
    }

    Ok((name, file))
}

#[cfg(test)]
mod tests {
    use crate::{router, MAX_UPLOAD_BYTES};
    use api_shared::{DocumentRes, ErrorRes, MessageRes, UploadRes};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use docstore_core::{CoreConfig, DocumentService};
    use http_body_util::BodyExt;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "docstore-test-boundary";
    const PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF";

    struct Part<'a> {
        name: &'a str,
        filename: Option<&'a str>,
        data: &'a [u8],
    }

    fn app(root: &Path) -> Router {
        let cfg = CoreConfig::new(root.join("upload"), root.join("metadata.json")).unwrap();
        router(DocumentService::new(&cfg).unwrap())
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part.filename {
                Some(filename) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                            part.name, filename
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(b"Content-Type: application/pdf\r\n");
                }
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name)
                        .as_bytes(),
                ),
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn delete_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/delete")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn upload_invoice(app: &Router) -> UploadRes {
        let (status, body) = send(
            app,
            upload_request(&[
                Part {
                    name: "name",
                    filename: None,
                    data: b"Invoice",
                },
                Part {
                    name: "file",
                    filename: Some("report.pdf"),
                    data: PDF,
                },
            ]),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice(&body).unwrap()
    }

    fn identifier_of(res: &UploadRes) -> String {
        Path::new(&res.file_path)
            .file_stem()
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    fn error_of(body: &[u8]) -> String {
        serde_json::from_slice::<ErrorRes>(body).unwrap().error
    }

    fn today() -> String {
        chrono::Utc::now().format("%d/%m/%Y").to_string()
    }

    #[tokio::test]
    async fn test_index_liveness_text() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let (status, body) = send(&app, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"HEELLLO WORLD");
    }

    #[tokio::test]
    async fn test_health() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let (status, body) = send(&app, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        let res: api_shared::HealthRes = serde_json::from_slice(&body).unwrap();
        assert!(res.ok);
    }

    #[tokio::test]
    async fn test_list_before_upload_is_404() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let (status, body) = send(&app, get("/documents")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_of(&body), "No documents found");
    }

    #[tokio::test]
    async fn test_upload_then_list() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let uploaded = upload_invoice(&app).await;
        let id = identifier_of(&uploaded);

        assert_eq!(uploaded.message, "File successfully uploaded");
        assert!(uploaded.file_path.ends_with(&format!("upload/{}.pdf", id)));
        assert_eq!(uploaded.date, today());

        let (status, body) = send(&app, get("/documents")).await;
        assert_eq!(status, StatusCode::OK);
        let docs: Vec<DocumentRes> = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            docs,
            vec![DocumentRes {
                name: "Invoice".into(),
                file_path: id,
                date: uploaded.date,
            }]
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let (status, body) = send(
            &app,
            upload_request(&[
                Part {
                    name: "name",
                    filename: None,
                    data: b"Invoice",
                },
                Part {
                    name: "file",
                    filename: Some("report.txt"),
                    data: b"hello",
                },
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error_of(&body),
            "Invalid file type, only PDF files are allowed"
        );
        assert!(!temp.path().join("metadata.json").exists());
        assert_eq!(
            std::fs::read_dir(temp.path().join("upload")).unwrap().count(),
            0
        );
    }

    #[tokio::test]
    async fn test_upload_missing_name() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let (status, body) = send(
            &app,
            upload_request(&[Part {
                name: "file",
                filename: Some("report.pdf"),
                data: PDF,
            }]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&body), "No file or name provided");
    }

    #[tokio::test]
    async fn test_upload_file_field_without_filename_is_missing() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let (status, body) = send(
            &app,
            upload_request(&[
                Part {
                    name: "name",
                    filename: None,
                    data: b"Invoice",
                },
                Part {
                    name: "file",
                    filename: None,
                    data: PDF,
                },
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&body), "No file or name provided");
    }

    #[tokio::test]
    async fn test_upload_empty_filename() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let (status, body) = send(
            &app,
            upload_request(&[
                Part {
                    name: "name",
                    filename: None,
                    data: b"Invoice",
                },
                Part {
                    name: "file",
                    filename: Some(""),
                    data: b"",
                },
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&body), "No selected file");
    }

    #[tokio::test]
    async fn test_upload_without_multipart_body() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let req = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&body), "No file or name provided");
    }

    #[tokio::test]
    async fn test_download_uploaded_document() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());
        let id = identifier_of(&upload_invoice(&app).await);

        let response = app
            .clone()
            .oneshot(get(&format!("/download/{}", id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"{}.pdf\"", id).as_str()
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), PDF);
    }

    #[tokio::test]
    async fn test_download_unknown_identifier_is_404() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let (status, body) = send(
            &app,
            get("/download/550e8400-e29b-41d4-a716-446655440000"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_of(&body), "File not found");
    }

    #[tokio::test]
    async fn test_download_nested_path_is_404() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("metadata.pdf"), "x").unwrap();
        let app = app(temp.path());

        let (status, _) = send(&app, get("/download/sub/..%2F..%2Fmetadata")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_list_and_download() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());
        let id = identifier_of(&upload_invoice(&app).await);

        let (status, body) = send(&app, delete_request(&format!(r#"{{"filePath":"{}"}}"#, id))).await;
        assert_eq!(status, StatusCode::OK);
        let res: MessageRes = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.message, "File successfully deleted");

        let (status, body) = send(&app, get("/documents")).await;
        assert_eq!(status, StatusCode::OK);
        let docs: Vec<DocumentRes> = serde_json::from_slice(&body).unwrap();
        assert!(docs.is_empty());

        let (status, _) = send(&app, get(&format!("/download/{}", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_unknown_identifier_is_404() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());
        upload_invoice(&app).await;
        let before = std::fs::read(temp.path().join("metadata.json")).unwrap();

        let (status, body) = send(
            &app,
            delete_request(r#"{"filePath":"550e8400-e29b-41d4-a716-446655440000"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_of(&body), "File not found");
        assert_eq!(
            std::fs::read(temp.path().join("metadata.json")).unwrap(),
            before
        );
    }

    #[tokio::test]
    async fn test_delete_without_file_path_is_400() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        for body in ["{}", "", "not json", r#"{"filePath": 7}"#, "null"] {
            let (status, res) = send(&app, delete_request(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(error_of(&res), "File path not provided");
        }
    }

    #[tokio::test]
    async fn test_delete_traversal_is_404() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());
        let victim = temp.path().join("victim.pdf");
        std::fs::write(&victim, "keep").unwrap();

        let (status, _) = send(&app, delete_request(r#"{"filePath":"../victim"}"#)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(victim.exists());
    }

    #[tokio::test]
    async fn test_delete_with_corrupt_metadata_is_500_with_error_text() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());
        let id = identifier_of(&upload_invoice(&app).await);
        std::fs::write(temp.path().join("metadata.json"), "not json").unwrap();
        let cfg = CoreConfig::new(temp.path().join("upload"), temp.path().join("metadata.json"))
            .unwrap();
        let expected = DocumentService::new(&cfg)
            .unwrap()
            .list()
            .unwrap_err()
            .to_string();

        let (status, body) =
            send(&app, delete_request(&format!(r#"{{"filePath":"{}"}}"#, id))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(expected.starts_with("failed to deserialize metadata"));
        assert_eq!(error_of(&body), expected);
    }

    #[tokio::test]
    async fn test_upload_over_body_limit_is_413_and_stores_nothing() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());
        let oversized = vec![b'x'; MAX_UPLOAD_BYTES + 1];

        let (status, _) = send(
            &app,
            upload_request(&[
                Part {
                    name: "name",
                    filename: None,
                    data: b"Huge",
                },
                Part {
                    name: "file",
                    filename: Some("huge.pdf"),
                    data: &oversized,
                },
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            std::fs::read_dir(temp.path().join("upload")).unwrap().count(),
            0
        );
        assert!(!temp.path().join("metadata.json").exists());
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let temp = TempDir::new().unwrap();
        let app = app(temp.path());

        let (status, body) = send(&app, get("/api-docs/openapi.json")).await;

        assert_eq!(status, StatusCode::OK);
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
        for path in ["/upload", "/documents", "/download/{identifier}", "/delete"] {
            assert!(doc["paths"].get(path).is_some(), "missing {}", path);
        }
    }
}
