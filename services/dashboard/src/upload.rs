use crate::views;
use axum::body::Bytes;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::Html;
use compliance_mapping::controls::{gap_list, ComplianceSummary, ControlDataset};
use compliance_mapping::error::AppError;
use tracing::{info, warn};

const FILE_FIELD: &str = "file";

struct UploadedCsv {
    file_name: String,
    bytes: Bytes,
}

pub(crate) async fn upload_form() -> Html<String> {
    Html(views::intro_page())
}

/// Renders the uploaded mapping. Nothing from the upload outlives the response.
pub(crate) async fn upload_controls(mut multipart: Multipart) -> (StatusCode, Html<String>) {
    let upload = match read_csv_field(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Html(views::error_page("Choose a CSV file to upload.")),
            )
        }
        Err(err) => {
            warn!(error = %err, "rejected malformed upload");
            return (
                StatusCode::BAD_REQUEST,
                Html(views::error_page(&err.to_string())),
            );
        }
    };

    if !is_csv_name(&upload.file_name) {
        return (
            StatusCode::BAD_REQUEST,
            Html(views::error_page("Only .csv files are supported.")),
        );
    }

    match ControlDataset::from_reader(upload.bytes.as_ref()) {
        Ok(dataset) => {
            let summary = ComplianceSummary::from_dataset(&dataset);
            let gaps = gap_list(&dataset);
            info!(
                file = %upload.file_name,
                controls = dataset.len(),
                gaps = gaps.len(),
                "rendered uploaded control mapping"
            );
            (
                StatusCode::OK,
                Html(views::dashboard_page(
                    &upload.file_name,
                    &dataset,
                    &summary,
                    &gaps,
                )),
            )
        }
        Err(err) => {
            warn!(file = %upload.file_name, error = %err, "uploaded mapping failed validation");
            (StatusCode::OK, Html(views::error_page(&err.to_string())))
        }
    }
}

async fn read_csv_field(multipart: &mut Multipart) -> Result<Option<UploadedCsv>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Upload(err.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::Upload(err.to_string()))?;
        return Ok(Some(UploadedCsv { file_name, bytes }));
    }

    Ok(None)
}

fn is_csv_name(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".csv")
}
