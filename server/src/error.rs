use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use relay_viewer_data_management::DataManagerError;

use crate::render::placeholder_html;

pub fn status_of(err: &DataManagerError) -> StatusCode {
    match err {
        DataManagerError::MissingDirectory(_)
        | DataManagerError::NoTracks(_)
        | DataManagerError::UnknownSegment(_) => StatusCode::NOT_FOUND,
        DataManagerError::Gpx(_)
        | DataManagerError::Cache(_)
        | DataManagerError::Export(_)
        | DataManagerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log(err: &DataManagerError, status: StatusCode) {
    if status.is_server_error() {
        tracing::error!("{}", err);
    } else {
        tracing::warn!("{}", err);
    }
}

/// Plain text error for the JSON API.
pub fn api_error(err: DataManagerError) -> Response {
    let status = status_of(&err);
    log(&err, status);
    (status, err.to_string()).into_response()
}

/// The same message, as a block the dashboard can show in place of a map.
pub fn page_error(err: DataManagerError) -> Response {
    let status = status_of(&err);
    log(&err, status);
    (status, Html(placeholder_html(&err.to_string()))).into_response()
}
