use std::path::Path;

use tokio::fs::OpenOptions;
use tokio_util::io::ReaderStream;
use axum::http::StatusCode;
use axum::body::Body;
use axum::response::Response;

use crate::net;
use crate::net::error;

#[derive(Debug, Clone, Copy)]
pub enum Disposition {
    Inline,
    Attachment,
}

/// streams a file from disk. the stream holds the open handle, so the source
/// may be unlinked once this returns and the download still completes
pub async fn stream_file<N, P>(
    name: N,
    path: P,
    disposition: Disposition
) -> error::Result<Response<Body>>
where
    N: AsRef<str>,
    P: AsRef<Path>,
{
    let name_ref = name.as_ref();
    let ext = name_ref.rsplit_once('.')
        .map(|(_, ext)| ext);
    let mime = net::mime::mime_from_ext(ext);

    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .await?;
    let metadata = file.metadata().await?;

    let stream = ReaderStream::new(file);

    let disposition = match disposition {
        Disposition::Inline => String::from("inline"),
        Disposition::Attachment => format!(
            "attachment; filename=\"{}\"",
            name_ref.replace('"', "")
        ),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("content-type", mime.to_string())
        .header("content-length", metadata.len())
        .header("content-disposition", disposition)
        .body(Body::from_stream(stream))?)
}
