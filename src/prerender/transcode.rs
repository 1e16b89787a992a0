//! Response body transcoding between the prerender service and the client.
//!
//! The service is always asked for gzip. Depending on what the client accepts
//! the body is compressed, decompressed or relayed untouched while streaming.

use std::io;

use async_compression::tokio::bufread::{GzipDecoder, GzipEncoder};
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderValue, header};
use futures_util::{Stream, TryStreamExt};
use tokio_util::io::{ReaderStream, StreamReader};

use super::error::PrerenderError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How the service body has to be transformed for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transcode {
    /// Client accepts gzip, service sent plain bytes.
    Compress,
    /// Client does not accept gzip, service sent gzip.
    Decompress,
    /// Encodings already agree.
    Passthrough,
}

impl Transcode {
    pub fn new(client_accepts_gzip: bool, backend_is_gzip: bool) -> Self {
        match (client_accepts_gzip, backend_is_gzip) {
            (true, false) => Transcode::Compress,
            (false, true) => Transcode::Decompress,
            _ => Transcode::Passthrough,
        }
    }

    /// Picks the mode from the client's request headers and the service's response headers.
    pub fn select(client: &HeaderMap, backend: &HeaderMap) -> Self {
        Self::new(
            contains_gzip(client, header::ACCEPT_ENCODING),
            contains_gzip(backend, header::CONTENT_ENCODING),
        )
    }

    /// `Content-Encoding` to send to the client.
    pub fn content_encoding(self, backend: &HeaderMap) -> Option<HeaderValue> {
        match self {
            Transcode::Compress => Some(HeaderValue::from_static("gzip")),
            Transcode::Decompress => None,
            Transcode::Passthrough => backend.get(header::CONTENT_ENCODING).cloned(),
        }
    }

    /// Wraps the service byte stream into a client body.
    ///
    /// Codec state lives inside the returned body and is dropped with it,
    /// whether the stream completes, fails or the client goes away.
    pub fn body<S, E>(self, stream: S) -> Body
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        match self {
            Transcode::Passthrough => Body::from_stream(stream),
            Transcode::Compress => {
                let reader = StreamReader::new(stream.map_err(io::Error::other));
                Body::from_stream(ReaderStream::new(GzipEncoder::new(reader)).map_err(stream_error))
            }
            Transcode::Decompress => {
                let reader = StreamReader::new(stream.map_err(io::Error::other));
                let mut decoder = GzipDecoder::new(reader);
                // Concatenated gzip members form one body.
                decoder.multiple_members(true);
                Body::from_stream(ReaderStream::new(decoder).map_err(stream_error))
            }
        }
    }
}

fn contains_gzip(headers: &HeaderMap, name: header::HeaderName) -> bool {
    headers
        .get_all(name)
        .iter()
        .any(|v| String::from_utf8_lossy(v.as_bytes()).contains("gzip"))
}

fn stream_error(err: io::Error) -> PrerenderError {
    tracing::warn!(error = %err, "Prerender body transcoding failed mid-stream");
    PrerenderError::Transcode(err)
}
