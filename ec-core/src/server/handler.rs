use crate::server::request::{
    BodyLengthError, RequestError, RequestHead, content_length, discard_body, is_timeout,
    read_request_head,
};
use crate::server::resolve::{ResolveError, resolve_log_path};
use crate::server::response::{HTML, build_response, empty_response};
use http::header::ALLOW;
use http::{HeaderValue, Method, Response, StatusCode};
use std::fs;
use std::io::BufRead;
use std::path::PathBuf;

/// What the handlers need to know about the deployment.
#[derive(Debug, Clone)]
pub struct ServeContext {
    pub log_dir: PathBuf,
    pub suffix: String,
    pub max_body_bytes: u64,
}

/// A handled request, for logging.
#[derive(Debug)]
pub struct Exchange {
    pub method: Option<Method>,
    pub path: Option<String>,
    pub response: Response<Vec<u8>>,
}

/// Read one request from `reader` and produce the response.
///
/// Returns `None` when the peer disconnected without sending a request, or
/// the connection failed so that no response can be delivered.
pub fn handle_request<R: BufRead>(reader: &mut R, ctx: &ServeContext) -> Option<Exchange> {
    let head = match read_request_head(reader) {
        Ok(head) => head,
        Err(err) => {
            if let RequestError::Io(e) = &err {
                tracing::debug!(error = %e, "failed to read request");
            }
            return err.status().map(|status| Exchange {
                method: None,
                path: None,
                response: empty_response(status),
            });
        }
    };

    let response = match head.method {
        Method::GET => handle_get(&head, ctx),
        Method::POST => handle_post(&head, reader, ctx),
        _ => method_not_allowed(),
    };

    Some(Exchange {
        path: Some(head.uri.path().to_string()),
        method: Some(head.method),
        response,
    })
}

/// Serve `<log_dir>/<name><suffix>` wrapped in a small HTML page.
pub fn handle_get(head: &RequestHead, ctx: &ServeContext) -> Response<Vec<u8>> {
    let request_path = head.uri.path();

    let path = match resolve_log_path(&ctx.log_dir, request_path, &ctx.suffix) {
        Ok(path) => path,
        Err(e) => return empty_response(map_resolve_error(e)),
    };

    let contents = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return empty_response(StatusCode::NOT_FOUND);
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read log file");
            return empty_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let name = percent_encoding::percent_decode_str(&request_path[1..]).decode_utf8_lossy();
    let body = render_log_page(&name, &String::from_utf8_lossy(&contents));

    build_response(StatusCode::OK, Some(HTML), body.into_bytes())
}

pub fn render_log_page(name: &str, contents: &str) -> String {
    format!("<p>You accessed path: {name}</p><pre>{contents}</pre>")
}

/// Read and discard the body, acknowledging with an empty 200.
pub fn handle_post<R: BufRead>(
    head: &RequestHead,
    reader: &mut R,
    ctx: &ServeContext,
) -> Response<Vec<u8>> {
    let len = match content_length(&head.headers) {
        Ok(len) => len,
        Err(BodyLengthError::Missing) => return empty_response(StatusCode::LENGTH_REQUIRED),
        Err(BodyLengthError::Invalid) => return empty_response(StatusCode::BAD_REQUEST),
        Err(BodyLengthError::Chunked) => return empty_response(StatusCode::NOT_IMPLEMENTED),
    };

    if len > ctx.max_body_bytes {
        return empty_response(StatusCode::PAYLOAD_TOO_LARGE);
    }

    match discard_body(reader, len) {
        Ok(read) if read == len => {
            tracing::debug!(path = head.uri.path(), bytes = len, "POST body discarded");
            empty_response(StatusCode::OK)
        }
        Ok(read) => {
            tracing::debug!(declared = len, read, "POST body shorter than Content-Length");
            empty_response(StatusCode::BAD_REQUEST)
        }
        Err(e) if is_timeout(&e) => empty_response(StatusCode::REQUEST_TIMEOUT),
        Err(e) => {
            tracing::debug!(error = %e, "failed to read POST body");
            empty_response(StatusCode::BAD_REQUEST)
        }
    }
}

fn method_not_allowed() -> Response<Vec<u8>> {
    let mut resp = empty_response(StatusCode::METHOD_NOT_ALLOWED);
    resp.headers_mut()
        .insert(ALLOW, HeaderValue::from_static("GET, POST"));
    resp
}

fn map_resolve_error(err: ResolveError) -> StatusCode {
    match err {
        ResolveError::NotFound => StatusCode::NOT_FOUND,
        ResolveError::Forbidden => StatusCode::FORBIDDEN,
        ResolveError::BadPath => StatusCode::BAD_REQUEST,
    }
}
