use http::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, DATE};
use http::{HeaderValue, Response, StatusCode};
use std::io::{self, Write};
use std::time::SystemTime;

pub const HTML: &str = "text/html; charset=utf-8";

/// Build a response with the headers every reply carries.
pub fn build_response(
    status: StatusCode,
    content_type: Option<&'static str>,
    body: Vec<u8>,
) -> Response<Vec<u8>> {
    let len = body.len();
    let mut resp = Response::new(body);
    *resp.status_mut() = status;

    let headers = resp.headers_mut();
    headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    headers.insert(CONNECTION, HeaderValue::from_static("close"));
    if let Ok(date) = HeaderValue::from_str(&httpdate::fmt_http_date(SystemTime::now())) {
        headers.insert(DATE, date);
    }
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    resp
}

pub fn empty_response(status: StatusCode) -> Response<Vec<u8>> {
    build_response(status, None, Vec::new())
}

/// Serialize `resp` as an HTTP/1.1 message.
pub fn write_response<W: Write>(w: &mut W, resp: &Response<Vec<u8>>) -> io::Result<()> {
    let status = resp.status();
    write!(
        w,
        "HTTP/1.1 {} {}\r\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    )?;

    for (name, value) in resp.headers() {
        w.write_all(name.as_str().as_bytes())?;
        w.write_all(b": ")?;
        w.write_all(value.as_bytes())?;
        w.write_all(b"\r\n")?;
    }

    w.write_all(b"\r\n")?;
    w.write_all(resp.body())?;
    w.flush()
}
