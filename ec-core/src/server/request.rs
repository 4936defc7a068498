use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, Version};
use std::io::{self, BufRead, Read};

/// Longest request line or header line accepted.
pub const MAX_LINE_BYTES: u64 = 8 * 1024;
/// Most header lines accepted in one request.
pub const MAX_HEADERS: usize = 100;

#[derive(Debug)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

#[derive(Debug)]
pub enum RequestError {
    /// The peer closed the connection before sending anything.
    Closed,
    /// The request could not be parsed.
    Malformed(&'static str),
    HeadTooLarge,
    UnsupportedVersion,
    /// The socket read timeout expired.
    Timeout,
    Io(io::Error),
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Closed | Self::Io(_) => None,
            Self::Malformed(_) => Some(StatusCode::BAD_REQUEST),
            Self::HeadTooLarge => Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE),
            Self::UnsupportedVersion => Some(StatusCode::HTTP_VERSION_NOT_SUPPORTED),
            Self::Timeout => Some(StatusCode::REQUEST_TIMEOUT),
        }
    }
}

impl From<io::Error> for RequestError {
    fn from(e: io::Error) -> Self {
        if is_timeout(&e) {
            Self::Timeout
        } else {
            Self::Io(e)
        }
    }
}

pub(crate) fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// Read the request line and headers, leaving the body unread in `reader`.
pub fn read_request_head<R: BufRead>(reader: &mut R) -> Result<RequestHead, RequestError> {
    let line = match read_line(reader)? {
        Some(line) if !line.is_empty() => line,
        Some(_) => return Err(RequestError::Malformed("empty request line")),
        None => return Err(RequestError::Closed),
    };

    let mut parts = line.split(' ');
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(RequestError::Malformed("request line"));
    };

    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| RequestError::Malformed("method"))?;
    let uri: Uri = target
        .parse()
        .map_err(|_| RequestError::Malformed("request target"))?;
    let version = match version {
        "HTTP/1.1" => Version::HTTP_11,
        "HTTP/1.0" => Version::HTTP_10,
        v if v.starts_with("HTTP/") => return Err(RequestError::UnsupportedVersion),
        _ => return Err(RequestError::Malformed("version")),
    };

    let mut headers = HeaderMap::new();
    loop {
        let Some(line) = read_line(reader)? else {
            return Err(RequestError::Malformed("connection closed inside headers"));
        };
        if line.is_empty() {
            break;
        }
        if headers.len() >= MAX_HEADERS {
            return Err(RequestError::HeadTooLarge);
        }

        let (name, value) = line
            .split_once(':')
            .ok_or(RequestError::Malformed("header line"))?;
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| RequestError::Malformed("header name"))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| RequestError::Malformed("header value"))?;
        headers.append(name, value);
    }

    Ok(RequestHead {
        method,
        uri,
        version,
        headers,
    })
}

/// One CRLF- (or LF-) terminated line without its terminator.
///
/// `None` means end of stream before any byte of the line.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, RequestError> {
    let mut buf = Vec::new();
    let n = reader
        .by_ref()
        .take(MAX_LINE_BYTES + 1)
        .read_until(b'\n', &mut buf)?;

    if n == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') {
        return if n as u64 > MAX_LINE_BYTES {
            Err(RequestError::HeadTooLarge)
        } else {
            Err(RequestError::Malformed("connection closed mid-line"))
        };
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| RequestError::Malformed("non UTF-8 request head"))
}

#[derive(Debug, PartialEq, Eq)]
pub enum BodyLengthError {
    Missing,
    Invalid,
    Chunked,
}

/// The declared body length. Repeated headers must agree.
pub fn content_length(headers: &HeaderMap) -> Result<u64, BodyLengthError> {
    if headers.contains_key(TRANSFER_ENCODING) {
        return Err(BodyLengthError::Chunked);
    }

    let mut declared = None;
    for value in headers.get_all(CONTENT_LENGTH) {
        let len = value
            .to_str()
            .ok()
            .map(str::trim)
            // `1*DIGIT`; `parse` alone would also take a leading `+`.
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or(BodyLengthError::Invalid)?;

        match declared {
            Some(prev) if prev != len => return Err(BodyLengthError::Invalid),
            _ => declared = Some(len),
        }
    }

    declared.ok_or(BodyLengthError::Missing)
}

/// Read and drop exactly `len` body bytes. Returns how many arrived before
/// the peer stopped sending.
pub fn discard_body<R: Read>(reader: &mut R, len: u64) -> io::Result<u64> {
    io::copy(&mut reader.take(len), &mut io::sink())
}
