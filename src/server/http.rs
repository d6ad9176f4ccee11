// src/server/http.rs

//! Just enough HTTP/1.1 to serve a static directory to a local browser.

use std::path::{Component, Path, PathBuf};

use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: String,
    /// Raw request target, query string included.
    pub target: String,
}

impl RequestHead {
    /// Target without query string or fragment.
    pub fn path(&self) -> &str {
        self.target
            .split(['?', '#'])
            .next()
            .unwrap_or(&self.target)
    }
}

/// Parse the request line of `head` (`GET /x HTTP/1.1`).
pub fn parse_request_head(head: &str) -> Option<RequestHead> {
    let line = head.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") || !target.starts_with('/') {
        return None;
    }
    Some(RequestHead { method, target })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    Forbidden,
    NotFound,
}

/// Map a request path onto a file below `root`. Any `..` segment is
/// rejected; directories resolve to their `index.html`.
pub fn resolve_target(root: &Path, request_path: &str) -> Resolved {
    let Some(decoded) = percent_decode(request_path) else {
        return Resolved::NotFound;
    };

    let mut path = root.to_path_buf();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Resolved::Forbidden;
            }
        }
    }

    if path.is_dir() {
        path.push("index.html");
    }
    if path.is_file() {
        Resolved::File(path)
    } else {
        Resolved::NotFound
    }
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "txt" | "md" | "mustache" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

pub async fn write_response<W>(
    out: &mut W,
    status: u16,
    reason: &str,
    content_type: &str,
    body: &[u8],
    include_body: bool,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let head = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\
         Cache-Control: no-cache\r\nConnection: close\r\n\r\n",
        body.len()
    );
    out.write_all(head.as_bytes()).await?;
    if include_body {
        out.write_all(body).await?;
    }
    out.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_line() {
        let head = parse_request_head("GET /?p=atoms HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
        assert_eq!(head.method, "GET");
        assert_eq!(head.target, "/?p=atoms");
        assert_eq!(head.path(), "/");
        assert!(parse_request_head("garbage").is_none());
    }

    #[test]
    fn traversal_is_forbidden() {
        let root = Path::new("/srv/public");
        assert_eq!(resolve_target(root, "/../secret.txt"), Resolved::Forbidden);
        assert_eq!(resolve_target(root, "/css/%2e%2e/%2e%2e/x"), Resolved::Forbidden);
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type(Path::new("a/b.css")), "text/css; charset=utf-8");
        assert_eq!(content_type(Path::new("sprite.svg")), "image/svg+xml");
    }
}
