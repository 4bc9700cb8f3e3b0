//! Serves the embedded UI through a custom protocol.

use mime_guess::mime;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use wry::http::{header::CONTENT_TYPE, Response, StatusCode};

/// Name of the custom protocol the web view loads the UI from.
pub const PROTOCOL: &str = "dirpane";

/// UI files (`src/ui`) are embedded into the binary.
#[derive(RustEmbed)]
#[folder = "src/ui"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
pub struct UiAssets;

/// The URL of the entry page. Windows exposes custom protocols as
/// `http://<name>.localhost`.
pub fn entry_url() -> String {
    if cfg!(windows) {
        format!("http://{PROTOCOL}.localhost/index.html")
    } else {
        format!("{PROTOCOL}://localhost/index.html")
    }
}

/// Provides (Bytes, Content-Type) for a requested resource.
/// Unknown paths fall back to `index.html`.
pub fn load(path: &str) -> Option<(Cow<'static, [u8]>, String)> {
    let norm = normalize(path);
    if let Some(file) = UiAssets::get(&norm) {
        let ct = content_type(&norm);
        Some((file.data, ct))
    } else if norm != "index.html" {
        UiAssets::get("index.html").map(|f| (f.data, String::from("text/html; charset=utf-8")))
    } else {
        None
    }
}

/// Builds the HTTP response for a custom-protocol request path.
pub fn respond(path: &str) -> Response<Cow<'static, [u8]>> {
    match load(path) {
        Some((data, ct)) => {
            let mut response = Response::new(data);
            if let Ok(value) = ct.parse() {
                response.headers_mut().insert(CONTENT_TYPE, value);
            }
            response
        }
        None => {
            tracing::warn!("No embedded asset for {:?}", path);
            let mut response = Response::new(Cow::Borrowed(&b"not found"[..]));
            *response.status_mut() = StatusCode::NOT_FOUND;
            response
        }
    }
}

fn normalize(raw: &str) -> String {
    let p = raw.trim_start_matches('/').trim();
    if p.is_empty() {
        "index.html".into()
    } else {
        p.to_string()
    }
}

fn content_type(path: &str) -> String {
    let guess = mime_guess::from_path(path).first_or(mime::APPLICATION_OCTET_STREAM);
    match guess.type_() {
        mime::TEXT | mime::APPLICATION if guess.subtype() == mime::JAVASCRIPT => {
            "application/javascript; charset=utf-8".into()
        }
        mime::TEXT if guess.subtype() == mime::HTML => "text/html; charset=utf-8".into(),
        mime::TEXT if guess.subtype() == "css" => "text/css; charset=utf-8".into(),
        _ => guess.essence_str().to_string(),
    }
}
