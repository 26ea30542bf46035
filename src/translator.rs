use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{ConvertError, Result};

pub const GOOGLE_TRANSLATE_BASE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Anything that can turn text in one language into another.
pub trait Translator {
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

/// Translator backed by the public Google Translate endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self::with_base_url(GOOGLE_TRANSLATE_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn request_url(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.base_url,
            &[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| ConvertError::Translation(format!("invalid translate url: {e}")))
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let url = self.request_url(text, source_lang, target_lang)?;
        debug!(%url, "requesting translation");

        let response = self
            .client
            .get(url)
            .header("User-Agent", "Mozilla/5.0")
            .send()
            .map_err(|e| ConvertError::Translation(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ConvertError::Translation(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .map_err(|e| ConvertError::Translation(format!("failed to read response body: {e}")))?;

        parse_translation_response(&body)
    }
}

/// Extract the translated text from a `translate_a/single` response.
///
/// The body is `[[["fragment", "source", ...], ...], ...]`; the first
/// element of every segment is joined in order.
pub fn parse_translation_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ConvertError::Translation(format!("malformed response: {e}")))?;

    let segments = match value.as_array().and_then(|outer| outer.first()) {
        Some(first) => first,
        None => {
            return Err(ConvertError::Translation(
                "no translated data in response".to_string(),
            ));
        }
    };

    let mut translated = String::new();
    if let Some(segments) = segments.as_array() {
        for segment in segments {
            if let Some(fragment) = segment
                .as_array()
                .and_then(|parts| parts.first())
                .and_then(Value::as_str)
            {
                translated.push_str(fragment);
            }
        }
    }

    if translated.is_empty() {
        return Err(ConvertError::Translation(
            "no translated data in response".to_string(),
        ));
    }

    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_parse_joins_segments_in_order() {
        let body = r#"[[["Hello ","こんにちは",null,null,10],["world","世界",null,null,10]],null,"ja"]"#;
        assert_eq!(parse_translation_response(body).unwrap(), "Hello world");
    }

    #[test]
    fn test_parse_skips_non_string_fragments() {
        let body = r#"[[[null,"x"],["Corporation.txt","株式会社.txt"]]]"#;
        assert_eq!(parse_translation_response(body).unwrap(), "Corporation.txt");
    }

    #[test]
    fn test_parse_rejects_empty_and_malformed() {
        assert!(parse_translation_response("[]").is_err());
        assert!(parse_translation_response("{}").is_err());
        assert!(parse_translation_response("<html>").is_err());
    }

    #[test]
    fn test_parse_rejects_response_without_fragments() {
        for body in ["[[]]", "[null]", r#"[[[null,"x"]]]"#] {
            assert!(matches!(
                parse_translation_response(body),
                Err(ConvertError::Translation(_))
            ));
        }
    }

    /// Serve exactly one canned HTTP response on a local port.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{addr}/translate_a/single")
    }

    fn local_translator(base_url: String) -> GoogleTranslator {
        GoogleTranslator {
            client: Client::builder().no_proxy().build().unwrap(),
            base_url,
        }
    }

    #[test]
    fn test_translate_against_local_server() {
        let url = serve_once(
            "HTTP/1.1 200 OK",
            r#"[[["Corporation.txt","株式会社.txt",null,null,10]],null,"ja"]"#,
        );
        let translator = local_translator(url);

        let translated = translator.translate("株式会社.txt", "ja", "en").unwrap();
        assert_eq!(translated, "Corporation.txt");
    }

    #[test]
    fn test_translate_reports_http_error_status() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error", "oops");
        let translator = local_translator(url);

        match translator.translate("株式会社.txt", "ja", "en") {
            Err(ConvertError::Translation(msg)) => assert!(msg.contains("500"), "{msg}"),
            other => panic!("expected translation error, got {other:?}"),
        }
    }

    #[test]
    fn test_translate_reports_unreachable_server() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let translator = local_translator(format!("http://{addr}/translate_a/single"));

        match translator.translate("株式会社.txt", "ja", "en") {
            Err(ConvertError::Translation(msg)) => assert!(msg.contains("request failed"), "{msg}"),
            other => panic!("expected translation error, got {other:?}"),
        }
    }

    #[test]
    fn test_request_url_encodes_query() {
        let translator = GoogleTranslator::new();
        let url = translator
            .request_url("hollo { +how+ are you }", "en", "hi")
            .unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("client".to_string(), "gtx".to_string())));
        assert!(pairs.contains(&("sl".to_string(), "en".to_string())));
        assert!(pairs.contains(&("tl".to_string(), "hi".to_string())));
        assert!(pairs.contains(&("q".to_string(), "hollo { +how+ are you }".to_string())));
        assert!(!url.as_str().contains(' '));
    }
}
