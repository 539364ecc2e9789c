//! Best-effort metadata probe for URLs submitted to the embed catalogue.

use crate::context::Context;
use http::header::CONTENT_TYPE;
use labfed_logger::warn;
use scraper::{Html, Selector};
use serde::Serialize;

/// Responses larger than this are truncated before scraping.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Default, Clone, Serialize)]
pub struct UrlMetadata {
    pub url: String,
    pub error_retrieving: bool,
    pub status: Option<u16>,
    pub x_frame_options: Option<String>,
    pub content_type: Option<String>,
    pub name: String,
    pub description: String,
}

/// Scrape `<title>` and `<meta name="description">` out of an HTML body.
pub fn scrape_html(metadata: &mut UrlMetadata, body: &str) {
    let document = Html::parse_document(body);

    if let Ok(selector) = Selector::parse("title") {
        if let Some(title) = document.select(&selector).next() {
            metadata.name = title.text().collect::<String>().trim().to_string();
        }
    }

    if let Ok(selector) = Selector::parse(r#"meta[name="description"]"#) {
        if let Some(meta) = document.select(&selector).next() {
            if let Some(content) = meta.value().attr("content") {
                metadata.description = content.trim().to_string();
            }
        }
    }
}

/// Fetch a URL and record how suitable it is for framing. Network failures
/// set `error_retrieving` instead of failing the caller.
pub async fn get_url_metadata(ctx: &Context, url: &str) -> UrlMetadata {
    let mut metadata = UrlMetadata {
        url: url.to_string(),
        ..Default::default()
    };

    let mut response = match ctx
        .http_client
        .get(url)
        .timeout(ctx.config.metadata_timeout)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("failed to retrieve {}: {}", url, e);
            metadata.error_retrieving = true;
            return metadata;
        }
    };

    metadata.status = Some(response.status().as_u16());
    metadata.x_frame_options = response
        .headers()
        .get("x-frame-options")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_lowercase());
    metadata.content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_lowercase());

    let is_html = metadata
        .content_type
        .as_deref()
        .map_or(false, |content_type| content_type.contains("html"));
    if metadata.status != Some(200) || !is_html {
        return metadata;
    }

    let mut body = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                body.extend_from_slice(&chunk);
                if body.len() >= MAX_BODY_BYTES {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("failed to read body of {}: {}", url, e);
                metadata.error_retrieving = true;
                return metadata;
            }
        }
    }

    scrape_html(&mut metadata, &String::from_utf8_lossy(&body));

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_html() {
        let mut metadata = UrlMetadata::default();
        scrape_html(
            &mut metadata,
            r#"<html><head>
                <title> Periodic table </title>
                <meta name="description" content="An interactive periodic table">
            </head><body></body></html>"#,
        );
        assert_eq!(metadata.name, "Periodic table");
        assert_eq!(metadata.description, "An interactive periodic table");
    }

    #[test]
    fn test_scrape_html_without_metadata() {
        let mut metadata = UrlMetadata::default();
        scrape_html(&mut metadata, "<html><body>plain</body></html>");
        assert_eq!(metadata.name, "");
        assert_eq!(metadata.description, "");
    }
}
