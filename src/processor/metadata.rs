//! Token metadata retrieval and normalization
//!
//! Best effort throughout: every failure (bad URI, HTTP error, timeout,
//! non-JSON body) yields `None` and the contract keeps going without metadata.

use crate::constants::UNNAMED_NFT;
use crate::logger::{self, LogTag};
use crate::types::{AttributeValue, NftAttribute, NftMetadata};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Anything that can turn a token URI into a metadata document
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, token_uri: &str) -> Option<NftMetadata>;
}

/// Rewrite `ipfs://` URIs onto an HTTP gateway, leaving other URIs untouched
pub fn resolve_ipfs(uri: &str, gateway: &str) -> String {
    match uri.strip_prefix("ipfs://") {
        Some(path) => {
            let path = path.strip_prefix("ipfs/").unwrap_or(path);
            format!("{}/{}", gateway.trim_end_matches('/'), path)
        }
        None => uri.to_string(),
    }
}

/// Decode an inline `data:application/json` URI
///
/// Supports `;base64,` payloads and plain JSON text after the comma.
pub fn decode_data_uri(uri: &str) -> Option<Value> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;

    if !header.starts_with("application/json") {
        return None;
    }

    if header.ends_with(";base64") {
        let bytes = general_purpose::STANDARD.decode(payload.trim()).ok()?;
        serde_json::from_slice(&bytes).ok()
    } else {
        serde_json::from_str(payload).ok()
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

fn parse_attribute(value: &Value) -> Option<NftAttribute> {
    let trait_type = value.get("trait_type")?.as_str()?.to_string();
    let value = match value.get("value")? {
        Value::String(s) => AttributeValue::Text(s.clone()),
        Value::Number(n) => AttributeValue::Number(n.as_f64()?),
        Value::Bool(b) => AttributeValue::Text(b.to_string()),
        _ => return None,
    };
    Some(NftAttribute { trait_type, value })
}

/// Normalize a raw metadata document
///
/// Returns `None` when the document is not a JSON object. Missing fields fall
/// back to `"Unnamed NFT"` / empty strings; malformed attributes are dropped.
pub fn parse_metadata(document: &Value, gateway: &str) -> Option<NftMetadata> {
    let object = document.as_object()?;

    let image = non_empty_str(object.get("image"))
        .map(|image| resolve_ipfs(image, gateway))
        .unwrap_or_default();

    let attributes = object
        .get("attributes")
        .and_then(|a| a.as_array())
        .map(|items| items.iter().filter_map(parse_attribute).collect())
        .unwrap_or_default();

    Some(NftMetadata {
        name: non_empty_str(object.get("name"))
            .unwrap_or(UNNAMED_NFT)
            .to_string(),
        description: non_empty_str(object.get("description"))
            .unwrap_or_default()
            .to_string(),
        image,
        attributes,
    })
}

/// Fetches metadata over HTTP(S), IPFS gateway or inline data URIs
pub struct HttpMetadataFetcher {
    client: Client,
    gateway: String,
    timeout: Duration,
}

impl HttpMetadataFetcher {
    pub fn new(timeout: Duration, gateway: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            gateway: gateway.to_string(),
            timeout,
        }
    }

    async fn fetch_document(&self, url: &str) -> Result<Value, String> {
        let request = async {
            let response = self
                .client
                .get(url)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| format!("request failed: {}", e))?;

            if !response.status().is_success() {
                return Err(format!("HTTP {}", response.status()));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| format!("invalid JSON: {}", e))
        };

        // The client timeout covers the connection; this bounds the body read too
        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| format!("timed out after {}ms", self.timeout.as_millis()))?
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataFetcher {
    async fn fetch_metadata(&self, token_uri: &str) -> Option<NftMetadata> {
        let document = if token_uri.starts_with("data:") {
            decode_data_uri(token_uri)
        } else {
            let url = resolve_ipfs(token_uri, &self.gateway);
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                logger::debug(
                    LogTag::Metadata,
                    &format!("Unsupported token URI scheme: {}", token_uri),
                );
                return None;
            }

            match self.fetch_document(&url).await {
                Ok(document) => Some(document),
                Err(e) => {
                    logger::debug(LogTag::Metadata, &format!("{}: {}", url, e));
                    None
                }
            }
        };

        document.and_then(|doc| parse_metadata(&doc, &self.gateway))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use crate::constants::DEFAULT_IPFS_GATEWAY;
    use serde_json::json;

    #[test]
    fn test_resolve_ipfs() {
        assert_eq!(
            resolve_ipfs("ipfs://QmHash/1.json", DEFAULT_IPFS_GATEWAY),
            "https://ipfs.io/ipfs/QmHash/1.json"
        );
        assert_eq!(
            resolve_ipfs("ipfs://ipfs/QmHash", DEFAULT_IPFS_GATEWAY),
            "https://ipfs.io/ipfs/QmHash"
        );
        assert_eq!(
            resolve_ipfs("https://example.com/1.json", DEFAULT_IPFS_GATEWAY),
            "https://example.com/1.json"
        );
    }

    #[test]
    fn test_parse_full_document() {
        let doc = json!({
            "name": "Pixel #4",
            "description": "A pixel",
            "image": "ipfs://QmImage",
            "attributes": [
                { "trait_type": "Background", "value": "Blue" },
                { "trait_type": "Level", "value": 3 },
                { "value": "orphan" }
            ]
        });

        let metadata = parse_metadata(&doc, DEFAULT_IPFS_GATEWAY).unwrap();
        assert_eq!(metadata.name, "Pixel #4");
        assert_eq!(metadata.image, "https://ipfs.io/ipfs/QmImage");
        assert_eq!(metadata.attributes.len(), 2);
        assert_eq!(metadata.attributes[1].value, AttributeValue::Number(3.0));
        assert!(metadata.has_image());
    }

    #[test]
    fn test_parse_defaults() {
        let metadata = parse_metadata(&json!({}), DEFAULT_IPFS_GATEWAY).unwrap();
        assert_eq!(metadata.name, UNNAMED_NFT);
        assert_eq!(metadata.description, "");
        assert_eq!(metadata.image, "");
        assert!(metadata.attributes.is_empty());
        assert!(!metadata.has_image());

        let doc = json!({ "name": "", "image": 7 });
        let metadata = parse_metadata(&doc, DEFAULT_IPFS_GATEWAY).unwrap();
        assert_eq!(metadata.name, UNNAMED_NFT);
        assert_eq!(metadata.image, "");
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(parse_metadata(&json!([1, 2]), DEFAULT_IPFS_GATEWAY).is_none());
        assert!(parse_metadata(&json!("text"), DEFAULT_IPFS_GATEWAY).is_none());
    }

    #[test]
    fn test_decode_data_uris() {
        let document = r#"{"name":"Onchain #1","image":"data:image/svg+xml;base64,AA=="}"#;
        let encoded = general_purpose::STANDARD.encode(document);
        let value = decode_data_uri(&format!("data:application/json;base64,{}", encoded)).unwrap();
        assert_eq!(value["name"], "Onchain #1");

        let value = decode_data_uri(r#"data:application/json;utf8,{"name":"Plain"}"#).unwrap();
        assert_eq!(value["name"], "Plain");

        assert!(decode_data_uri("data:text/plain,hello").is_none());
        assert!(decode_data_uri("data:application/json;base64,!!!").is_none());
    }

    #[tokio::test]
    async fn test_inline_uri_needs_no_network() {
        let fetcher = HttpMetadataFetcher::new(Duration::from_millis(50), DEFAULT_IPFS_GATEWAY);
        let uri = r#"data:application/json,{"name":"Inline","description":"d"}"#;

        let metadata = fetcher.fetch_metadata(uri).await.unwrap();
        assert_eq!(metadata.name, "Inline");
        assert_eq!(metadata.description, "d");
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_absent() {
        let fetcher = HttpMetadataFetcher::new(Duration::from_millis(50), DEFAULT_IPFS_GATEWAY);
        assert!(fetcher.fetch_metadata("ar://abc").await.is_none());
        assert!(fetcher.fetch_metadata("").await.is_none());
    }
}
