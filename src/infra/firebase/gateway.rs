use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::entities::price::{PricePair, PriceTable};
use crate::usecase::ports::gateway::{FieldWrite, GatewayError, PriceGateway};

pub const DEFAULT_ROOT_PATH: &str = "deliveryPrices";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    /// Database URL, e.g. `https://<project>-default-rtdb.firebaseio.com`.
    pub database_url: String,
    pub auth_token: Option<String>,
    pub root_path: String,
    pub request_timeout_secs: u64,
}

/// Realtime-database REST client storing the table under `root_path`.
pub struct FirebaseGateway {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
    root: Vec<String>,
}

fn root_segments(root_path: &str) -> Vec<String> {
    root_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

const FORBIDDEN_KEY_CHARS: [char; 6] = ['/', '.', '#', '$', '[', ']'];

/// Region names become database keys; the database rejects these characters
/// and `/` would address a nested node in a multi-path update.
pub fn check_region_key(region: &str) -> Result<(), GatewayError> {
    if region.is_empty() {
        return Err(GatewayError::Storage(
            "region name cannot be an empty key".to_string(),
        ));
    }
    if let Some(ch) = region
        .chars()
        .find(|ch| FORBIDDEN_KEY_CHARS.contains(ch) || ch.is_control())
    {
        return Err(GatewayError::Storage(format!(
            "region name \"{region}\" contains {ch:?}, which cannot be stored"
        )));
    }
    Ok(())
}

/// Body of a multi-path PATCH on the database root: one
/// `"{root}/{region}/{field}"` key per write.
pub fn multi_write_body(
    root: &[String],
    writes: &[FieldWrite],
) -> Result<Map<String, Value>, GatewayError> {
    writes
        .iter()
        .map(|write| {
            check_region_key(&write.region)?;
            let mut path: Vec<&str> = root.iter().map(String::as_str).collect();
            path.push(&write.region);
            path.push(write.field.as_str());
            Ok((path.join("/"), Value::from(write.value)))
        })
        .collect()
}

fn lenient_price(region: &str, field: &str, value: Option<&Value>) -> u64 {
    match value {
        None | Some(Value::Null) => 0,
        Some(value) => {
            let parsed = value
                .as_u64()
                .or_else(|| value.as_str().and_then(|text| text.trim().parse().ok()));
            parsed.unwrap_or_else(|| {
                warn!(region, field, %value, "unreadable price, using 0");
                0
            })
        }
    }
}

/// Decodes the table node. `null` is an empty table; a region node that is
/// not an object is skipped, and an unreadable price reads as 0.
pub fn decode_table(body: Value) -> Result<PriceTable, GatewayError> {
    let nodes = match body {
        Value::Null => return Ok(PriceTable::new()),
        Value::Object(nodes) => nodes,
        other => {
            return Err(GatewayError::Decode(format!(
                "expected a price table object, got {other}"
            )))
        }
    };

    let mut table = PriceTable::new();
    for (region, node) in nodes {
        let Value::Object(fields) = node else {
            warn!(region = %region, "skipping region node that is not an object");
            continue;
        };
        let prices = PricePair::new(
            lenient_price(&region, "home", fields.get("home")),
            lenient_price(&region, "desk", fields.get("desk")),
        );
        table.insert(region, prices);
    }
    Ok(table)
}

impl FirebaseGateway {
    pub fn new(config: &FirebaseConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.database_url).map_err(|err| {
            GatewayError::Transport(format!(
                "invalid database url {}: {err}",
                config.database_url
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Transport(format!(
                "database url cannot be used as a base: {}",
                config.database_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| GatewayError::Transport(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            auth_token: config.auth_token.clone(),
            root: root_segments(&config.root_path),
        })
    }

    /// REST url for a node: every segment is percent-encoded and the last
    /// one carries the `.json` suffix.
    pub fn node_url(&self, extra: &[&str]) -> Url {
        let mut segments: Vec<&str> = self.root.iter().map(String::as_str).collect();
        segments.extend_from_slice(extra);
        self.url_for(&segments)
    }

    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            match segments.split_last() {
                Some((last, init)) => {
                    path.extend(init);
                    path.push(&format!("{last}.json"));
                }
                None => {
                    path.push(".json");
                }
            }
        }
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        url
    }

    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        Self::check(response).await
    }
}

#[async_trait]
impl PriceGateway for FirebaseGateway {
    async fn get_all(&self) -> Result<PriceTable, GatewayError> {
        let url = self.node_url(&[]);
        debug!(path = url.path(), "fetching price table");
        let response = self.send(self.client.get(url)).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))?;
        decode_table(body)
    }

    async fn set_region(&self, name: &str, prices: PricePair) -> Result<(), GatewayError> {
        check_region_key(name)?;
        let url = self.node_url(&[name]);
        self.send(self.client.put(url).json(&prices)).await?;
        Ok(())
    }

    async fn delete_region(&self, name: &str) -> Result<(), GatewayError> {
        check_region_key(name)?;
        let url = self.node_url(&[name]);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn bulk_set(&self, table: &PriceTable) -> Result<(), GatewayError> {
        for region in table.keys() {
            check_region_key(region)?;
        }
        let url = self.node_url(&[]);
        self.send(self.client.put(url).json(table)).await?;
        Ok(())
    }

    async fn atomic_multi_write(&self, writes: &[FieldWrite]) -> Result<(), GatewayError> {
        if writes.is_empty() {
            return Ok(());
        }
        let body = multi_write_body(&self.root, writes)?;
        let url = self.url_for(&[]);
        debug!(fields = body.len(), "sending multi-path update");
        self.send(self.client.patch(url).json(&body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::price::PriceField;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn gateway(auth_token: Option<&str>) -> FirebaseGateway {
        FirebaseGateway::new(&FirebaseConfig {
            database_url: "https://shop-default-rtdb.firebaseio.com/".to_string(),
            auth_token: auth_token.map(str::to_string),
            root_path: DEFAULT_ROOT_PATH.to_string(),
            request_timeout_secs: 5,
        })
        .expect("gateway should build")
    }

    #[test]
    fn region_urls_are_encoded_and_suffixed() {
        let url = gateway(None).node_url(&["Sidi Bel Abbès"]);

        assert_eq!(
            url.as_str(),
            "https://shop-default-rtdb.firebaseio.com/deliveryPrices/Sidi%20Bel%20Abb%C3%A8s.json"
        );
    }

    #[test]
    fn root_url_targets_database_root_with_auth() {
        let url = gateway(Some("secret")).url_for(&[]);

        assert_eq!(
            url.as_str(),
            "https://shop-default-rtdb.firebaseio.com/.json?auth=secret"
        );
    }

    #[test]
    fn multi_write_body_has_one_path_per_field() {
        let writes = vec![
            FieldWrite {
                region: "Oran".to_string(),
                field: PriceField::Home,
                value: 1200,
            },
            FieldWrite {
                region: "Oran".to_string(),
                field: PriceField::Desk,
                value: 450,
            },
        ];

        let body = multi_write_body(&root_segments("shop/deliveryPrices"), &writes)
            .expect("plain region names should be accepted");

        assert_eq!(body.len(), 2);
        assert_eq!(
            body.get("shop/deliveryPrices/Oran/home"),
            Some(&Value::from(1200_u64))
        );
        assert_eq!(
            body.get("shop/deliveryPrices/Oran/desk"),
            Some(&Value::from(450_u64))
        );
    }

    #[test]
    fn rejects_invalid_database_url() {
        let result = FirebaseGateway::new(&FirebaseConfig {
            database_url: "not a url".to_string(),
            auth_token: None,
            root_path: DEFAULT_ROOT_PATH.to_string(),
            request_timeout_secs: 5,
        });

        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }

    #[tokio::test]
    async fn slash_in_region_name_is_rejected_by_every_write_path() {
        let gateway = gateway(None);
        let write = FieldWrite {
            region: "Sidi/Bel".to_string(),
            field: PriceField::Home,
            value: 700,
        };

        assert!(matches!(
            multi_write_body(&root_segments(DEFAULT_ROOT_PATH), &[write.clone()]),
            Err(GatewayError::Storage(_))
        ));
        // Rejected before any request; the host is never contacted.
        assert!(matches!(
            gateway.atomic_multi_write(&[write]).await,
            Err(GatewayError::Storage(_))
        ));
        assert!(matches!(
            gateway
                .set_region("Sidi/Bel", PricePair::new(700, 400))
                .await,
            Err(GatewayError::Storage(_))
        ));
        assert!(matches!(
            gateway.delete_region("Sidi/Bel").await,
            Err(GatewayError::Storage(_))
        ));
        let mut table = PriceTable::new();
        table.insert("Sidi/Bel".to_string(), PricePair::new(700, 400));
        assert!(matches!(
            gateway.bulk_set(&table).await,
            Err(GatewayError::Storage(_))
        ));
    }

    #[test]
    fn region_keys_reject_database_reserved_characters() {
        for name in ["a.b", "a#b", "a$b", "a[b", "a]b", "a\nb", ""] {
            assert!(check_region_key(name).is_err(), "{name:?} should be rejected");
        }
        assert!(check_region_key("Sidi Bel Abbès").is_ok());
        assert!(check_region_key("إختر الولاية").is_ok());
    }

    #[test]
    fn null_or_empty_body_is_an_empty_table() {
        assert_eq!(decode_table(Value::Null), Ok(PriceTable::new()));
        assert_eq!(decode_table(json!({})), Ok(PriceTable::new()));
    }

    #[test]
    fn decode_table_reads_prices_leniently() {
        let table = decode_table(json!({
            "Oran": { "home": 650 },
            "Blida": { "home": "500", "desk": 2.5 },
            "Alger": { "home": 400, "desk": 250 },
            "broken": 12
        }))
        .expect("object body should decode");

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("Oran"), Some(&PricePair::new(650, 0)));
        assert_eq!(table.get("Blida"), Some(&PricePair::new(500, 0)));
        assert_eq!(table.get("Alger"), Some(&PricePair::new(400, 250)));
    }

    #[test]
    fn non_object_body_is_a_decode_error() {
        assert!(matches!(
            decode_table(json!([1, 2, 3])),
            Err(GatewayError::Decode(_))
        ));
        assert!(matches!(
            decode_table(json!("prices")),
            Err(GatewayError::Decode(_))
        ));
    }

    /// Serves one canned HTTP response on a local port and returns its url.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind local port");
        let addr = listener.local_addr().expect("should have local addr");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("should accept");
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.expect("should read request");
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("should write response");
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    fn local_gateway(database_url: String) -> FirebaseGateway {
        FirebaseGateway::new(&FirebaseConfig {
            database_url,
            auth_token: None,
            root_path: DEFAULT_ROOT_PATH.to_string(),
            request_timeout_secs: 5,
        })
        .expect("gateway should build")
    }

    #[tokio::test]
    async fn error_status_maps_to_status_error() {
        let url = serve_once("401 Unauthorized", r#"{"error":"Permission denied"}"#).await;

        let result = local_gateway(url).get_all().await;

        assert_eq!(
            result,
            Err(GatewayError::Status {
                status: 401,
                body: r#"{"error":"Permission denied"}"#.to_string(),
            })
        );
    }

    #[tokio::test]
    async fn null_response_loads_as_empty_table() {
        let url = serve_once("200 OK", "null").await;

        let table = local_gateway(url)
            .get_all()
            .await
            .expect("null body should load");

        assert!(table.is_empty());
    }
}
