//! HTTP collaborators: the Shlink REST API and the console's remote documents
//!
//! Requests are authenticated with the server's API key in `X-Api-Key`.
//! Any non-2xx response becomes [`Error::Api`], transport failures become
//! [`Error::Http`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use shlink_core::prelude::*;
use shlink_core::{Server, ServerData, ShortUrl, ShortUrlData, ShortUrlsList, TagStats, TagsList};

use crate::state::ShortUrlsListParams;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Result of `GET /rest/health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShortUrlsResponse {
    short_urls: ShortUrlsList,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse<T> {
    tags: DataEnvelope<T>,
}

#[derive(Debug, Deserialize)]
struct VersionDocument {
    version: String,
}

/// Remote calls made by background actions
#[trait_variant::make(ShlinkApi: Send)]
pub trait LocalShlinkApi {
    /// Check a server's health, returning its version
    async fn health(&self, server: &Server) -> Result<Health>;

    async fn list_short_urls(
        &self,
        server: &Server,
        params: &ShortUrlsListParams,
        items_per_page: u32,
    ) -> Result<ShortUrlsList>;

    /// Create a short URL, returning the stored record
    async fn create_short_url(&self, server: &Server, data: &ShortUrlData) -> Result<ShortUrl>;

    /// Tag names plus usage stats when the server provides them
    async fn list_tags(&self, server: &Server) -> Result<TagsList>;

    /// `servers.json`-style list used to seed an empty installation
    async fn fetch_servers(&self, url: &Url) -> Result<Vec<ServerData>>;

    /// Latest published console version
    async fn latest_version(&self, url: &Url) -> Result<String>;
}

/// reqwest-backed implementation
#[derive(Debug, Clone)]
pub struct HttpShlinkApi {
    client: Client,
}

impl HttpShlinkApi {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            client: build_client(timeout_ms),
        }
    }

    fn get(&self, server: &Server, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}/rest{}", server.base_url(), path))
            .header(API_KEY_HEADER, &server.api_key)
    }

    fn post(&self, server: &Server, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}/rest{}", server.base_url(), path))
            .header(API_KEY_HEADER, &server.api_key)
    }
}

/// Shared client construction; falls back to defaults if the builder fails
pub(crate) fn build_client(timeout_ms: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Query pairs for the short URLs endpoint
pub fn short_urls_query(params: &ShortUrlsListParams, items_per_page: u32) -> Vec<(String, String)> {
    let mut query = vec![
        ("page".to_string(), params.page.to_string()),
        ("itemsPerPage".to_string(), items_per_page.to_string()),
    ];
    if let Some(order) = params.order.to_query() {
        query.push(("orderBy".to_string(), order));
    }
    for tag in &params.tags {
        query.push(("tags[]".to_string(), tag.clone()));
    }
    if let Some(term) = params.search_term.as_deref().filter(|t| !t.trim().is_empty()) {
        query.push(("searchTerm".to_string(), term.trim().to_string()));
    }
    query
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        return Err(Error::api(status.as_u16(), body));
    }
    let bytes = response.bytes().await.map_err(http_error)?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) fn http_error(e: reqwest::Error) -> Error {
    Error::http(e.to_string())
}

impl ShlinkApi for HttpShlinkApi {
    async fn health(&self, server: &Server) -> Result<Health> {
        let response = self
            .get(server, "/health")
            .send()
            .await
            .map_err(http_error)?;
        read_json(response).await
    }

    async fn list_short_urls(
        &self,
        server: &Server,
        params: &ShortUrlsListParams,
        items_per_page: u32,
    ) -> Result<ShortUrlsList> {
        let response = self
            .get(server, "/v2/short-urls")
            .query(&short_urls_query(params, items_per_page))
            .send()
            .await
            .map_err(http_error)?;
        let body: ShortUrlsResponse = read_json(response).await?;
        Ok(body.short_urls)
    }

    async fn create_short_url(&self, server: &Server, data: &ShortUrlData) -> Result<ShortUrl> {
        let response = self
            .post(server, "/v2/short-urls")
            .json(data)
            .send()
            .await
            .map_err(http_error)?;
        read_json(response).await
    }

    async fn list_tags(&self, server: &Server) -> Result<TagsList> {
        let response = self
            .get(server, "/v2/tags")
            .send()
            .await
            .map_err(http_error)?;
        let tags: TagsResponse<String> = read_json(response).await?;

        // Stats are only served by newer servers
        let stats = match self.get(server, "/v2/tags/stats").send().await {
            Ok(response) => match read_json::<TagsResponse<TagStats>>(response).await {
                Ok(stats) => stats.tags.data,
                Err(e) => {
                    debug!("Tag stats unavailable for {}: {}", server.name, e);
                    Vec::new()
                }
            },
            Err(e) => {
                debug!("Tag stats request failed for {}: {}", server.name, e);
                Vec::new()
            }
        };

        let names = tags.tags.data.into_iter().map(|t| t.to_lowercase()).collect();
        Ok(TagsList::with_tags(names, stats))
    }

    async fn fetch_servers(&self, url: &Url) -> Result<Vec<ServerData>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_error)?;
        read_json(response).await
    }

    async fn latest_version(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_error)?;
        let doc: VersionDocument = read_json(response).await?;
        Ok(doc.version)
    }
}

#[cfg(test)]
mod tests {
    // Glob import would bring both trait variants into scope
    use super::{short_urls_query, HttpShlinkApi, ShlinkApi};
    use crate::state::ShortUrlsListParams;
    use serde_json::json;
    use shlink_core::{Error, Order, OrderDir, OrderableField, Server, ShortUrlData};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SHORT_URL: &str = r#"{"shortCode":"abc","shortUrl":"https://s.test/abc","longUrl":"https://example.com","dateCreated":"2024-01-02T03:04:05+00:00","visitsCount":7,"tags":["foo"],"title":null,"domain":null}"#;

    fn server(url: &str) -> Server {
        Server::new("s".into(), "S", url, "secret").unwrap()
    }

    fn json_response(status: u16, body: &str) -> ResponseTemplate {
        ResponseTemplate::new(status).set_body_raw(body.to_string(), "application/json")
    }

    #[test]
    fn test_short_urls_query() {
        let params = ShortUrlsListParams {
            page: 2,
            order: Order::new(OrderableField::Visits, OrderDir::Desc),
            tags: vec!["foo".into(), "bar".into()],
            search_term: Some("  ".into()),
        };
        let query = short_urls_query(&params, 20);
        assert!(query.contains(&("page".to_string(), "2".to_string())));
        assert!(query.contains(&("orderBy".to_string(), "visits-DESC".to_string())));
        assert_eq!(query.iter().filter(|(k, _)| k == "tags[]").count(), 2);
        assert!(!query.iter().any(|(k, _)| k == "searchTerm"));
    }

    #[test]
    fn test_unordered_query_has_no_order_by() {
        let query = short_urls_query(&ShortUrlsListParams::default(), 20);
        assert!(!query.iter().any(|(k, _)| k == "orderBy"));
    }

    #[tokio::test]
    async fn test_health_sends_api_key() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/health"))
            .and(header("X-Api-Key", "secret"))
            .respond_with(json_response(200, r#"{"status":"pass","version":"3.7.1"}"#))
            .expect(1)
            .mount(&mock)
            .await;
        let api = HttpShlinkApi::new(2_000);

        let health = api.health(&server(&mock.uri())).await.unwrap();

        assert_eq!(health.version, "3.7.1");
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/health"))
            .respond_with(json_response(401, r#"{"title":"Invalid API key"}"#))
            .mount(&mock)
            .await;
        let api = HttpShlinkApi::new(2_000);

        let err = api.health(&server(&mock.uri())).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 401, .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_list_short_urls_parses_envelope() {
        let mock = MockServer::start().await;
        let body = format!(
            r#"{{"shortUrls":{{"data":[{SHORT_URL}],"pagination":{{"currentPage":1,"pagesCount":1,"itemsPerPage":20,"itemsInCurrentPage":1,"totalItems":1}}}}}}"#
        );
        Mock::given(method("GET"))
            .and(path("/rest/v2/short-urls"))
            .and(query_param("page", "1"))
            .and(query_param("itemsPerPage", "20"))
            .and(header("X-Api-Key", "secret"))
            .respond_with(json_response(200, &body))
            .expect(1)
            .mount(&mock)
            .await;
        let api = HttpShlinkApi::new(2_000);

        let list = api
            .list_short_urls(&server(&mock.uri()), &ShortUrlsListParams::default(), 20)
            .await
            .unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].short_code, "abc");
        assert_eq!(list.pagination.total_items, 1);
    }

    #[tokio::test]
    async fn test_list_tags_tolerates_missing_stats() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v2/tags"))
            .respond_with(json_response(200, r#"{"tags":{"data":["Rust","go"]}}"#))
            .mount(&mock)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v2/tags/stats"))
            .respond_with(json_response(404, r#"{"title":"Not found"}"#))
            .mount(&mock)
            .await;
        let api = HttpShlinkApi::new(2_000);

        let tags = api.list_tags(&server(&mock.uri())).await.unwrap();

        assert_eq!(tags.tags, vec!["rust".to_string(), "go".to_string()]);
        assert!(tags.stats_for("rust").is_none());
    }

    #[tokio::test]
    async fn test_create_short_url_posts_payload() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v2/short-urls"))
            .and(header("X-Api-Key", "secret"))
            .and(body_json(json!({
                "longUrl": "https://example.com",
                "tags": ["foo"]
            })))
            .respond_with(json_response(200, SHORT_URL))
            .expect(1)
            .mount(&mock)
            .await;
        let api = HttpShlinkApi::new(2_000);
        let data = ShortUrlData {
            long_url: "https://example.com".to_string(),
            tags: vec!["foo".to_string()],
            title: None,
        };

        let created = api.create_short_url(&server(&mock.uri()), &data).await.unwrap();

        assert_eq!(created.short_url, "https://s.test/abc");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let api = HttpShlinkApi::new(500);
        let err = api.health(&server("http://127.0.0.1:9")).await.unwrap_err();
        assert!(matches!(err, Error::Http { .. }));
    }
}
