use async_trait::async_trait;
use fitbuddy_core::api::{CatalogGateway, ExerciseRecord, GatewayError};
use thiserror::Error;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Why a catalog request failed. Status and decode failures keep a short
/// preview of the body for the log line.
#[derive(Debug, Error)]
pub enum CatalogHttpError {
    #[error("catalog request to {url} timed out")]
    Timeout { url: String },
    #[error("cannot reach catalog at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog answered {status} for {url}: {preview}")]
    Status {
        status: u16,
        url: String,
        preview: String,
    },
    #[error("catalog response from {url} is not an exercise list: {source} | body={preview}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
        preview: String,
    },
}

impl CatalogHttpError {
    fn transport(err: reqwest::Error, url: &str) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            Self::Timeout { url }
        } else if err.is_connect() {
            Self::Connect { url, source: err }
        } else {
            Self::Transport { url, source: err }
        }
    }
}

impl From<CatalogHttpError> for GatewayError {
    fn from(err: CatalogHttpError) -> Self {
        match err {
            CatalogHttpError::Decode { .. } => GatewayError::Decode(err.to_string()),
            _ => GatewayError::Http(err.to_string()),
        }
    }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    match trimmed.char_indices().nth(BODY_PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

async fn parse_exercise_list(
    resp: reqwest::Response,
) -> Result<Vec<ExerciseRecord>, CatalogHttpError> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| CatalogHttpError::transport(err, &url))?;

    if !status.is_success() {
        return Err(CatalogHttpError::Status {
            status: status.as_u16(),
            url,
            preview: preview_body(&body),
        });
    }

    // 空响应按空列表处理，由上层换成内置列表
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str::<Vec<ExerciseRecord>>(&body).map_err(|source| {
        CatalogHttpError::Decode {
            url,
            source,
            preview: preview_body(&body),
        }
    })
}

/// Remote exercise catalog (`GET {base}/exercises`).
#[derive(Clone)]
pub struct HttpCatalogGateway {
    api_key: String,
    http: reqwest::Client,
    url_exercises: String,
}

impl HttpCatalogGateway {
    pub fn new(base_url: String, api_key: String, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        let normalized = base_url.trim_end_matches('/');
        Ok(Self {
            api_key,
            http,
            url_exercises: format!("{}/exercises", normalized),
        })
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.trim().is_empty() {
            req
        } else {
            req.header("X-Api-Key", &self.api_key)
        }
    }

    async fn get_list(
        &self,
        query: &[(&str, String)],
    ) -> Result<Vec<ExerciseRecord>, CatalogHttpError> {
        let url = &self.url_exercises;
        let req = self.http.get(url).query(query);
        let resp = self
            .auth(req)
            .send()
            .await
            .map_err(|err| CatalogHttpError::transport(err, url))?;
        parse_exercise_list(resp).await
    }
}

#[async_trait]
impl CatalogGateway for HttpCatalogGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_by_muscle_group(
        &self,
        muscle: &str,
        offset: u32,
    ) -> Result<Vec<ExerciseRecord>, GatewayError> {
        tracing::debug!(
            target: "fitbuddy.catalog",
            stage = "catalog.http.muscle.in",
            url = %self.url_exercises,
            muscle = %muscle,
            offset = offset
        );
        let list = self
            .get_list(&[("muscle", muscle.to_string()), ("offset", offset.to_string())])
            .await?;
        tracing::debug!(
            target: "fitbuddy.catalog",
            stage = "catalog.http.muscle.out",
            count = list.len()
        );
        Ok(list)
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Option<ExerciseRecord>, GatewayError> {
        tracing::debug!(
            target: "fitbuddy.catalog",
            stage = "catalog.http.name.in",
            name = %name
        );
        let list = self.get_list(&[("name", name.to_string())]).await?;
        Ok(list.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const CURL: &str = r#"[{"name":"Incline Hammer Curls","type":"strength","muscle":"biceps","equipment":"dumbbell","difficulty":"beginner","instructions":"Seat yourself on an incline bench."}]"#;

    #[tokio::test]
    async fn test_fetch_by_muscle_sends_query_and_key() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/exercises")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("muscle".into(), "biceps".into()),
                Matcher::UrlEncoded("offset".into(), "10".into()),
            ]))
            .match_header("x-api-key", "secret")
            .with_status(200)
            .with_body(CURL)
            .create_async()
            .await;

        let gw = HttpCatalogGateway::new(server.url(), "secret".to_string(), 1_000).unwrap();
        let list = gw.fetch_by_muscle_group("biceps", 10).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Incline Hammer Curls");
        assert_eq!(list[0].equipment.as_deref(), Some("dumbbell"));
    }

    #[tokio::test]
    async fn test_key_header_absent_when_empty() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/exercises")
            .match_query(Matcher::Any)
            .match_header("x-api-key", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let gw = HttpCatalogGateway::new(format!("{}/", server.url()), String::new(), 1_000)
            .unwrap();
        assert!(gw.fetch_by_muscle_group("chest", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_error_classified() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/exercises")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("upstream down")
            .create_async()
            .await;

        let gw = HttpCatalogGateway::new(server.url(), String::new(), 1_000).unwrap();
        let err = gw
            .get_list(&[("muscle", "biceps".to_string())])
            .await
            .unwrap_err();
        match &err {
            CatalogHttpError::Status {
                status,
                url,
                preview,
            } => {
                assert_eq!(*status, 502);
                assert!(url.contains("/exercises"));
                assert_eq!(preview, "upstream down");
            }
            other => panic!("unexpected error: {other}"),
        }

        let mapped = gw.fetch_by_muscle_group("biceps", 0).await.unwrap_err();
        assert!(matches!(mapped, GatewayError::Http(_)));
    }

    #[tokio::test]
    async fn test_decode_error_classified() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/exercises")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{\"error\":\"not a list\"}")
            .create_async()
            .await;

        let gw = HttpCatalogGateway::new(server.url(), String::new(), 1_000).unwrap();
        let err = gw.fetch_by_muscle_group("biceps", 0).await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_by_name_first_match() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/exercises")
            .match_query(Matcher::UrlEncoded(
                "name".into(),
                "Incline Hammer Curls".into(),
            ))
            .with_status(200)
            .with_body(CURL)
            .create_async()
            .await;

        let gw = HttpCatalogGateway::new(server.url(), String::new(), 1_000).unwrap();
        let rec = gw.fetch_by_name("Incline Hammer Curls").await.unwrap();
        assert_eq!(rec.unwrap().muscle.as_deref(), Some("biceps"));
    }

    #[tokio::test]
    async fn test_connect_error_classified() {
        // 端口 9 上通常没有服务
        let gw = HttpCatalogGateway::new("http://127.0.0.1:9".to_string(), String::new(), 500)
            .unwrap();
        let err = gw.get_list(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogHttpError::Connect { .. } | CatalogHttpError::Timeout { .. }
        ));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.len(), BODY_PREVIEW_LIMIT + 3);
        assert_eq!(preview_body(" short "), "short");
        assert_eq!(preview_body("   "), "<empty body>");
    }
}
