use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use stockify_api_types::{
    sales::{SalesEnvelope, SalesQuery},
    RawSaleRecord,
};
use stockify_charts::PeriodWindow;
use tracing::{debug, instrument};
use url::Url;

use crate::{config::AppConfig, error::AppResult, AppError};

/// Anything that can hand the charts a page of raw sales: the HTTP backend, a cache, a mock.
#[async_trait]
pub trait SalesDataService: Send + Sync {
    async fn fetch_sales(&self, query: SalesQuery) -> AppResult<Vec<RawSaleRecord>>;
}

/// Query covering the whole of `window`.
pub fn sales_query<Tz: TimeZone>(window: &PeriodWindow<Tz>, limit: u32) -> SalesQuery {
    SalesQuery {
        start_date: window.start.with_timezone(&Utc),
        end_date: window.end.with_timezone(&Utc),
        limit,
    }
}

pub struct HttpSalesService {
    client: Client,
    sales_url: Url,
    api_token: Option<String>,
}

impl HttpSalesService {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("stockify/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpSalesService {
            client,
            sales_url: sales_endpoint(&config.api_url)?,
            api_token: config.api_token.clone(),
        })
    }

    pub fn sales_url(&self) -> &Url {
        &self.sales_url
    }
}

/// `{api_url}/sales`, whether or not the configured URL ends in a slash.
fn sales_endpoint(api_url: &Url) -> Result<Url, url::ParseError> {
    let mut base = api_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("sales")
}

#[async_trait]
impl SalesDataService for HttpSalesService {
    #[instrument(skip(self))]
    async fn fetch_sales(&self, query: SalesQuery) -> AppResult<Vec<RawSaleRecord>> {
        let mut request = self.client.get(self.sales_url.clone()).query(&query);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status(status.as_u16()));
        }
        let envelope: SalesEnvelope = response.json().await?;
        let sales = envelope.into_result().into_std()?;
        debug!("fetched {} sales from {}", sales.len(), self.sales_url);
        Ok(sales)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::AppConfig;
    use stockify_api_types::{result::ApiError, PeriodKey};
    use stockify_charts::resolve_period;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    #[test]
    fn endpoint_joins_with_or_without_slash() {
        let with = Url::parse("https://stock.example.com/api/").unwrap();
        let without = Url::parse("https://stock.example.com/api").unwrap();
        assert_eq!(
            sales_endpoint(&with).unwrap().as_str(),
            "https://stock.example.com/api/sales"
        );
        assert_eq!(
            sales_endpoint(&without).unwrap().as_str(),
            "https://stock.example.com/api/sales"
        );
    }

    #[test]
    fn query_spans_the_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let query = sales_query(&resolve_period(PeriodKey::SevenDays, now), 500);
        assert_eq!(query.end_date, now);
        assert_eq!(
            query.start_date,
            Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap()
        );
        assert_eq!(query.limit, 500);
    }

    #[test]
    fn service_uses_configured_url() {
        let config = AppConfig::from_lookup(|key| {
            (key == "STOCKIFY_API_URL").then(|| "http://127.0.0.1:9/v1".to_string())
        })
        .unwrap();
        let service = HttpSalesService::new(&config).unwrap();
        assert_eq!(service.sales_url().as_str(), "http://127.0.0.1:9/v1/sales");
    }

    /// Accepts one connection on a local port, answers it with `status` and `body`, and
    /// hands back the raw request head.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let api_url = format!("http://{}/api", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });
        (api_url, server)
    }

    fn service_for(api_url: &str, token: Option<&str>) -> HttpSalesService {
        let config = AppConfig::from_lookup(|key| match key {
            "STOCKIFY_API_URL" => Some(api_url.to_string()),
            "STOCKIFY_API_TOKEN" => token.map(str::to_string),
            _ => None,
        })
        .unwrap();
        HttpSalesService::new(&config).unwrap()
    }

    fn week_query() -> SalesQuery {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        sales_query(&resolve_period(PeriodKey::SevenDays, now), 10)
    }

    #[tokio::test]
    async fn successful_envelope_yields_records() {
        let (api_url, server) = serve_once(
            "200 OK",
            r#"{"success":true,"data":{"sales":[{"createdAt":"2024-03-14T09:30:00Z","totalAmount":12.5}]}}"#,
        )
        .await;
        let sales = service_for(&api_url, None)
            .fetch_sales(week_query())
            .await
            .unwrap();
        assert_eq!(
            sales,
            vec![RawSaleRecord {
                created_at: "2024-03-14T09:30:00Z".to_string(),
                total_amount: 12.5,
            }]
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn request_carries_query_and_bearer_token() {
        let (api_url, server) =
            serve_once("200 OK", r#"{"success":true,"data":{"sales":[]}}"#).await;
        let sales = service_for(&api_url, Some("tok"))
            .fetch_sales(week_query())
            .await
            .unwrap();
        assert!(sales.is_empty());
        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /api/sales?startDate=2024-03-08T12%3A00%3A00Z&endDate=2024-03-15T12%3A00%3A00Z&limit=10 HTTP/1.1"
        );
        assert!(request
            .to_ascii_lowercase()
            .contains("authorization: bearer tok\r\n"));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (api_url, server) = serve_once("503 Service Unavailable", "{}").await;
        let result = service_for(&api_url, None).fetch_sales(week_query()).await;
        assert!(matches!(result, Err(AppError::Status(503))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn rejected_envelope_is_an_api_error() {
        let (api_url, server) = serve_once(
            "200 OK",
            r#"{"success":false,"message":"database offline"}"#,
        )
        .await;
        let result = service_for(&api_url, None).fetch_sales(week_query()).await;
        assert!(matches!(
            result,
            Err(AppError::Api(ApiError::Rejected(message))) if message == "database offline"
        ));
        server.await.unwrap();
    }
}
