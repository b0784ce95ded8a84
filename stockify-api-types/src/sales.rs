use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    result::{ApiError, ApiResult},
    RawSaleRecord,
};

/// Query sent to the sales endpoint. Serialized as `startDate`, `endDate`, `limit`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub limit: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesPage {
    #[serde(default)]
    pub sales: Vec<RawSaleRecord>,
}

/// The envelope the backend wraps every sales response in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SalesEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<SalesPage>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SalesEnvelope {
    /// Checks the envelope once so callers never have to look at `success` themselves.
    pub fn into_result(self) -> ApiResult<Vec<RawSaleRecord>> {
        match self {
            SalesEnvelope {
                success: false,
                message,
                ..
            } => ApiResult::Error(ApiError::Rejected(
                message.unwrap_or_else(|| "no message".to_string()),
            )),
            SalesEnvelope { data: None, .. } => ApiResult::Error(ApiError::MissingData),
            SalesEnvelope {
                data: Some(page), ..
            } => ApiResult::Ok(page.sales),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_envelope_yields_sales() {
        let envelope: SalesEnvelope = serde_json::from_str(
            r#"{
                "success": true,
                "data": { "sales": [
                    { "createdAt": "2024-01-05T10:00:00Z", "totalAmount": 100 },
                    { "createdAt": "not a date", "totalAmount": 50.5 }
                ] }
            }"#,
        )
        .unwrap();
        let sales = envelope.into_result().into_std().unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[1].total_amount, 50.5);
    }

    #[test]
    fn failed_envelope_keeps_message() {
        let envelope: SalesEnvelope =
            serde_json::from_str(r#"{ "success": false, "message": "token expired" }"#).unwrap();
        assert_eq!(
            envelope.into_result(),
            ApiResult::Error(ApiError::Rejected("token expired".to_string()))
        );
    }

    #[test]
    fn success_without_data_is_an_error() {
        let envelope: SalesEnvelope = serde_json::from_str(r#"{ "success": true }"#).unwrap();
        assert_eq!(
            envelope.into_result(),
            ApiResult::Error(ApiError::MissingData)
        );
    }

    #[test]
    fn query_serializes_camel_case() {
        let query = SalesQuery {
            start_date: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            end_date: DateTime::parse_from_rfc3339("2024-01-08T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            limit: 1000,
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["startDate"], "2024-01-01T00:00:00Z");
        assert_eq!(json["limit"], 1000);
    }
}
