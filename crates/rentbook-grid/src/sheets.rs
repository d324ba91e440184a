//! Google Sheets v4 REST client.

use std::time::Duration;

use async_trait::async_trait;
use rentbook_core::SheetRange;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapter::{GridAdapter, Rows, WriteAck};
use crate::error::{GridError, Result};

/// Configuration for the Sheets client.
pub struct SheetsConfig {
    /// API root. Default: `https://sheets.googleapis.com/v4`.
    pub api_base: String,
    /// OAuth access token sent as a bearer token on every call.
    pub access_token: String,
    /// Per-request timeout. Default: 30 seconds.
    pub timeout: Duration,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://sheets.googleapis.com/v4".to_string(),
            access_token: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// A handle to the Sheets values API, built once at startup and shared.
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    api_base: Url,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct WriteBody<'a> {
    range: String,
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: &'a Rows,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    #[serde(default)]
    updates: WriteAck,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl SheetsClient {
    /// Build a client from configuration.
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let base = config.api_base.trim_end_matches('/');
        let api_base = Url::parse(base).map_err(|e| GridError::InvalidUrl {
            url: config.api_base.clone(),
            reason: e.to_string(),
        })?;
        if api_base.cannot_be_a_base() {
            return Err(GridError::InvalidUrl {
                url: config.api_base,
                reason: "not a base URL".into(),
            });
        }
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_base,
            access_token: config.access_token,
        })
    }

    /// `{base}/spreadsheets/{id}[/values/{last}]` with each segment escaped.
    fn url(&self, spreadsheet_id: &str, values_segment: Option<&str>) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("spreadsheets").push(spreadsheet_id);
            if let Some(last) = values_segment {
                segments.push("values").push(last);
            }
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });
        tracing::warn!(status = status.as_u16(), %message, "sheets api error");
        Err(GridError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl GridAdapter for SheetsClient {
    async fn get(&self, spreadsheet_id: &str, range: &SheetRange) -> Result<Rows> {
        let a1 = range.to_a1_string();
        tracing::debug!(range = %a1, "sheets get");

        let url = self.url(spreadsheet_id, Some(&a1));
        let response = self
            .send(self.client.get(url).query(&[("majorDimension", "ROWS")]))
            .await?;
        let body: ValueRange = response.json().await?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn append(
        &self,
        spreadsheet_id: &str,
        range: &SheetRange,
        rows: Rows,
    ) -> Result<WriteAck> {
        let a1 = range.to_a1_string();
        tracing::debug!(range = %a1, rows = rows.len(), "sheets append");

        let url = self.url(spreadsheet_id, Some(&format!("{a1}:append")));
        let body = WriteBody {
            range: a1,
            major_dimension: "ROWS",
            values: &rows,
        };
        let response = self
            .send(
                self.client
                    .post(url)
                    .query(&[
                        ("valueInputOption", "USER_ENTERED"),
                        ("insertDataOption", "OVERWRITE"),
                    ])
                    .json(&body),
            )
            .await?;
        let parsed: AppendResponse = response.json().await?;
        Ok(parsed.updates)
    }

    async fn update(
        &self,
        spreadsheet_id: &str,
        range: &SheetRange,
        rows: Rows,
    ) -> Result<WriteAck> {
        let a1 = range.to_a1_string();
        tracing::debug!(range = %a1, rows = rows.len(), "sheets update");

        let url = self.url(spreadsheet_id, Some(&a1));
        let body = WriteBody {
            range: a1,
            major_dimension: "ROWS",
            values: &rows,
        };
        let response = self
            .send(
                self.client
                    .put(url)
                    .query(&[("valueInputOption", "USER_ENTERED")])
                    .json(&body),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn list_sheets(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        tracing::debug!(spreadsheet_id, "sheets list");

        let url = self.url(spreadsheet_id, None);
        let response = self
            .send(
                self.client
                    .get(url)
                    .query(&[("fields", "sheets.properties.title")]),
            )
            .await?;
        let body: SpreadsheetResponse = response.json().await?;
        Ok(body.sheets.into_iter().map(|s| s.properties.title).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(base: &str) -> SheetsClient {
        SheetsClient::new(SheetsConfig {
            api_base: base.to_string(),
            access_token: "token".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_escapes_ranges() {
        let c = client("https://sheets.googleapis.com/v4/");
        let range = SheetRange::parse("'Flat 1'!A7:C").unwrap();
        let url = c.url("abc123", Some(&range.to_a1_string()));
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/'Flat%201'!A7:C"
        );

        let url = c.url("abc123", Some("Flat1!A7:append"));
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Flat1!A7:append"
        );

        let url = c.url("abc123", None);
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = SheetsClient::new(SheetsConfig {
            api_base: "not a url".into(),
            ..Default::default()
        });
        assert!(matches!(result, Err(GridError::InvalidUrl { .. })));
    }

    #[test]
    fn test_response_shapes() {
        let body: ValueRange = serde_json::from_str(
            r#"{"range":"S!A7:C9","majorDimension":"ROWS","values":[["01/2024",5000,null],[]]}"#,
        )
        .unwrap();
        let rows: Rows = body
            .values
            .into_iter()
            .map(|r| r.into_iter().map(cell_text).collect())
            .collect();
        assert_eq!(
            rows,
            vec![vec!["01/2024".to_string(), "5000".into(), "".into()], vec![]]
        );

        let empty: ValueRange = serde_json::from_str(r#"{"range":"S!A7:C"}"#).unwrap();
        assert!(empty.values.is_empty());

        let append: AppendResponse = serde_json::from_str(
            r#"{"spreadsheetId":"x","updates":{"updatedRange":"S!A9:C9","updatedRows":1,"updatedColumns":3,"updatedCells":3}}"#,
        )
        .unwrap();
        assert_eq!(append.updates, WriteAck { updated_rows: 1, updated_cells: 3 });

        let sheets: SpreadsheetResponse = serde_json::from_str(
            r#"{"sheets":[{"properties":{"title":"Summary"}},{"properties":{"title":"Flat-1"}}]}"#,
        )
        .unwrap();
        let names: Vec<_> = sheets.sheets.into_iter().map(|s| s.properties.title).collect();
        assert_eq!(names, vec!["Summary", "Flat-1"]);

        let err: ErrorEnvelope = serde_json::from_str(
            r#"{"error":{"code":400,"message":"Unable to parse range: Nope!A1","status":"INVALID_ARGUMENT"}}"#,
        )
        .unwrap();
        assert_eq!(err.error.message, "Unable to parse range: Nope!A1");
    }
}
