//! Command-line and environment configuration

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use rentbook::{LedgerLayout, Rentbook, Target};
use rentbook_grid::{GridAdapter, MemoryGrid, Rows, SheetsClient, SheetsConfig};
use thiserror::Error;
use tracing::warn;

use crate::auth::TokenGate;
use crate::cors::CorsPolicy;
use crate::router::AppState;

const SUMMARY_HEADER: [&str; 7] = [
    "Floor",
    "Rent/Month",
    "Security Deposit",
    "Total Rent Collected",
    "Total Electricity Collected",
    "Rent Start Date",
    "Last Entry Date",
];

/// Errors found while turning configuration into a running service
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {0}; required by the sheets backend")]
    Missing(&'static str),

    #[error("summary unit counts must be at least 1")]
    NoSummaryUnits,

    #[error(transparent)]
    Grid(#[from] rentbook_grid::GridError),
}

/// Where ledger data lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Google Sheets values API
    Sheets,
    /// In-process grid; data is lost on exit
    Memory,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "rentbook")]
#[command(
    author,
    version,
    about = "REST API for rent and electricity ledgers kept in a spreadsheet"
)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "RENTBOOK_LISTEN", default_value = "0.0.0.0:3001")]
    pub listen: SocketAddr,

    /// Grid backend
    #[arg(long, env = "RENTBOOK_BACKEND", value_enum, default_value = "sheets")]
    pub backend: Backend,

    /// Production spreadsheet id
    #[arg(long, env = "SHEETS_ID", default_value = "")]
    pub spreadsheet_id: String,

    /// Demo spreadsheet id, selected by the demoLogin flag
    #[arg(long, env = "DEMO_SHEETS_ID")]
    pub demo_spreadsheet_id: Option<String>,

    /// OAuth access token for the Sheets API
    #[arg(long, env = "SHEETS_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    pub access_token: String,

    /// Sheets API root
    #[arg(long, env = "SHEETS_API_BASE", default_value = "https://sheets.googleapis.com/v4")]
    pub api_base: String,

    /// Timeout for each Sheets API call, in seconds
    #[arg(long, env = "SHEETS_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Bearer tokens accepted by the API (comma separated); none leaves it open
    #[arg(long = "api-token", env = "RENTBOOK_API_TOKENS", value_delimiter = ',', hide_env_values = true)]
    pub api_tokens: Vec<String>,

    /// Browser origins allowed in addition to http://localhost:<port> (comma separated)
    #[arg(
        long = "allowed-origin",
        env = "RENTBOOK_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "https://rent-directory.netlify.app"
    )]
    pub allowed_origins: Vec<String>,

    /// Path prefix the routes are mounted under
    #[arg(long, env = "RENTBOOK_ROUTE_PREFIX", default_value = "/rent")]
    pub route_prefix: String,

    /// Flat rows in the production summary sheet
    #[arg(long, env = "RENTBOOK_SUMMARY_UNITS", default_value = "5")]
    pub summary_units: u32,

    /// Flat rows in the demo summary sheet
    #[arg(long, env = "RENTBOOK_DEMO_SUMMARY_UNITS", default_value = "3")]
    pub demo_summary_units: u32,
}

impl Config {
    /// Check the combination of options before anything is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.summary_units == 0 || self.demo_summary_units == 0 {
            return Err(ConfigError::NoSummaryUnits);
        }
        if self.backend == Backend::Sheets {
            if self.spreadsheet_id.is_empty() {
                return Err(ConfigError::Missing("--spreadsheet-id / SHEETS_ID"));
            }
            if self.access_token.is_empty() {
                return Err(ConfigError::Missing("--access-token / SHEETS_ACCESS_TOKEN"));
            }
        }
        Ok(())
    }

    /// Build the grid client once; every service shares it
    pub fn grid(&self) -> Result<Arc<dyn GridAdapter>, ConfigError> {
        match self.backend {
            Backend::Sheets => {
                let client = SheetsClient::new(SheetsConfig {
                    api_base: self.api_base.clone(),
                    access_token: self.access_token.clone(),
                    timeout: Duration::from_secs(self.timeout_secs),
                })?;
                Ok(Arc::new(client))
            }
            Backend::Memory => Ok(Arc::new(self.local_grid())),
        }
    }

    /// An in-memory grid seeded with empty flats for each target
    fn local_grid(&self) -> MemoryGrid {
        let layout = LedgerLayout::default();
        let mut grid = seed(MemoryGrid::new(), &layout, &self.production_id(), self.summary_units);
        if let Some(id) = self.demo_id() {
            grid = seed(grid, &layout, id, self.demo_summary_units);
        }
        grid
    }

    fn demo_id(&self) -> Option<&str> {
        self.demo_spreadsheet_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Production spreadsheet id; the memory backend falls back to a fixed name
    fn production_id(&self) -> String {
        match (self.backend, self.spreadsheet_id.is_empty()) {
            (Backend::Memory, true) => "local".to_string(),
            _ => self.spreadsheet_id.clone(),
        }
    }

    /// Assemble the request state over `grid`
    pub fn state(&self, grid: Arc<dyn GridAdapter>) -> AppState {
        let mut book = Rentbook::new(
            grid,
            LedgerLayout::default(),
            Target::new(self.production_id(), self.summary_units),
        );
        match self.demo_id() {
            Some(id) => book = book.with_demo(Target::new(id, self.demo_summary_units)),
            None => warn!("no demo spreadsheet configured; demoLogin requests will be rejected"),
        }

        let gate = TokenGate::new(self.api_tokens.iter().map(|t| t.trim()));
        if gate.is_open() {
            warn!("no API tokens configured; every request is accepted");
        }

        AppState {
            book,
            gate,
            cors: CorsPolicy::new(
                self.allowed_origins
                    .iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect(),
            ),
            prefix: normalize_prefix(&self.route_prefix),
        }
    }
}

fn seed(grid: MemoryGrid, layout: &LedgerLayout, spreadsheet_id: &str, units: u32) -> MemoryGrid {
    let flats: Vec<String> = (1..=units).map(|i| format!("Flat-{}", i)).collect();

    let mut summary: Rows = vec![SUMMARY_HEADER.iter().map(|h| h.to_string()).collect()];
    summary.extend(flats.iter().map(|flat| vec![flat.clone()]));
    let report_header: Vec<String> = std::iter::once("Month".to_string())
        .chain(flats.iter().cloned())
        .collect();

    let mut grid = grid
        .with_sheet(spreadsheet_id, layout.summary_sheet.as_str(), summary)
        .with_sheet(spreadsheet_id, layout.report_sheet.as_str(), vec![report_header]);
    for flat in flats {
        grid = grid.with_sheet(spreadsheet_id, flat, Vec::new());
    }
    grid
}

/// `rent/` and `/rent/` both become `/rent`; `/` becomes empty
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("rentbook").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--backend", "memory"]);
        assert_eq!(config.listen.port(), 3001);
        assert_eq!(config.route_prefix, "/rent");
        assert_eq!((config.summary_units, config.demo_summary_units), (5, 3));
        assert!(config.validate().is_ok());
        assert_eq!(config.production_id(), "local");
    }

    #[tokio::test]
    async fn test_memory_backend_is_seeded() {
        let config = parse(&["--backend", "memory", "--demo-spreadsheet-id", "demo"]);
        let grid = config.grid().unwrap();

        let sheets = grid.list_sheets("local").await.unwrap();
        assert_eq!(
            sheets,
            vec!["Summary", "FinancialReport", "Flat-1", "Flat-2", "Flat-3", "Flat-4", "Flat-5"]
        );
        assert_eq!(grid.list_sheets("demo").await.unwrap().len(), 5);
    }

    #[test]
    fn test_sheets_backend_needs_credentials() {
        let config = parse(&["--backend", "sheets", "--spreadsheet-id", "abc"]);
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));

        let config = parse(&["--spreadsheet-id", "abc", "--access-token", "t"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lists_are_comma_separated() {
        let config = parse(&[
            "--backend",
            "memory",
            "--api-token",
            "a,b",
            "--allowed-origin",
            "https://one.example,https://two.example",
        ]);
        assert_eq!(config.api_tokens, vec!["a", "b"]);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/rent"), "/rent");
        assert_eq!(normalize_prefix("rent/"), "/rent");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }
}
