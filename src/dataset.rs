//! Static player datasets.
//!
//! Both datasets are JSON arrays of flat records read once during startup.
//! A missing or corrupt file leaves that league empty instead of stopping
//! the server; searches against it simply return nothing.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::config::DatasetConfig;

/// One player row. Field order and casing are kept as loaded.
pub type PlayerRecord = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    Nba,
    Nfl,
}

impl League {
    /// The record field holding the player's display name.
    pub fn name_field(self) -> &'static str {
        match self {
            League::Nba => "player",
            League::Nfl => "player_name",
        }
    }

    /// NFL rows are weekly, so one player appears many times.
    pub fn dedupes_names(self) -> bool {
        matches!(self, League::Nfl)
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            League::Nba => write!(f, "NBA"),
            League::Nfl => write!(f, "NFL"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} does not contain a JSON array")]
    NotAnArray { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Dataset {
    league: League,
    records: Vec<PlayerRecord>,
}

impl Dataset {
    pub fn new(league: League, records: Vec<PlayerRecord>) -> Self {
        Self { league, records }
    }

    pub fn empty(league: League) -> Self {
        Self::new(league, Vec::new())
    }

    pub fn league(&self) -> League {
        self.league
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Display name of a record, if it has a non-empty string one.
    pub fn name_of<'a>(&self, record: &'a PlayerRecord) -> Option<&'a str> {
        record
            .get(self.league.name_field())
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Parse a dataset from JSON text. Array elements that are not objects are dropped.
    pub fn from_json(league: League, path: &Path, text: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(text).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let Value::Array(items) = value else {
            return Err(DatasetError::NotAnArray {
                path: path.to_path_buf(),
            });
        };

        let total = items.len();
        let records: Vec<PlayerRecord> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();

        let skipped = total - records.len();
        if skipped > 0 {
            warn!(
                league = %league,
                path = %path.display(),
                skipped,
                "Dropped non-object entries from dataset"
            );
        }

        Ok(Self::new(league, records))
    }
}

/// Read and parse one dataset file.
pub async fn load_dataset(league: League, path: &Path) -> Result<Dataset, DatasetError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Dataset::from_json(league, path, &text)
}

/// Load a dataset, logging any failure and falling back to an empty one.
#[instrument(skip_all, fields(league = %league, path = %path.display()))]
pub async fn load_or_empty(league: League, path: &Path) -> Dataset {
    match load_dataset(league, path).await {
        Ok(dataset) => {
            info!(records = dataset.len(), "Loaded {league} players");
            dataset
        }
        Err(e) => {
            error!(error = %e, "Failed to load {league} dataset; searches will return nothing");
            Dataset::empty(league)
        }
    }
}

/// Both leagues' datasets. Immutable once built.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    nba: Dataset,
    nfl: Dataset,
}

impl DatasetStore {
    pub fn new(nba: Dataset, nfl: Dataset) -> Self {
        Self { nba, nfl }
    }

    pub fn empty() -> Self {
        Self::new(Dataset::empty(League::Nba), Dataset::empty(League::Nfl))
    }

    pub async fn load(config: &DatasetConfig) -> Self {
        let (nba, nfl) = tokio::join!(
            load_or_empty(League::Nba, Path::new(&config.nba_path)),
            load_or_empty(League::Nfl, Path::new(&config.nfl_path)),
        );
        Self::new(nba, nfl)
    }

    pub fn get(&self, league: League) -> &Dataset {
        match league {
            League::Nba => &self.nba,
            League::Nfl => &self.nfl,
        }
    }

    pub fn nba(&self) -> &Dataset {
        &self.nba
    }

    pub fn nfl(&self) -> &Dataset {
        &self.nfl
    }
}
