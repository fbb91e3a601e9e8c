use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::models::{Destination, DestinationRow, UserHistory};

use super::{
    encoders::FeatureEncoders,
    model::{FeatureOrder, ModelArtifact, PopularityModel},
};

/// Failures while reading the startup artifacts
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid artifact: {0}")]
    Invalid(String),
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Destination reference table with id lookup
#[derive(Debug, Clone, Default)]
pub struct DestinationTable {
    destinations: Vec<Destination>,
    by_id: HashMap<u32, usize>,
}

impl DestinationTable {
    /// Builds the table, rejecting repeated destination ids
    pub fn new(destinations: Vec<Destination>) -> Result<Self, LoadError> {
        let mut by_id = HashMap::with_capacity(destinations.len());
        for (index, destination) in destinations.iter().enumerate() {
            if by_id.insert(destination.id, index).is_some() {
                return Err(LoadError::Invalid(format!(
                    "duplicate destination id {}",
                    destination.id
                )));
            }
        }
        Ok(Self {
            destinations,
            by_id,
        })
    }

    pub fn get(&self, id: u32) -> Option<&Destination> {
        self.by_id.get(&id).and_then(|&i| self.destinations.get(i))
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

/// Parses the destinations CSV; columns beyond the reference fields are ignored
pub fn read_destinations<R: Read>(reader: R) -> Result<DestinationTable, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let destinations = csv_reader
        .deserialize::<DestinationRow>()
        .map(|row| row.map(Destination::from))
        .collect::<Result<Vec<_>, _>>()?;
    DestinationTable::new(destinations)
}

/// Parses the user-history CSV; columns beyond the rating fields are ignored
///
/// Ratings must be finite.
pub fn read_history<R: Read>(reader: R) -> Result<Vec<UserHistory>, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let records = csv_reader
        .deserialize::<UserHistory>()
        .collect::<Result<Vec<_>, _>>()?;

    if let Some((index, record)) = records
        .iter()
        .enumerate()
        .find(|(_, record)| !record.rating.is_finite())
    {
        return Err(LoadError::Invalid(format!(
            "history row {} (user {}, destination {}) has non-finite rating {}",
            index + 1,
            record.user_id,
            record.destination_id,
            record.rating
        )));
    }
    Ok(records)
}

pub fn load_destinations(path: &Path) -> Result<DestinationTable, LoadError> {
    let table = read_destinations(open(path)?)?;
    tracing::info!(path = %path.display(), destinations = table.len(), "Destinations loaded");
    Ok(table)
}

pub fn load_history(path: &Path) -> Result<Vec<UserHistory>, LoadError> {
    let records = read_history(open(path)?)?;
    tracing::info!(path = %path.display(), records = records.len(), "User history loaded");
    Ok(records)
}

/// Reads label vocabularies from `{ "<feature>": ["label", ...] }`
pub fn load_encoders(path: &Path) -> Result<FeatureEncoders, LoadError> {
    let vocabularies: BTreeMap<String, Vec<String>> = serde_json::from_reader(open(path)?)?;
    let encoders = FeatureEncoders::from_vocabularies(vocabularies)?;
    tracing::info!(path = %path.display(), features = encoders.len(), "Label encoders loaded");
    Ok(encoders)
}

/// Reads and validates the popularity model artifact
pub fn load_model(path: &Path) -> Result<(Box<dyn PopularityModel>, FeatureOrder), LoadError> {
    let artifact: ModelArtifact = serde_json::from_reader(open(path)?)?;
    let loaded = artifact.build()?;
    tracing::info!(path = %path.display(), model = loaded.0.name(), "Popularity model loaded");
    Ok(loaded)
}
