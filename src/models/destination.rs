use serde::{Deserialize, Serialize};

/// Reference record for a travel destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    pub id: u32,
    pub name: String,
    pub state: String,
    #[serde(rename = "type")]
    pub destination_type: String,
    pub popularity: f64,
    pub best_time_to_visit: String,
}

/// One historical rating a user gave a destination
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct UserHistory {
    #[serde(rename = "UserID")]
    pub user_id: u32,
    #[serde(rename = "DestinationID")]
    pub destination_id: u32,
    #[serde(rename = "ExperienceRating")]
    pub rating: f64,
}

// ============================================================================
// CSV Row Types
// ============================================================================

/// Raw row of the destinations reference table
#[derive(Debug, Clone, Deserialize)]
pub struct DestinationRow {
    #[serde(rename = "DestinationID")]
    pub id: u32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Type")]
    pub destination_type: String,
    #[serde(rename = "Popularity")]
    pub popularity: f64,
    #[serde(rename = "BestTimeToVisit")]
    pub best_time_to_visit: String,
}

impl From<DestinationRow> for Destination {
    fn from(row: DestinationRow) -> Self {
        Destination {
            id: row.id,
            name: row.name,
            state: row.state,
            destination_type: row.destination_type,
            popularity: row.popularity,
            best_time_to_visit: row.best_time_to_visit,
        }
    }
}
