use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Traveller registered for a trip to a destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct TripRegistration {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub district: String,
    pub state: String,
    pub destination: String,
    pub travel_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Validated details for a new trip registration
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub district: String,
    pub state: String,
    pub destination: String,
    pub travel_date: NaiveDate,
}
