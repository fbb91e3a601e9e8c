use serde::{Deserialize, Serialize};

mod account;
mod destination;
mod preference;
mod trip;

pub use account::{Account, Session};
pub use destination::{Destination, DestinationRow, UserHistory};
pub use preference::{Feature, PreferenceInput};
pub use trip::{NewTrip, TripRegistration};

// ============================================================================
// Account API Types
// ============================================================================

/// Request to create an account
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Public view of an account
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
        }
    }
}

/// Login credentials; both fields are optional so blanks can be reported
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Issued session for a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub username: String,
}

// ============================================================================
// Trip API Types
// ============================================================================

/// Raw trip registration form
#[derive(Debug, Deserialize)]
pub struct TripRequest {
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub district: String,
    pub state: String,
    pub destination: String,
    pub travel_date: String,
}

/// Everyone registered for one destination
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub destination: String,
    pub travellers: Vec<TripRegistration>,
}

// ============================================================================
// Recommendation API Types
// ============================================================================

/// Collaborative picks plus the popularity estimate for the submitted scenario
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommended_destinations: Vec<Destination>,
    pub predicted_popularity: f64,
}
