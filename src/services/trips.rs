use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::{NewTrip, TripRegistration, TripRequest},
    services::required,
};

impl TryFrom<TripRequest> for NewTrip {
    type Error = AppError;

    fn try_from(request: TripRequest) -> AppResult<Self> {
        let travel_date = NaiveDate::parse_from_str(
            required("travel_date", &request.travel_date)?,
            "%Y-%m-%d",
        )
        .map_err(|_| {
            AppError::InvalidInput(format!(
                "travel_date must be YYYY-MM-DD, got '{}'",
                request.travel_date
            ))
        })?;

        Ok(NewTrip {
            name: required("name", &request.name)?.to_string(),
            phone: required("phone", &request.phone)?.to_string(),
            gender: required("gender", &request.gender)?.to_string(),
            district: required("district", &request.district)?.to_string(),
            state: required("state", &request.state)?.to_string(),
            destination: required("destination", &request.destination)?.to_string(),
            travel_date,
        })
    }
}

/// Stores a traveller's registration for a destination
pub async fn save_trip(pool: &SqlitePool, trip: NewTrip) -> AppResult<TripRegistration> {
    let created_at = Utc::now();
    let result = sqlx::query(
        "INSERT INTO trip_registrations \
         (name, phone, gender, district, state, destination, travel_date, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&trip.name)
    .bind(&trip.phone)
    .bind(&trip.gender)
    .bind(&trip.district)
    .bind(&trip.state)
    .bind(&trip.destination)
    .bind(trip.travel_date)
    .bind(created_at)
    .execute(pool)
    .await?;

    tracing::info!(
        registration_id = result.last_insert_rowid(),
        destination = %trip.destination,
        "Trip registered"
    );

    Ok(TripRegistration {
        id: result.last_insert_rowid(),
        name: trip.name,
        phone: trip.phone,
        gender: trip.gender,
        district: trip.district,
        state: trip.state,
        destination: trip.destination,
        travel_date: trip.travel_date,
        created_at,
    })
}

/// Everyone registered for a destination, in registration order
pub async fn group_for(pool: &SqlitePool, destination: &str) -> AppResult<Vec<TripRegistration>> {
    let travellers = sqlx::query_as::<_, TripRegistration>(
        "SELECT id, name, phone, gender, district, state, destination, travel_date, created_at \
         FROM trip_registrations WHERE destination = ? ORDER BY id",
    )
    .bind(destination)
    .fetch_all(pool)
    .await?;
    Ok(travellers)
}
