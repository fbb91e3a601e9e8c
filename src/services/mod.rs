use crate::error::{AppError, AppResult};

pub mod accounts;
pub mod password;
pub mod recommend;
pub mod recommendations;
pub mod sessions;
pub mod trips;

pub use password::PasswordHasher;
pub use recommend::RecommenderContext;
pub use sessions::{InMemorySessionStore, SessionStore};

/// Trims a form field, rejecting blanks
pub fn required<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims_and_rejects_blanks() {
        assert_eq!(required("name", "  Meera ").unwrap(), "Meera");
        let err = required("phone", " \t").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref msg) if msg == "phone is required"));
    }
}
