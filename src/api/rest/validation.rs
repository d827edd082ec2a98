use crate::error::AppError;

pub fn required(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} cannot be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {max_len} characters"
        )));
    }

    Ok(trimmed.to_string())
}

/// Validates an optional replacement value from a partial update. Absent
/// values keep the stored one.
pub fn optional(
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Result<Option<String>, AppError> {
    value.map(|value| required(field, &value, max_len)).transpose()
}

pub fn email(value: &str) -> Result<String, AppError> {
    let value = required("email", value, 255)?;

    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(AppError::BadRequest(format!("{value} is not a valid email")));
    }

    Ok(value.to_lowercase())
}

pub fn weight(field: &str, value: f64) -> Result<f64, AppError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AppError::BadRequest(format!(
            "{field} must be within [0, 1], got {value}"
        )));
    }

    Ok(value)
}

pub fn rating(value: f64) -> Result<f64, AppError> {
    if !value.is_finite() || !(0.0..=5.0).contains(&value) {
        return Err(AppError::BadRequest(format!(
            "rating must be within [0, 5], got {value}"
        )));
    }

    Ok(value)
}
