use crate::utils::error::{Result, TeamError};

/// 參與者名稱的最大長度（以字元計）
pub const MAX_NAME_CHARS: usize = 20;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TeamError::validation(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(TeamError::validation(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TeamError::validation(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TeamError::validation(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Trims a participant name and checks it is 1 to 20 characters long.
pub fn normalize_name(raw: &str) -> Result<String> {
    validate_non_empty_string("name", raw)?;

    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if length > MAX_NAME_CHARS {
        return Err(TeamError::validation(
            "name",
            trimmed,
            format!(
                "Name must be at most {} characters (got {})",
                MAX_NAME_CHARS, length
            ),
        ));
    }

    Ok(trimmed.to_string())
}
