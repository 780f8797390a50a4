use thiserror::Error;

/// The three entry fields exactly as typed in the shell, age included.
/// Parsing happens here, not in the shell and not in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub name: String,
    pub age: String,
    pub course: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecord {
    pub name: String,
    pub age: i64,
    pub course: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("age must be a non-negative whole number")]
    InvalidAge,
    #[error("course must not be empty")]
    EmptyCourse,
}

/// Checks fields in form order: name, then age, then course.
///
/// Age accepts ASCII digits only; no sign, no decimal point, no interior
/// whitespace. Leading/trailing whitespace is trimmed off every field
/// before checking.
pub fn validate(input: &FormInput) -> Result<ValidRecord, ValidationError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let age = input.age.trim();
    if age.is_empty() || !age.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidAge);
    }
    let age: i64 = age.parse().map_err(|_| ValidationError::InvalidAge)?;

    let course = input.course.trim();
    if course.is_empty() {
        return Err(ValidationError::EmptyCourse);
    }

    Ok(ValidRecord {
        name: name.to_string(),
        age,
        course: course.to_string(),
    })
}
