//! Field-level checks shared by the JSON and multipart handlers.

use sea_orm::ActiveEnum;

use crate::error::AppError;

/// Trimmed value of a required field; missing or blank is a 400.
pub fn required(field: &str, value: Option<&str>) -> Result<String, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))
}

/// A field that may be absent, but must not be blank when present.
pub fn non_empty(field: &str, value: Option<&str>) -> Result<Option<String>, AppError> {
    match value {
        None => Ok(None),
        Some(v) => required(field, Some(v)).map(Some),
    }
}

/// Trimmed value, with blanks collapsed to `None`.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parses a string-backed enum by its stored value.
pub fn parse_enum<E>(field: &str, raw: &str) -> Result<E, AppError>
where
    E: ActiveEnum<Value = String>,
{
    let raw = raw.trim().to_lowercase();
    E::try_from_value(&raw).map_err(|_| {
        let allowed: Vec<String> = E::values();
        AppError::BadRequest(format!(
            "{} must be one of: {}",
            field,
            allowed.join(", ")
        ))
    })
}

pub fn parse_optional_enum<E>(field: &str, raw: Option<&str>) -> Result<Option<E>, AppError>
where
    E: ActiveEnum<Value = String>,
{
    match optional(raw) {
        Some(v) => parse_enum(field, &v).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::file::FileType;
    use crate::entities::saved_file::SavedCategory;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("branch", Some("  CSE ")).unwrap(), "CSE");
        assert!(matches!(required("branch", Some("   ")), Err(AppError::BadRequest(_))));
        assert!(matches!(required("branch", None), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn non_empty_allows_absent_only() {
        assert_eq!(non_empty("year", None).unwrap(), None);
        assert!(non_empty("year", Some("")).is_err());
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(parse_enum::<FileType>("fileType", "PYQ").unwrap(), FileType::Pyq);
        assert_eq!(
            parse_enum::<SavedCategory>("category", "exam-prep").unwrap(),
            SavedCategory::ExamPrep
        );
        let err = parse_enum::<FileType>("fileType", "slides").unwrap_err();
        assert_eq!(err.to_string(), "fileType must be one of: notes, pyq");
    }
}
