use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Text fields of a new report; photos travel separately as `gallery[]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportForm {
    pub title: String,
    pub description: String,
    /// Comma separated, e.g. "burglary, theft"
    pub tags: String,
    pub lat: String,
    pub lng: String,
}

impl ReportForm {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }
        parse_coordinate(&self.lat, 90.0, "Latitude")?;
        parse_coordinate(&self.lng, 180.0, "Longitude")?;
        Ok(())
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Key/value pairs in form order, trimmed; empty tags are dropped
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let tags = self.tag_list().join(", ");
        [
            ("title", self.title.trim()),
            ("description", self.description.trim()),
            ("tags", tags.as_str()),
            ("lat", self.lat.trim()),
            ("lng", self.lng.trim()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

fn parse_coordinate(value: &str, limit: f64, label: &str) -> Result<f64, AppError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be a number", label)))?;
    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(AppError::Validation(format!(
            "{} must be between -{} and {}",
            label, limit, limit
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ReportForm {
        ReportForm {
            title: " Broken streetlight ".to_string(),
            description: "Dark since Monday".to_string(),
            tags: "lighting, , safety".to_string(),
            lat: "52.52".to_string(),
            lng: "13.405".to_string(),
        }
    }

    #[test]
    fn test_valid_form_produces_trimmed_fields() {
        let form = form();
        assert!(form.validate().is_ok());
        let fields = form.to_fields();
        assert_eq!(fields[0], ("title".to_string(), "Broken streetlight".to_string()));
        assert_eq!(fields.len(), 5);
        assert_eq!(form.tag_list(), vec!["lighting", "safety"]);
        assert_eq!(fields[2], ("tags".to_string(), "lighting, safety".to_string()));
    }

    #[test]
    fn test_required_fields() {
        let mut f = form();
        f.title = "  ".to_string();
        assert!(matches!(f.validate(), Err(AppError::Validation(_))));

        let mut f = form();
        f.description.clear();
        assert!(matches!(f.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_coordinates_must_be_in_range() {
        let mut f = form();
        f.lat = "91".to_string();
        assert!(f.validate().is_err());

        let mut f = form();
        f.lng = "east".to_string();
        assert!(f.validate().is_err());

        let mut f = form();
        f.lng = "-180".to_string();
        assert!(f.validate().is_ok());
    }
}
