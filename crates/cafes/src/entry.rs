use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crudapps_core::form::{not_blank, one_of, required_url};
use crudapps_core::DomainError;

pub const COFFEE_CHOICES: &[&str] = &["☕", "☕☕", "☕☕☕", "☕☕☕☕", "☕☕☕☕☕"];
pub const WIFI_CHOICES: &[&str] = &["✘", "💪", "💪💪", "💪💪💪", "💪💪💪💪", "💪💪💪💪💪"];
pub const POWER_CHOICES: &[&str] = &["✘", "🔌", "🔌🔌", "🔌🔌🔌", "🔌🔌🔌🔌", "🔌🔌🔌🔌🔌"];

/// Column headings of the directory file, in record order.
pub const HEADER: [&str; 7] = [
    "Cafe Name",
    "Location",
    "Open",
    "Close",
    "Coffee",
    "Wifi",
    "Power",
];

/// One row of the cafe directory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CafeEntry {
    pub name: String,
    pub location_url: String,
    pub open_time: String,
    pub close_time: String,
    pub coffee_rating: String,
    pub wifi_rating: String,
    pub power_rating: String,
}

impl CafeEntry {
    /// Field list in file column order.
    pub fn to_record(&self) -> [&str; 7] {
        [
            &self.name,
            &self.location_url,
            &self.open_time,
            &self.close_time,
            &self.coffee_rating,
            &self.wifi_rating,
            &self.power_rating,
        ]
    }

    /// Rebuild an entry from file columns. Short rows yield `None`; extra
    /// trailing columns are ignored.
    pub fn from_record<'a>(fields: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut it = fields.into_iter().map(|f| f.trim().to_string());
        Some(Self {
            name: it.next()?,
            location_url: it.next()?,
            open_time: it.next()?,
            close_time: it.next()?,
            coffee_rating: it.next()?,
            wifi_rating: it.next()?,
            power_rating: it.next()?,
        })
    }

    /// The map URL, when it is an absolute http(s) link.
    ///
    /// Rows already in the file were never validated, so the page must not
    /// turn anything else into a link.
    pub fn map_link(&self) -> Option<&str> {
        required_url(&self.location_url).ok()?;
        Some(self.location_url.trim())
    }
}

fn coffee_choice(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    one_of(value, COFFEE_CHOICES)
}

fn wifi_choice(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    one_of(value, WIFI_CHOICES)
}

fn power_choice(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    one_of(value, POWER_CHOICES)
}

/// Submission form for a new directory entry.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct CafeForm {
    #[validate(custom(function = "not_blank"))]
    pub cafe: String,
    #[validate(custom(function = "required_url"))]
    pub location_url: String,
    #[validate(custom(function = "not_blank"))]
    pub open_time: String,
    #[validate(custom(function = "not_blank"))]
    pub close_time: String,
    #[validate(custom(function = "coffee_choice"))]
    pub coffee_rating: String,
    #[validate(custom(function = "wifi_choice"))]
    pub wifi_rating: String,
    #[validate(custom(function = "power_choice"))]
    pub power_rating: String,
}

impl CafeForm {
    /// Validate and turn the submission into a directory entry.
    pub fn into_entry(self) -> Result<CafeEntry, DomainError> {
        self.validate()?;
        Ok(CafeEntry {
            name: self.cafe.trim().to_string(),
            location_url: self.location_url.trim().to_string(),
            open_time: self.open_time.trim().to_string(),
            close_time: self.close_time.trim().to_string(),
            coffee_rating: self.coffee_rating,
            wifi_rating: self.wifi_rating,
            power_rating: self.power_rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CafeForm {
        CafeForm {
            cafe: " Lighthaus ".to_string(),
            location_url: "https://goo.gl/maps/2EvhB4oq4gyUXKXx9".to_string(),
            open_time: "11AM".to_string(),
            close_time: "3:30PM".to_string(),
            coffee_rating: "☕☕☕☕".to_string(),
            wifi_rating: "💪💪".to_string(),
            power_rating: "🔌🔌🔌".to_string(),
        }
    }

    #[test]
    fn valid_form_becomes_trimmed_entry() {
        let entry = valid_form().into_entry().unwrap();
        assert_eq!(entry.name, "Lighthaus");
        assert_eq!(entry.to_record()[4], "☕☕☕☕");
    }

    #[test]
    fn missing_fields_and_bad_url_are_reported_per_field() {
        let form = CafeForm {
            cafe: String::new(),
            location_url: "goo.gl/maps".to_string(),
            ..valid_form()
        };
        match form.into_entry().unwrap_err() {
            DomainError::Form(errors) => {
                assert!(errors.get("cafe").is_some());
                assert!(errors.get("location_url").is_some());
                assert!(errors.get("open_time").is_none());
            }
            other => panic!("Expected Form error, got {other:?}"),
        }
    }

    #[test]
    fn ratings_outside_the_choice_set_are_rejected() {
        let form = CafeForm {
            wifi_rating: "excellent".to_string(),
            ..valid_form()
        };
        match form.into_entry().unwrap_err() {
            DomainError::Form(errors) => assert!(errors.get("wifi_rating").is_some()),
            other => panic!("Expected Form error, got {other:?}"),
        }
    }

    #[test]
    fn from_record_trims_legacy_padding_and_rejects_short_rows() {
        let entry = CafeEntry::from_record([
            "Lighthaus",
            " https://goo.gl/maps/x",
            " 11AM",
            " 3:30PM",
            " ☕☕☕☕",
            " 💪💪",
            " 🔌🔌🔌",
        ])
        .unwrap();
        assert_eq!(entry.location_url, "https://goo.gl/maps/x");
        assert_eq!(entry.power_rating, "🔌🔌🔌");

        assert!(CafeEntry::from_record(["only", "three", "fields"]).is_none());
    }

    #[test]
    fn only_http_locations_become_map_links() {
        let entry = valid_form().into_entry().unwrap();
        assert_eq!(entry.map_link(), Some("https://goo.gl/maps/2EvhB4oq4gyUXKXx9"));

        for location in ["javascript:alert(1)", "goo.gl/maps", "", "ftp://example.com/x"] {
            let entry = CafeEntry {
                location_url: location.to_string(),
                ..entry.clone()
            };
            assert_eq!(entry.map_link(), None, "{location}");
        }
    }
}
