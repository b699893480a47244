use serde::{Deserialize, Serialize};
use validator::Validate;

use crudapps_core::form::{flag_value, not_blank, parse_flag, required_url};
use crudapps_core::{DomainError, Entity, RecordId};

/// A cafe row as stored and served by the JSON API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cafe {
    pub id: RecordId,
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

impl Entity for Cafe {
    const TABLE: &'static str = "cafe";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// A cafe that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

impl NewCafe {
    pub fn with_id(self, id: RecordId) -> Cafe {
        Cafe {
            id,
            name: self.name,
            map_url: self.map_url,
            img_url: self.img_url,
            location: self.location,
            seats: self.seats,
            has_toilet: self.has_toilet,
            has_wifi: self.has_wifi,
            has_sockets: self.has_sockets,
            can_take_calls: self.can_take_calls,
            coffee_price: self.coffee_price,
        }
    }
}

/// Form-encoded body of `POST /add`.
///
/// Flags follow checkbox conventions: absent or empty is `false`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct AddCafeForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "required_url"))]
    pub map_url: String,
    #[validate(custom(function = "required_url"))]
    pub img_url: String,
    #[validate(custom(function = "not_blank"))]
    pub location: String,
    #[validate(custom(function = "not_blank"))]
    pub seats: String,
    #[validate(custom(function = "flag_value"))]
    pub has_toilet: String,
    #[validate(custom(function = "flag_value"))]
    pub has_wifi: String,
    #[validate(custom(function = "flag_value"))]
    pub has_sockets: String,
    #[validate(custom(function = "flag_value"))]
    pub can_take_calls: String,
    pub coffee_price: String,
}

impl AddCafeForm {
    pub fn into_new_cafe(self) -> Result<NewCafe, DomainError> {
        self.validate()?;

        let flag = |raw: &str| parse_flag(Some(raw)).map_err(|_| DomainError::validation("invalid flag"));
        let coffee_price = self.coffee_price.trim();

        Ok(NewCafe {
            has_toilet: flag(&self.has_toilet)?,
            has_wifi: flag(&self.has_wifi)?,
            has_sockets: flag(&self.has_sockets)?,
            can_take_calls: flag(&self.can_take_calls)?,
            coffee_price: (!coffee_price.is_empty()).then(|| coffee_price.to_string()),
            name: self.name.trim().to_string(),
            map_url: self.map_url.trim().to_string(),
            img_url: self.img_url.trim().to_string(),
            location: self.location.trim().to_string(),
            seats: self.seats.trim().to_string(),
        })
    }
}
