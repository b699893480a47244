use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crudapps_cafes::{Cafe, CafeEntry};

// -------------------------
// Request DTOs
// -------------------------

/// `?id=N` on the movie routes. Kept as text so a malformed id is a 404, not
/// an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub loc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewPriceQuery {
    pub new_price: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiKeyQuery {
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,
}

// -------------------------
// Response projections
// -------------------------

pub fn cafe_to_json(cafe: &Cafe) -> Value {
    json!({
        "id": cafe.id.get(),
        "name": cafe.name,
        "map_url": cafe.map_url,
        "img_url": cafe.img_url,
        "location": cafe.location,
        "seats": cafe.seats,
        "has_toilet": cafe.has_toilet,
        "has_wifi": cafe.has_wifi,
        "has_sockets": cafe.has_sockets,
        "can_take_calls": cafe.can_take_calls,
        "coffee_price": cafe.coffee_price,
    })
}

/// One row of the `/cafes` table.
#[derive(Debug, Serialize)]
pub struct DirectoryRow {
    pub map_link: Option<String>,
    pub entry: CafeEntry,
}

impl From<CafeEntry> for DirectoryRow {
    fn from(entry: CafeEntry) -> Self {
        Self {
            map_link: entry.map_link().map(str::to_string),
            entry,
        }
    }
}
