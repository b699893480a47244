//! Cafes domain module.
//!
//! Two shapes of the same idea live here:
//! - [`entry`]: the flat-file cafe directory (free-text times, emoji ratings).
//! - [`cafe`]: the table-backed cafe served by the JSON API.
//!
//! Pure domain logic only (no IO, no HTTP, no storage).

pub mod cafe;
pub mod entry;

pub use cafe::{AddCafeForm, Cafe, NewCafe};
pub use entry::{CafeEntry, CafeForm, COFFEE_CHOICES, HEADER, POWER_CHOICES, WIFI_CHOICES};
