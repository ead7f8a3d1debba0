/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::bank::region::Region;
use crate::error::BackendError;
use crate::util::http::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
	pub longitude: f64,
	pub latitude: f64,
}

impl fmt::Display for Coordinates {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "lon {} lat {}", self.longitude, self.latitude)
	}
}

/// Best-effort address lookup. Not finding anything is a normal answer.
pub trait Geocoder {
	fn locate(&self, address: &str) -> Option<Coordinates>;
}

pub fn locate_region(geocoder: &impl Geocoder, region: &Region) -> Option<Coordinates> {
	geocoder.locate(&region.address())
}

/// OpenStreetMap's public geocoder.
pub struct Nominatim {
	http: Client,
}

#[derive(Serialize)]
struct SearchParams<'a> {
	q: &'a str,
	format: &'a str,
	limit: u8,
}

#[derive(Debug, Deserialize)]
struct Place {
	lon: Option<String>,
	lat: Option<String>,
}

impl Nominatim {
	pub fn new(timeout: Duration) -> Result<Self, BackendError> {
		Ok(Self {
			http: Client::new(NOMINATIM_URL, timeout)?,
		})
	}

	fn search(&self, address: &str) -> Result<Vec<Place>, BackendError> {
		let params = SearchParams {
			q: address,
			format: "json",
			limit: 1,
		};
		self.http.get("search", Some(&params))
	}
}

impl Geocoder for Nominatim {
	fn locate(&self, address: &str) -> Option<Coordinates> {
		match self.search(address) {
			Ok(places) => {
				let found = first_hit(&places);
				debug!(address, ?found, "geocoded");
				found
			},
			Err(e) => {
				warn!(address, error = %e, "geocoding failed");
				None
			},
		}
	}
}

fn first_hit(places: &[Place]) -> Option<Coordinates> {
	let place = places.first()?;
	Some(Coordinates {
		longitude: place.lon.as_deref()?.parse().ok()?,
		latitude: place.lat.as_deref()?.parse().ok()?,
	})
}
