//! Records as the backend sends them, and the one shape the rest of the app uses.
//!
//! The backend is not consistent about field names (`id` vs `_id`, `name` vs `fullName`),
//! so every resource has its own raw type which is converted to [`ListItem`] right after decoding.

use crate::listing::Searchable;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

/// Canonical list entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListItem {
	pub id: String,
	pub name: String,
	pub email: Option<String>,
	pub description: Option<String>,
	pub price: Option<f64>,
	pub capacity: Option<u32>,
	pub image: Option<String>
}

impl Searchable for ListItem {
	fn search_fields(&self) -> Vec<&str> {
		let mut fields = vec![self.name.as_str()];
		fields.extend(self.email.as_deref());
		fields
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawId {
	Text(String),
	Number(i64)
}

impl fmt::Display for RawId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RawId::Text(text) => f.write_str(text),
			RawId::Number(number) => write!(f, "{number}")
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMovie {
	#[serde(alias = "_id")]
	id: RawId,
	#[serde(alias = "title")]
	name: String,
	description: Option<String>,
	#[serde(alias = "imageUrl", alias = "poster")]
	image: Option<String>
}

impl From<RawMovie> for ListItem {
	fn from(raw: RawMovie) -> Self {
		ListItem {
			id: raw.id.to_string(),
			name: raw.name,
			description: raw.description,
			image: raw.image,
			..Default::default()
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnack {
	#[serde(alias = "_id")]
	id: RawId,
	name: String,
	description: Option<String>,
	price: Option<f64>,
	#[serde(alias = "imageUrl")]
	image: Option<String>
}

impl From<RawSnack> for ListItem {
	fn from(raw: RawSnack) -> Self {
		ListItem {
			id: raw.id.to_string(),
			name: raw.name,
			description: raw.description,
			price: raw.price,
			image: raw.image,
			..Default::default()
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHall {
	#[serde(alias = "_id")]
	id: RawId,
	name: String,
	#[serde(alias = "seatsCount", alias = "seats")]
	capacity: Option<u32>,
	#[serde(alias = "imageUrl")]
	image: Option<String>
}

impl From<RawHall> for ListItem {
	fn from(raw: RawHall) -> Self {
		ListItem {
			id: raw.id.to_string(),
			name: raw.name,
			capacity: raw.capacity,
			image: raw.image,
			..Default::default()
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
	#[serde(alias = "_id")]
	id: RawId,
	name: String
}

impl From<RawCategory> for ListItem {
	fn from(raw: RawCategory) -> Self {
		ListItem {
			id: raw.id.to_string(),
			name: raw.name,
			..Default::default()
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
	#[serde(alias = "_id")]
	id: RawId,
	#[serde(alias = "name", alias = "userName")]
	full_name: String,
	email: Option<String>,
	#[serde(alias = "imageUrl", alias = "profileImage")]
	image: Option<String>
}

impl From<RawUser> for ListItem {
	fn from(raw: RawUser) -> Self {
		ListItem {
			id: raw.id.to_string(),
			name: raw.full_name,
			email: raw.email,
			image: raw.image,
			..Default::default()
		}
	}
}

/// Lists come either bare or wrapped by a paging envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<R> {
	Bare(Vec<R>),
	Data { data: Vec<R> },
	Items { items: Vec<R> }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneEnvelope<R> {
	Data { data: R },
	Bare(R)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountEnvelope {
	Bare(u64),
	Wrapped { count: u64 }
}

pub fn decode_list<R>(body: &[u8]) -> serde_json::Result<Vec<ListItem>>
where
	R: DeserializeOwned + Into<ListItem>
{
	let raw = match serde_json::from_slice::<ListEnvelope<R>>(body)? {
		ListEnvelope::Bare(raw) | ListEnvelope::Data { data: raw } | ListEnvelope::Items { items: raw } => raw
	};
	Ok(raw.into_iter().map(Into::into).collect())
}

pub fn decode_one<R>(body: &[u8]) -> serde_json::Result<ListItem>
where
	R: DeserializeOwned + Into<ListItem>
{
	let raw = match serde_json::from_slice::<OneEnvelope<R>>(body)? {
		OneEnvelope::Data { data } | OneEnvelope::Bare(data) => data
	};
	Ok(raw.into())
}

pub fn decode_count(body: &[u8]) -> serde_json::Result<u64> {
	Ok(match serde_json::from_slice::<CountEnvelope>(body)? {
		CountEnvelope::Bare(count) | CountEnvelope::Wrapped { count } => count
	})
}

/// Body of a create or update request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
	Category {
		name: String
	},
	#[serde(rename_all = "camelCase")]
	Hall {
		name: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		capacity: Option<u32>
	},
	#[serde(rename_all = "camelCase")]
	User {
		full_name: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		email: Option<String>
	}
}
