mod client;
mod error;
mod models;

pub use client::ApiClient;
pub use error::{ApiError, Failure};
pub use models::{ListItem, Payload};

use crate::images::ImageKind;
use async_trait::async_trait;
use std::fmt::Debug;

/// Collections of the backend, one per screen.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Resource {
	Movies,
	Snacks,
	Drinks,
	Halls,
	Categories,
	Users
}

impl Resource {
	pub const ALL: [Resource; 6] = [
		Resource::Movies,
		Resource::Snacks,
		Resource::Drinks,
		Resource::Halls,
		Resource::Categories,
		Resource::Users
	];

	pub fn path(self) -> &'static str {
		match self {
			Resource::Movies => "api/Movie",
			Resource::Snacks | Resource::Drinks => "api/Snak",
			Resource::Halls => "api/Hall",
			Resource::Categories => "api/MovieType",
			Resource::Users => "api/User"
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			Resource::Movies => "Movies",
			Resource::Snacks => "Snacks",
			Resource::Drinks => "Drinks",
			Resource::Halls => "Halls",
			Resource::Categories => "Categories",
			Resource::Users => "Users"
		}
	}

	/// singular, used in notifications
	pub fn noun(self) -> &'static str {
		match self {
			Resource::Movies => "Movie",
			Resource::Snacks => "Snack",
			Resource::Drinks => "Drink",
			Resource::Halls => "Hall",
			Resource::Categories => "Category",
			Resource::Users => "User"
		}
	}

	/// value of the `SnakType` query parameter
	pub fn snack_type(self) -> Option<&'static str> {
		match self {
			Resource::Snacks => Some("Snak"),
			Resource::Drinks => Some("Drink"),
			_ => None
		}
	}

	pub fn image_kind(self) -> Option<ImageKind> {
		match self {
			Resource::Movies => Some(ImageKind::Movie),
			Resource::Snacks | Resource::Drinks => Some(ImageKind::Snack),
			Resource::Halls => Some(ImageKind::Hall),
			Resource::Users => Some(ImageKind::User),
			Resource::Categories => None
		}
	}

	/// screens with create, edit and delete
	pub fn is_admin(self) -> bool {
		matches!(self, Resource::Halls | Resource::Categories | Resource::Users)
	}

	/// items which can be put into the basket
	pub fn is_orderable(self) -> bool {
		self.snack_type().is_some()
	}

	/// typing refetches from the server after a pause
	pub fn debounces_search(self) -> bool {
		self == Resource::Halls
	}

	/// pressing enter in the search box refetches from the server
	pub fn submits_search(self) -> bool {
		self.snack_type().is_some()
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListQuery {
	/// server side search, in addition to the local filter
	pub search: Option<String>,
	pub page_size: u32
}

#[async_trait]
pub trait CinemaApi: Debug + Send + Sync {
	async fn list(&self, resource: Resource, query: ListQuery) -> Result<Vec<ListItem>, ApiError>;
	async fn get(&self, resource: Resource, id: String) -> Result<ListItem, ApiError>;
	async fn count(&self, resource: Resource) -> Result<u64, ApiError>;
	async fn create(&self, resource: Resource, payload: Payload) -> Result<(), ApiError>;
	async fn update(&self, resource: Resource, id: String, payload: Payload) -> Result<(), ApiError>;
	async fn delete(&self, resource: Resource, id: String) -> Result<(), ApiError>;
}
