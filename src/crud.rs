//! Create, edit and delete for the admin screens.
//!
//! Nothing is changed locally: after a successful request the whole list is fetched again.

use crate::{
	api::{ApiError, CinemaApi, ListItem, Payload, Resource},
	Message
};
use iced::Command;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tokio::time::sleep;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ValidationError {
	#[error("Name must not be empty")]
	MissingName,
	#[error("Capacity must be a whole number")]
	InvalidCapacity,
	#[error("{0} can not be edited here")]
	ReadOnly(&'static str)
}

/// Content of the edit form. Everything is kept as typed, and only parsed on save.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Draft {
	pub name: String,
	pub email: String,
	pub capacity: String
}

impl Draft {
	pub fn from_item(item: &ListItem) -> Self {
		Self {
			name: item.name.clone(),
			email: item.email.clone().unwrap_or_default(),
			capacity: item
				.capacity
				.map(|capacity| capacity.to_string())
				.unwrap_or_default()
		}
	}

	/// validate and build the request body
	pub fn payload(&self, resource: Resource) -> Result<Payload, ValidationError> {
		let name = self.name.trim();
		if name.is_empty() {
			return Err(ValidationError::MissingName);
		}
		let name = name.to_owned();
		match resource {
			Resource::Categories => Ok(Payload::Category { name }),
			Resource::Halls => {
				let capacity = match self.capacity.trim() {
					"" => None,
					capacity => Some(
						capacity
							.parse()
							.map_err(|_| ValidationError::InvalidCapacity)?
					)
				};
				Ok(Payload::Hall { name, capacity })
			},
			Resource::Users => {
				let email = Some(self.email.trim().to_owned()).filter(|email| !email.is_empty());
				Ok(Payload::User {
					full_name: name,
					email
				})
			},
			resource => Err(ValidationError::ReadOnly(resource.title()))
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
	Create(Payload),
	Update(String, Payload),
	Delete(String)
}

impl Mutation {
	pub fn past_tense(&self) -> &'static str {
		match self {
			Mutation::Create(_) => "created",
			Mutation::Update(..) => "updated",
			Mutation::Delete(_) => "deleted"
		}
	}

	pub async fn run(self, api: Arc<dyn CinemaApi>, resource: Resource) -> Result<(), ApiError> {
		match self {
			Mutation::Create(payload) => api.create(resource, payload).await,
			Mutation::Update(id, payload) => api.update(resource, id, payload).await,
			Mutation::Delete(id) => api.delete(resource, id).await
		}
	}
}

/// Form and delete prompt of an admin screen.
#[derive(Debug, Default)]
pub struct Editor {
	pub draft: Draft,
	/// id of the item being edited; `None` creates a new one
	pub editing: Option<String>,
	/// (id, name) waiting for confirmation
	pub pending_delete: Option<(String, String)>,
	/// a request is in flight
	pub busy: bool
}

impl Editor {
	pub fn edit(&mut self, item: &ListItem) {
		self.draft = Draft::from_item(item);
		self.editing = Some(item.id.clone());
	}

	pub fn reset(&mut self) {
		self.draft = Draft::default();
		self.editing = None;
	}

	/// mutation for the save button
	pub fn save(&self, resource: Resource) -> Result<Mutation, ValidationError> {
		let payload = self.draft.payload(resource)?;
		Ok(match &self.editing {
			Some(id) => Mutation::Update(id.clone(), payload),
			None => Mutation::Create(payload)
		})
	}

	pub fn ask_delete(&mut self, item: &ListItem) {
		self.pending_delete = Some((item.id.clone(), item.name.clone()));
	}

	/// only a confirmed prompt yields a mutation
	pub fn confirm_delete(&mut self) -> Option<Mutation> {
		self.pending_delete
			.take()
			.map(|(id, _name)| Mutation::Delete(id))
	}

	pub fn cancel_delete(&mut self) {
		self.pending_delete = None;
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tone {
	Success,
	Info,
	Error
}

#[derive(Clone, Debug)]
pub struct Notification {
	pub id: u64,
	pub tone: Tone,
	pub text: String
}

/// Transient messages, each removed again after a fixed delay.
#[derive(Debug)]
pub struct Notifications {
	active: Vec<Notification>,
	next_id: u64,
	delay: Duration
}

impl Notifications {
	pub fn new(delay: Duration) -> Self {
		Self {
			active: Vec::new(),
			next_id: 0,
			delay
		}
	}

	pub fn push(&mut self, tone: Tone, text: impl Into<String>) -> Command<Message> {
		let id = self.next_id;
		self.next_id += 1;
		self.active.push(Notification {
			id,
			tone,
			text: text.into()
		});
		let delay = self.delay;
		Command::perform(async move { sleep(delay).await }, move |()| {
			Message::Dismiss(id)
		})
	}

	pub fn dismiss(&mut self, id: u64) {
		self.active.retain(|notification| notification.id != id);
	}

	pub fn active(&self) -> &[Notification] {
		&self.active
	}
}
