use crate::{
	api::{CinemaApi, Failure, ListItem, ListQuery, Resource},
	config::Settings,
	crud::{Editor, Mutation, Notifications, Tone},
	images::{ImageResolver, ImageStore},
	listing::{ListView, Page, RequestTracker, Ticket},
	order::Basket,
	session::Session,
	Message
};
use iced::Command;
use log::{debug, warn};
use std::sync::Arc;
use tokio::time::sleep;

#[derive(Clone, Debug)]
pub enum ScreenMessage {
	Query(String),
	SubmitSearch,
	SearchSettled(Ticket),
	Loaded(Ticket, Result<Vec<ListItem>, Failure>),
	Retry,
	GoToPage(usize),
	NextPage,
	PreviousPage,
	Counted(Result<u64, Failure>),
	Select(String),
	Selected(Ticket, Result<ListItem, Failure>),
	CloseDetail,
	Order(String),
	EditName(String),
	EditEmail(String),
	EditCapacity(String),
	Edit(String),
	CancelEdit,
	Save,
	AskDelete(String),
	ConfirmDelete,
	CancelDelete,
	Mutated(Mutation, Result<(), Failure>)
}

/// Everything outside a screen it may touch while handling a message.
pub struct Context<'a> {
	pub api: Arc<dyn CinemaApi>,
	pub settings: &'a Settings,
	pub resolver: &'a ImageResolver,
	pub images: &'a mut ImageStore,
	pub notifications: &'a mut Notifications,
	pub session: &'a mut Session,
	pub basket: &'a mut Basket
}

impl Context<'_> {
	fn expire_session(&mut self) -> Command<Message> {
		if !self.session.is_signed_in() {
			return Command::none();
		}
		self.session.invalidate();
		self.basket.clear();
		self.notifications
			.push(Tone::Info, "Your session has expired, please sign in again")
	}
}

/// State of the visible screen. Dropped when another screen is opened.
#[derive(Debug)]
pub struct Screen {
	resource: Resource,
	mount: Ticket,
	list: ListView<ListItem>,
	fetches: RequestTracker,
	searches: RequestTracker,
	details: RequestTracker,
	/// query sent with the last fetch
	remote_query: Option<String>,
	loading: bool,
	error: Option<String>,
	count: Option<u64>,
	detail: Option<ListItem>,
	editor: Editor
}

impl Screen {
	pub fn mount(resource: Resource, mount: Ticket, ctx: &mut Context<'_>) -> (Self, Command<Message>) {
		let mut screen = Self {
			resource,
			mount,
			list: ListView::new(ctx.settings.page_size),
			fetches: Default::default(),
			searches: Default::default(),
			details: Default::default(),
			remote_query: None,
			loading: false,
			error: None,
			count: None,
			detail: None,
			editor: Default::default()
		};
		let mut commands = vec![screen.fetch(ctx)];
		if resource.submits_search() {
			commands.push(screen.fetch_count(ctx));
		}
		(screen, Command::batch(commands))
	}

	pub fn resource(&self) -> Resource {
		self.resource
	}

	pub fn mount_ticket(&self) -> Ticket {
		self.mount
	}

	pub fn query(&self) -> &str {
		self.list.search().query()
	}

	pub fn page(&self) -> Page<'_, ListItem> {
		self.list.page()
	}

	pub fn is_loading(&self) -> bool {
		self.loading
	}

	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	pub fn count(&self) -> Option<u64> {
		self.count
	}

	pub fn detail(&self) -> Option<&ListItem> {
		self.detail.as_ref()
	}

	pub fn editor(&self) -> &Editor {
		&self.editor
	}

	/// resolved image of an item, if this screen shows images
	pub fn image_src(&self, item: &ListItem, resolver: &ImageResolver) -> Option<String> {
		self.resource
			.image_kind()
			.map(|kind| resolver.resolve(item.image.as_deref(), kind))
	}

	fn find(&self, id: &str) -> Option<&ListItem> {
		self.list
			.items()
			.iter()
			.chain(self.detail.iter())
			.find(|item| item.id == id)
	}

	fn start_fetch(&mut self, ctx: &mut Context<'_>) -> (Ticket, Command<Message>) {
		let ticket = self.fetches.issue();
		self.loading = true;
		let api = ctx.api.clone();
		let resource = self.resource;
		let query = ListQuery {
			search: self.remote_query.clone(),
			page_size: ctx.settings.fetch_size
		};
		let mount = self.mount;
		let command = Command::perform(
			async move { api.list(resource, query).await.map_err(|err| err.classify()) },
			move |res| Message::Screen(mount, ScreenMessage::Loaded(ticket, res))
		);
		(ticket, command)
	}

	fn fetch(&mut self, ctx: &mut Context<'_>) -> Command<Message> {
		self.start_fetch(ctx).1
	}

	fn fetch_count(&self, ctx: &mut Context<'_>) -> Command<Message> {
		let api = ctx.api.clone();
		let resource = self.resource;
		let mount = self.mount;
		Command::perform(
			async move { api.count(resource).await.map_err(|err| err.classify()) },
			move |res| Message::Screen(mount, ScreenMessage::Counted(res))
		)
	}

	/// images of the visible page and of the detail panel
	pub fn image_srcs(&self, resolver: &ImageResolver) -> Vec<String> {
		self.list
			.page()
			.items
			.into_iter()
			.chain(self.detail.iter())
			.filter_map(|item| self.image_src(item, resolver))
			.collect()
	}

	fn request_images(&self, ctx: &mut Context<'_>) -> Command<Message> {
		let srcs = self.image_srcs(ctx.resolver);
		ctx.images.request_all(srcs.iter().map(String::as_str))
	}

	fn fail(&mut self, failure: Failure, ctx: &mut Context<'_>) -> Command<Message> {
		match failure {
			Failure::Auth => {
				self.error = Some("You are not allowed to see this page".to_owned());
				ctx.expire_session()
			},
			Failure::Other(message) => {
				self.error = Some(message);
				Command::none()
			}
		}
	}

	fn mutate(&mut self, mutation: Mutation, ctx: &mut Context<'_>) -> Command<Message> {
		self.editor.busy = true;
		let api = ctx.api.clone();
		let resource = self.resource;
		let mount = self.mount;
		let request = mutation.clone();
		Command::perform(
			async move { request.run(api, resource).await.map_err(|err| err.classify()) },
			move |res| Message::Screen(mount, ScreenMessage::Mutated(mutation, res))
		)
	}

	pub fn update(&mut self, message: ScreenMessage, ctx: &mut Context<'_>) -> Command<Message> {
		match message {
			ScreenMessage::Query(query) => {
				if !self.list.set_query(query) {
					return Command::none();
				}
				let images = self.request_images(ctx);
				if !self.resource.debounces_search() {
					return images;
				}
				let ticket = self.searches.issue();
				let delay = ctx.settings.search_debounce();
				let mount = self.mount;
				let settle = Command::perform(async move { sleep(delay).await }, move |()| {
					Message::Screen(mount, ScreenMessage::SearchSettled(ticket))
				});
				Command::batch([images, settle])
			},
			ScreenMessage::SubmitSearch => {
				if !self.resource.submits_search() {
					return Command::none();
				}
				self.remote_query = Some(self.query().to_owned());
				self.fetch(ctx)
			},
			ScreenMessage::SearchSettled(ticket) => {
				if !self.searches.is_current(ticket) {
					return Command::none();
				}
				self.remote_query = Some(self.query().to_owned());
				self.fetch(ctx)
			},
			ScreenMessage::Loaded(ticket, result) => {
				if !self.fetches.is_current(ticket) {
					debug!("drop stale {} response", self.resource.title());
					return Command::none();
				}
				self.loading = false;
				match result {
					Ok(items) => {
						self.error = None;
						self.list.replace(items);
						self.request_images(ctx)
					},
					Err(failure) => self.fail(failure, ctx)
				}
			},
			ScreenMessage::Retry => {
				self.error = None;
				self.fetch(ctx)
			},
			ScreenMessage::GoToPage(page) => {
				if self.list.go_to_page(page) {
					self.request_images(ctx)
				} else {
					Command::none()
				}
			},
			ScreenMessage::NextPage => {
				if self.list.next_page() {
					self.request_images(ctx)
				} else {
					Command::none()
				}
			},
			ScreenMessage::PreviousPage => {
				if self.list.previous_page() {
					self.request_images(ctx)
				} else {
					Command::none()
				}
			},
			ScreenMessage::Counted(result) => match result {
				Ok(count) => {
					self.count = Some(count);
					Command::none()
				},
				Err(Failure::Auth) => ctx.expire_session(),
				Err(Failure::Other(message)) => {
					warn!("failed to count {}: {message}", self.resource.title());
					Command::none()
				}
			},
			ScreenMessage::Select(id) => {
				let ticket = self.details.issue();
				let api = ctx.api.clone();
				let resource = self.resource;
				let mount = self.mount;
				Command::perform(
					async move { api.get(resource, id).await.map_err(|err| err.classify()) },
					move |res| Message::Screen(mount, ScreenMessage::Selected(ticket, res))
				)
			},
			ScreenMessage::Selected(ticket, result) => {
				if !self.details.is_current(ticket) {
					return Command::none();
				}
				match result {
					Ok(item) => {
						self.detail = Some(item);
						self.request_images(ctx)
					},
					Err(Failure::Auth) => ctx.expire_session(),
					Err(Failure::Other(message)) => ctx.notifications.push(Tone::Error, message)
				}
			},
			ScreenMessage::CloseDetail => {
				self.details.cancel();
				self.detail = None;
				Command::none()
			},
			ScreenMessage::Order(id) => {
				if !self.resource.is_orderable() || !ctx.session.is_signed_in() {
					return Command::none();
				}
				let Some(item) = self.find(&id) else {
					return Command::none();
				};
				ctx.basket.add(item);
				let text = format!("{} added to your order", item.name);
				ctx.notifications.push(Tone::Success, text)
			},
			ScreenMessage::EditName(name) => {
				self.editor.draft.name = name;
				Command::none()
			},
			ScreenMessage::EditEmail(email) => {
				self.editor.draft.email = email;
				Command::none()
			},
			ScreenMessage::EditCapacity(capacity) => {
				self.editor.draft.capacity = capacity;
				Command::none()
			},
			ScreenMessage::Edit(id) => {
				if let Some(item) = self.find(&id).cloned() {
					self.editor.edit(&item);
				}
				Command::none()
			},
			ScreenMessage::CancelEdit => {
				self.editor.reset();
				Command::none()
			},
			ScreenMessage::Save => {
				if !self.resource.is_admin() || self.editor.busy {
					return Command::none();
				}
				match self.editor.save(self.resource) {
					Ok(mutation) => self.mutate(mutation, ctx),
					Err(err) => ctx.notifications.push(Tone::Error, err.to_string())
				}
			},
			ScreenMessage::AskDelete(id) => {
				if let Some(item) = self.find(&id).cloned() {
					self.editor.ask_delete(&item);
				}
				Command::none()
			},
			ScreenMessage::ConfirmDelete => match self.editor.confirm_delete() {
				Some(mutation) if self.resource.is_admin() => self.mutate(mutation, ctx),
				_ => Command::none()
			},
			ScreenMessage::CancelDelete => {
				self.editor.cancel_delete();
				Command::none()
			},
			ScreenMessage::Mutated(mutation, result) => {
				self.editor.busy = false;
				match result {
					Ok(()) => {
						match &mutation {
							Mutation::Delete(id) if self.editor.editing.as_ref() != Some(id) => {},
							_ => self.editor.reset()
						}
						let text = format!("{} {}", self.resource.noun(), mutation.past_tense());
						let notification = ctx.notifications.push(Tone::Success, text);
						Command::batch([notification, self.fetch(ctx)])
					},
					Err(Failure::Auth) => ctx.expire_session(),
					Err(Failure::Other(message)) => ctx.notifications.push(Tone::Error, message)
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::{ApiError, Payload};
	use crate::images::ImageDirs;
	use async_trait::async_trait;
	use std::time::Duration;
	use tempfile::TempDir;

	/// never reached, since the tests do not run commands
	#[derive(Debug)]
	struct Unreachable;

	#[async_trait]
	impl CinemaApi for Unreachable {
		async fn list(&self, _: Resource, _: ListQuery) -> Result<Vec<ListItem>, ApiError> {
			unreachable!()
		}
		async fn get(&self, _: Resource, _: String) -> Result<ListItem, ApiError> {
			unreachable!()
		}
		async fn count(&self, _: Resource) -> Result<u64, ApiError> {
			unreachable!()
		}
		async fn create(&self, _: Resource, _: Payload) -> Result<(), ApiError> {
			unreachable!()
		}
		async fn update(&self, _: Resource, _: String, _: Payload) -> Result<(), ApiError> {
			unreachable!()
		}
		async fn delete(&self, _: Resource, _: String) -> Result<(), ApiError> {
			unreachable!()
		}
	}

	struct Harness {
		_dir: TempDir,
		settings: Settings,
		resolver: ImageResolver,
		images: ImageStore,
		notifications: Notifications,
		session: Session,
		basket: Basket,
		mounts: RequestTracker
	}

	impl Harness {
		fn new(session: Session) -> Self {
			let dir = TempDir::new().unwrap();
			let images = ImageStore::new(
				ImageDirs {
					assets: dir.path().join("assets"),
					cache: dir.path().join("cache")
				},
				100
			);
			Self {
				_dir: dir,
				settings: Settings::default(),
				resolver: ImageResolver::default(),
				images,
				notifications: Notifications::new(Duration::from_secs(3)),
				session,
				basket: Basket::default(),
				mounts: RequestTracker::default()
			}
		}

		fn ctx(&mut self) -> Context<'_> {
			Context {
				api: Arc::new(Unreachable),
				settings: &self.settings,
				resolver: &self.resolver,
				images: &mut self.images,
				notifications: &mut self.notifications,
				session: &mut self.session,
				basket: &mut self.basket
			}
		}

		fn mount(&mut self, resource: Resource) -> Screen {
			let ticket = self.mounts.issue();
			Screen::mount(resource, ticket, &mut self.ctx()).0
		}
	}

	fn items(names: &[&str]) -> Vec<ListItem> {
		names
			.iter()
			.enumerate()
			.map(|(i, name)| ListItem {
				id: i.to_string(),
				name: (*name).to_owned(),
				price: Some(3.0),
				..Default::default()
			})
			.collect()
	}

	fn shown(screen: &Screen) -> Vec<String> {
		screen
			.page()
			.items
			.iter()
			.map(|item| item.name.clone())
			.collect()
	}

	#[test]
	fn latest_fetch_wins() {
		let mut harness = Harness::new(Session::default());
		let mut screen = harness.mount(Resource::Movies);
		assert!(screen.is_loading());
		let (older, _) = screen.start_fetch(&mut harness.ctx());
		let (newer, _) = screen.start_fetch(&mut harness.ctx());

		let _ = screen.update(
			ScreenMessage::Loaded(newer, Ok(items(&["Metropolis"]))),
			&mut harness.ctx()
		);
		let _ = screen.update(
			ScreenMessage::Loaded(older, Ok(items(&["Nosferatu"]))),
			&mut harness.ctx()
		);
		assert_eq!(shown(&screen), vec!["Metropolis"]);
		assert!(!screen.is_loading());
	}

	#[test]
	fn failure_keeps_list_and_offers_retry() {
		let mut harness = Harness::new(Session::default());
		let mut screen = harness.mount(Resource::Categories);
		let (ticket, _) = screen.start_fetch(&mut harness.ctx());
		let _ = screen.update(
			ScreenMessage::Loaded(ticket, Ok(items(&["Drama"]))),
			&mut harness.ctx()
		);
		let (ticket, _) = screen.start_fetch(&mut harness.ctx());
		let _ = screen.update(
			ScreenMessage::Loaded(ticket, Err(Failure::Other("offline".into()))),
			&mut harness.ctx()
		);
		assert_eq!(screen.error(), Some("offline"));
		assert_eq!(shown(&screen), vec!["Drama"]);

		let _ = screen.update(ScreenMessage::Retry, &mut harness.ctx());
		assert!(screen.error().is_none());
		assert!(screen.is_loading());
	}

	#[test]
	fn auth_failure_clears_session() {
		let mut harness = Harness::new(Session::with_token("old"));
		let mut screen = harness.mount(Resource::Users);
		let (ticket, _) = screen.start_fetch(&mut harness.ctx());
		let _ = screen.update(ScreenMessage::Loaded(ticket, Err(Failure::Auth)), &mut harness.ctx());
		assert!(!harness.session.is_signed_in());
		assert!(screen.error().is_some());
		assert_eq!(harness.notifications.active().len(), 1);
	}

	#[test]
	fn query_filters_and_resets_page() {
		let mut harness = Harness::new(Session::default());
		let mut screen = harness.mount(Resource::Drinks);
		let mut names: Vec<String> = (1..=22).map(|i| format!("Juice {i}")).collect();
		names.extend(["Coca Cola", "cola light", "Pepsi COLA"].map(String::from));
		let names: Vec<&str> = names.iter().map(String::as_str).collect();
		let (ticket, _) = screen.start_fetch(&mut harness.ctx());
		let _ = screen.update(ScreenMessage::Loaded(ticket, Ok(items(&names))), &mut harness.ctx());

		let _ = screen.update(ScreenMessage::GoToPage(3), &mut harness.ctx());
		assert_eq!(screen.page().current_page, 3);
		let _ = screen.update(ScreenMessage::Query("COLA".into()), &mut harness.ctx());
		let page = screen.page();
		assert_eq!(page.total_pages, 1);
		assert!(!page.show_controls);
		assert_eq!(shown(&screen), vec!["Coca Cola", "cola light", "Pepsi COLA"]);

		let _ = screen.update(ScreenMessage::Query(String::new()), &mut harness.ctx());
		assert_eq!(screen.page().current_page, 1);
		assert_eq!(screen.page().total_pages, 3);
	}

	#[test]
	fn only_last_keystroke_refetches_halls() {
		let mut harness = Harness::new(Session::default());
		let mut screen = harness.mount(Resource::Halls);
		let (ticket, _) = screen.start_fetch(&mut harness.ctx());
		let _ = screen.update(ScreenMessage::Loaded(ticket, Ok(items(&["IMAX"]))), &mut harness.ctx());
		assert!(!screen.is_loading());

		// the screen hands out the same ticket sequence as a fresh tracker
		let mut keystrokes = RequestTracker::default();
		let first = keystrokes.issue();
		let second = keystrokes.issue();
		let _ = screen.update(ScreenMessage::Query("I".into()), &mut harness.ctx());
		assert!(screen.searches.is_current(first));
		let _ = screen.update(ScreenMessage::Query("IM".into()), &mut harness.ctx());
		assert!(screen.searches.is_current(second));
		assert!(!screen.is_loading());

		// the timer of the first keystroke fires, but it is stale
		let _ = screen.update(ScreenMessage::SearchSettled(first), &mut harness.ctx());
		assert!(!screen.is_loading());
		assert_eq!(screen.remote_query, None);
		let _ = screen.update(ScreenMessage::SearchSettled(second), &mut harness.ctx());
		assert!(screen.is_loading());
		assert_eq!(screen.remote_query.as_deref(), Some("IM"));
	}

	#[test]
	fn invalid_form_issues_no_request() {
		let mut harness = Harness::new(Session::default());
		let mut screen = harness.mount(Resource::Categories);
		let _ = screen.update(ScreenMessage::EditName("   ".into()), &mut harness.ctx());
		let _ = screen.update(ScreenMessage::Save, &mut harness.ctx());
		assert!(!screen.editor().busy);
		let notes = harness.notifications.active();
		assert_eq!(notes.len(), 1);
		assert_eq!(notes[0].tone, Tone::Error);

		let _ = screen.update(ScreenMessage::EditName("Drama".into()), &mut harness.ctx());
		let _ = screen.update(ScreenMessage::Save, &mut harness.ctx());
		assert!(screen.editor().busy);
	}

	#[test]
	fn delete_waits_for_confirmation_and_refetches() {
		let mut harness = Harness::new(Session::default());
		let mut screen = harness.mount(Resource::Categories);
		let (ticket, _) = screen.start_fetch(&mut harness.ctx());
		let _ = screen.update(
			ScreenMessage::Loaded(ticket, Ok(items(&["Drama", "Horror"]))),
			&mut harness.ctx()
		);
		let _ = screen.update(ScreenMessage::AskDelete("1".into()), &mut harness.ctx());
		assert!(!screen.editor().busy);
		assert_eq!(
			screen.editor().pending_delete,
			Some(("1".to_owned(), "Horror".to_owned()))
		);
		let _ = screen.update(ScreenMessage::ConfirmDelete, &mut harness.ctx());
		assert!(screen.editor().busy);

		let _ = screen.update(
			ScreenMessage::Mutated(Mutation::Delete("1".into()), Ok(())),
			&mut harness.ctx()
		);
		assert!(!screen.editor().busy);
		assert!(screen.is_loading());
		// nothing is removed before the refetch arrives
		assert_eq!(shown(&screen), vec!["Drama", "Horror"]);
		assert_eq!(harness.notifications.active()[0].text, "Category deleted");
	}

	#[test]
	fn failed_mutation_keeps_form() {
		let mut harness = Harness::new(Session::default());
		let mut screen = harness.mount(Resource::Halls);
		let _ = screen.update(ScreenMessage::EditName("IMAX".into()), &mut harness.ctx());
		let mutation = Mutation::Create(Payload::Hall {
			name: "IMAX".into(),
			capacity: None
		});
		let _ = screen.update(
			ScreenMessage::Mutated(mutation, Err(Failure::Other("conflict".into()))),
			&mut harness.ctx()
		);
		assert_eq!(screen.editor().draft.name, "IMAX");
		assert_eq!(harness.notifications.active()[0].tone, Tone::Error);
	}

	#[test]
	fn ordering_needs_session() {
		let mut harness = Harness::new(Session::default());
		let mut screen = harness.mount(Resource::Snacks);
		let (ticket, _) = screen.start_fetch(&mut harness.ctx());
		let _ = screen.update(ScreenMessage::Loaded(ticket, Ok(items(&["Popcorn"]))), &mut harness.ctx());
		let _ = screen.update(ScreenMessage::Order("0".into()), &mut harness.ctx());
		assert_eq!(harness.basket.count(), 0);

		harness.session = Session::with_token("t");
		let _ = screen.update(ScreenMessage::Order("0".into()), &mut harness.ctx());
		let _ = screen.update(ScreenMessage::Order("0".into()), &mut harness.ctx());
		assert_eq!(harness.basket.count(), 2);
	}
}
