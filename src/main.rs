use directories::ProjectDirs;
use iced::{executor, widget::image::Handle, Application, Command, Theme};
use log::{error, info};
use once_cell::sync::Lazy;
use std::{env, sync::Arc, time::Duration};

mod api;
mod components;
mod config;
mod crud;
mod images;
mod listing;
mod order;
mod screen;
mod session;

use api::{ApiClient, CinemaApi, Resource};
use config::{Settings, ORIGIN_ENV};
use crud::Notifications;
use images::{ImageResolver, ImageStore};
use listing::{RequestTracker, Ticket};
use order::Basket;
use screen::{Context, Screen, ScreenMessage};
use session::Session;

const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

static DIRS: Lazy<ProjectDirs> =
	Lazy::new(|| ProjectDirs::from("", "", CARGO_PKG_NAME).expect("no home directory found"));

static CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
	reqwest::Client::builder()
		.user_agent(format!("{CARGO_PKG_NAME}/{CARGO_PKG_VERSION}"))
		.timeout(Duration::from_secs(30))
		.build()
		.expect("failed to build http client")
});

pub type Element<'a> = iced::Element<'a, Message, iced::Renderer<Theme>>;

#[derive(Clone, Debug)]
pub enum Message {
	Navigate(Resource),
	/// message for the screen mounted with the ticket
	Screen(Ticket, ScreenMessage),
	ImageLoaded(Arc<str>, Result<Handle, String>),
	Dismiss(u64)
}

pub struct Flags {
	settings: Settings,
	session: Session
}

pub struct App {
	settings: Settings,
	api: Arc<dyn CinemaApi>,
	resolver: ImageResolver,
	images: ImageStore,
	notifications: Notifications,
	session: Session,
	basket: Basket,
	mounts: RequestTracker,
	screen: Screen,
	em: u16
}

impl App {
	fn connect(settings: &Settings, session: &Session) -> Arc<dyn CinemaApi> {
		Arc::new(ApiClient::new(
			&settings.api_origin,
			session.token().map(str::to_owned)
		))
	}

	fn split(&mut self) -> (&mut Screen, Context<'_>) {
		let ctx = Context {
			api: self.api.clone(),
			settings: &self.settings,
			resolver: &self.resolver,
			images: &mut self.images,
			notifications: &mut self.notifications,
			session: &mut self.session,
			basket: &mut self.basket
		};
		(&mut self.screen, ctx)
	}
}

impl Application for App {
	type Executor = executor::Default;
	type Flags = Flags;
	type Message = Message;
	type Theme = Theme;

	fn new(flags: Self::Flags) -> (Self, Command<Self::Message>) {
		let Flags {
			settings,
			mut session
		} = flags;
		let api = Self::connect(&settings, &session);
		let resolver = ImageResolver::new(&settings.api_origin);
		let mut images = ImageStore::new(settings.image_dirs(), settings.max_cached_images);
		let mut notifications = Notifications::new(settings.notification_delay());
		let mut basket = Basket::default();
		let mut mounts = RequestTracker::default();
		let (screen, command) = Screen::mount(
			Resource::Movies,
			mounts.issue(),
			&mut Context {
				api: api.clone(),
				settings: &settings,
				resolver: &resolver,
				images: &mut images,
				notifications: &mut notifications,
				session: &mut session,
				basket: &mut basket
			}
		);
		let app = App {
			settings,
			api,
			resolver,
			images,
			notifications,
			session,
			basket,
			mounts,
			screen,
			em: 16
		};
		(app, command)
	}

	fn title(&self) -> String {
		format!("{CARGO_PKG_NAME} - {}", self.screen.resource().title())
	}

	fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
		match message {
			Message::Navigate(resource) => {
				info!("open {resource:?}");
				let ticket = self.mounts.issue();
				let (_, mut ctx) = self.split();
				let (screen, command) = Screen::mount(resource, ticket, &mut ctx);
				self.screen = screen;
				command
			},
			Message::Screen(ticket, message) => {
				if !self.mounts.is_current(ticket) {
					return Command::none();
				}
				let signed_in = self.session.is_signed_in();
				let (screen, mut ctx) = self.split();
				let command = screen.update(message, &mut ctx);
				if signed_in && !self.session.is_signed_in() {
					self.api = Self::connect(&self.settings, &self.session);
				}
				command
			},
			Message::ImageLoaded(src, result) => {
				self.images.callback(&src, result);
				let visible = self.screen.image_srcs(&self.resolver);
				self.images.cache_replacement(visible.iter().map(String::as_str));
				Command::none()
			},
			Message::Dismiss(id) => {
				self.notifications.dismiss(id);
				Command::none()
			}
		}
	}

	fn view(&self) -> Element<'_> {
		components::view(self)
	}

	fn theme(&self) -> Self::Theme {
		Theme::Dark
	}
}

fn main() -> iced::Result {
	my_env_logger_style::builder()
		.filter(Some("wgpu_core"), log::LevelFilter::Warn)
		.filter(Some("wgpu_hal"), log::LevelFilter::Warn)
		.filter(Some("iced_wgpu"), log::LevelFilter::Warn)
		.init();
	let settings = Settings::load(&Settings::path())
		.unwrap_or_else(|err| {
			error!("failed to load settings: {err:?}");
			Settings::default()
		})
		.with_origin(env::var(ORIGIN_ENV).ok());
	let session = Session::load(&DIRS.data_dir().join("token")).unwrap_or_else(|err| {
		error!("failed to load session: {err:?}");
		Session::default()
	});
	App::run(iced::Settings::with_flags(Flags { settings, session }))
}
