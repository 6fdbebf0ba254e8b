mod admin;
mod image;
mod list;
mod notifications;
mod pagination;
mod top_bar;

use crate::{screen::ScreenMessage, App, Element, Message};
use iced::{
	widget::{button, column, row, text, Column, Space},
	Alignment, Color, Length
};

/// `/api/Snak/count` does not filter by type, so the number covers snacks and drinks
fn count_label(count: u64) -> String {
	format!("{count} snacks and drinks on the menu")
}

fn header(app: &App) -> Element<'_> {
	let screen = &app.screen;
	let mut header = row!(text(screen.resource().title()).size(32))
		.spacing(app.em)
		.align_items(Alignment::Center);
	if let Some(count) = screen.count() {
		header = header.push(text(count_label(count)));
	}
	header = header.push(Space::with_width(Length::Fill));
	if screen.is_loading() {
		header = header.push(text("Loading…"));
	}
	header.into()
}

fn error(app: &App) -> Option<Element<'_>> {
	let message = app.screen.error()?;
	let mount = app.screen.mount_ticket();
	Some(
		row!(
			text(message).style(Color::from_rgb(0.95, 0.35, 0.35)),
			button("Retry").on_press(Message::Screen(mount, ScreenMessage::Retry))
		)
		.spacing(app.em / 2)
		.align_items(Alignment::Center)
		.into()
	)
}

pub fn view(app: &App) -> Element<'_> {
	let screen = &app.screen;
	let mut body = Column::new()
		.spacing(app.em / 2)
		.padding(app.em)
		.push(header(app))
		.push(notifications::view(app));
	if let Some(error) = error(app) {
		body = body.push(error);
	}
	if screen.resource().is_admin() {
		body = body.push(admin::view(app));
	}
	if let Some(item) = screen.detail() {
		body = body.push(list::detail(app, item));
	}
	let page = screen.page();
	body = body.push(list::view(app));
	if page.show_controls {
		body = body.push(pagination::view(app, page.current_page, page.total_pages));
	}
	column!(top_bar::view(app), body).into()
}
