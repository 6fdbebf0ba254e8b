use super::image;
use crate::{
	api::ListItem,
	screen::ScreenMessage,
	App, Element, Message
};
use iced::{
	theme,
	widget::{button, column, scrollable, text, Column, Row},
	Alignment, Length
};

const THUMBNAIL: f32 = 72.0;

fn facts(item: &ListItem) -> Vec<String> {
	let mut facts = Vec::new();
	if let Some(email) = &item.email {
		facts.push(email.clone());
	}
	if let Some(description) = &item.description {
		facts.push(description.clone());
	}
	if let Some(capacity) = item.capacity {
		facts.push(format!("{capacity} seats"));
	}
	if let Some(price) = item.price {
		facts.push(format!("{price:.2}"));
	}
	facts
}

fn entry<'a>(app: &'a App, item: &ListItem) -> Element<'a> {
	let screen = &app.screen;
	let mount = screen.mount_ticket();
	let message = move |message| Message::Screen(mount, message);
	let resource = screen.resource();

	let mut row = Row::new()
		.spacing(app.em / 2)
		.align_items(Alignment::Center);
	if let Some(src) = screen.image_src(item, &app.resolver) {
		row = row.push(image::view(app, &src, THUMBNAIL));
	}
	let info = facts(item).into_iter().fold(
		Column::new().push(text(&item.name).size(20)),
		|info, fact| info.push(text(fact).size(14))
	);
	row = row.push(info.width(Length::Fill));

	if !resource.is_admin() {
		row = row.push(
			button("Details")
				.style(theme::Button::Secondary)
				.on_press(message(ScreenMessage::Select(item.id.clone())))
		);
	}
	// ordering is only offered to signed in users
	if resource.is_orderable() && app.session.is_signed_in() {
		row = row.push(
			button("Order")
				.style(theme::Button::Positive)
				.on_press(message(ScreenMessage::Order(item.id.clone())))
		);
	}
	if resource.is_admin() {
		row = row
			.push(
				button("Edit")
					.style(theme::Button::Secondary)
					.on_press(message(ScreenMessage::Edit(item.id.clone())))
			)
			.push(
				button("Delete")
					.style(theme::Button::Destructive)
					.on_press(message(ScreenMessage::AskDelete(item.id.clone())))
			);
	}
	row.into()
}

pub fn detail<'a>(app: &'a App, item: &ListItem) -> Element<'a> {
	let mount = app.screen.mount_ticket();
	let mut panel = Column::new().spacing(app.em / 2);
	if let Some(src) = app.screen.image_src(item, &app.resolver) {
		panel = panel.push(image::view(app, &src, THUMBNAIL * 3.0));
	}
	panel = facts(item).into_iter().fold(
		panel.push(text(&item.name).size(28)),
		|panel, fact| panel.push(text(fact))
	);
	panel
		.push(button("Close").on_press(Message::Screen(mount, ScreenMessage::CloseDetail)))
		.padding(app.em)
		.into()
}

pub fn view(app: &App) -> Element<'_> {
	let page = app.screen.page();
	if page.items.is_empty() && !app.screen.is_loading() {
		return text("Nothing found").into();
	}
	let entries: Vec<Element> = page.items.iter().map(|item| entry(app, item)).collect();
	scrollable(column(entries).spacing(app.em / 2))
		.height(Length::Fill)
		.into()
}
