use crate::{api::Resource, screen::ScreenMessage, App, Element, Message};
use iced::{
	theme,
	widget::{self, button, row, text, text_input, Space},
	Alignment, Length
};

fn screen_button<'a>(
	resource: Resource,
	app: &'a App
) -> widget::Button<'a, Message, iced::Renderer<<App as iced::Application>::Theme>> {
	let bt = button(resource.title());
	if app.screen.resource() == resource {
		bt.style(theme::Button::Primary)
	} else {
		bt.style(theme::Button::Text)
			.on_press(Message::Navigate(resource))
	}
}

pub fn view(app: &App) -> Element<'_> {
	let mount = app.screen.mount_ticket();
	let mut search = text_input("Search", app.screen.query())
		.on_input(move |query| Message::Screen(mount, ScreenMessage::Query(query)))
		.width(Length::Fixed(240.0));
	if app.screen.resource().submits_search() {
		search = search.on_submit(Message::Screen(mount, ScreenMessage::SubmitSearch));
	}
	let buttons: Vec<Element> = Resource::ALL
		.into_iter()
		.map(|resource| screen_button(resource, app).into())
		.collect();
	let account = if app.session.is_signed_in() {
		text(format!(
			"Order: {} items, {:.2}",
			app.basket.count(),
			app.basket.total()
		))
	} else {
		text("Not signed in")
	};
	row!(
		row(buttons).spacing(app.em / 4),
		Space::with_width(Length::Fill),
		search,
		account
	)
	.align_items(Alignment::Center)
	.padding(app.em / 4)
	.spacing(app.em / 2)
	.into()
}
