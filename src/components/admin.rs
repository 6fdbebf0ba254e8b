use crate::{api::Resource, screen::ScreenMessage, App, Element, Message};
use iced::{
	theme,
	widget::{button, column, text, text_input, Row},
	Alignment, Length
};

pub fn view(app: &App) -> Element<'_> {
	let screen = &app.screen;
	let editor = screen.editor();
	let mount = screen.mount_ticket();
	let message = move |message| Message::Screen(mount, message);

	let mut form = Row::new()
		.spacing(app.em / 2)
		.align_items(Alignment::Center)
		.push(
			text_input("Name", &editor.draft.name)
				.on_input(move |name| message(ScreenMessage::EditName(name)))
				.on_submit(message(ScreenMessage::Save))
				.width(Length::FillPortion(2))
		);
	match screen.resource() {
		Resource::Users => {
			form = form.push(
				text_input("Email", &editor.draft.email)
					.on_input(move |email| message(ScreenMessage::EditEmail(email)))
					.on_submit(message(ScreenMessage::Save))
					.width(Length::FillPortion(2))
			);
		},
		Resource::Halls => {
			form = form.push(
				text_input("Seats", &editor.draft.capacity)
					.on_input(move |capacity| message(ScreenMessage::EditCapacity(capacity)))
					.on_submit(message(ScreenMessage::Save))
					.width(Length::FillPortion(1))
			);
		},
		_ => {}
	}
	let label = if editor.editing.is_some() { "Save" } else { "Create" };
	let mut save = button(label).style(theme::Button::Primary);
	if !editor.busy {
		save = save.on_press(message(ScreenMessage::Save));
	}
	form = form.push(save);
	if editor.editing.is_some() {
		form = form.push(
			button("Cancel")
				.style(theme::Button::Secondary)
				.on_press(message(ScreenMessage::CancelEdit))
		);
	}

	let Some((_id, name)) = &editor.pending_delete else {
		return form.into();
	};
	let prompt = Row::new()
		.spacing(app.em / 2)
		.align_items(Alignment::Center)
		.push(text(format!("Delete {name}?")))
		.push(
			button("Delete")
				.style(theme::Button::Destructive)
				.on_press(message(ScreenMessage::ConfirmDelete))
		)
		.push(
			button("Keep")
				.style(theme::Button::Secondary)
				.on_press(message(ScreenMessage::CancelDelete))
		);
	column!(form, prompt).spacing(app.em / 2).into()
}
