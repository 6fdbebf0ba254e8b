use crate::{screen::ScreenMessage, App, Element, Message};
use iced::{
	theme,
	widget::{button, text, Row},
	Alignment
};

/// pages shown left and right of the current one
const WINDOW: usize = 3;

pub fn view(app: &App, current: usize, total: usize) -> Element<'_> {
	let mount = app.screen.mount_ticket();
	let message = move |message| Message::Screen(mount, message);

	let mut previous = button("Previous").style(theme::Button::Secondary);
	if current > 1 {
		previous = previous.on_press(message(ScreenMessage::PreviousPage));
	}
	let mut controls = Row::new()
		.spacing(app.em / 4)
		.align_items(Alignment::Center)
		.push(previous);

	let first = current.saturating_sub(WINDOW).max(1);
	let last = (current + WINDOW).min(total);
	if first > 1 {
		controls = controls.push(text("…"));
	}
	for page in first..=last {
		let bt = button(text(page));
		controls = controls.push(if page == current {
			bt.style(theme::Button::Primary)
		} else {
			bt.style(theme::Button::Text)
				.on_press(message(ScreenMessage::GoToPage(page)))
		});
	}
	if last < total {
		controls = controls.push(text("…"));
	}

	let mut next = button("Next").style(theme::Button::Secondary);
	if current < total {
		next = next.on_press(message(ScreenMessage::NextPage));
	}
	controls.push(next).into()
}
