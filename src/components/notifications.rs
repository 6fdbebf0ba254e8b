use crate::{crud::Tone, App, Element};
use iced::{
	widget::{text, Column},
	Color
};

fn color(tone: Tone) -> Color {
	match tone {
		Tone::Success => Color::from_rgb(0.35, 0.8, 0.45),
		Tone::Info => Color::from_rgb(0.5, 0.7, 1.0),
		Tone::Error => Color::from_rgb(0.95, 0.35, 0.35)
	}
}

pub fn view(app: &App) -> Element<'_> {
	app.notifications
		.active()
		.iter()
		.fold(Column::new().spacing(app.em / 4), |column, notification| {
			column.push(text(&notification.text).style(color(notification.tone)))
		})
		.into()
}
