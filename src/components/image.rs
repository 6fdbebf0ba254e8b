use crate::{App, Element};
use iced::{
	widget::{container, image::Handle, text, Image},
	Length
};

/// Image with a loading indicator.
/// While loading, the indicator takes the place of the image; failed images show the fallback.
pub fn view<'a>(app: &'a App, src: &str, size: f32) -> Element<'a> {
	let image = app.images.get(src);
	match image.handle {
		Some(handle) if image.slot.opacity() > 0.0 => Image::<Handle>::new(handle)
			.width(Length::Fixed(size))
			.height(Length::Fixed(size))
			.into(),
		_ => {
			let label = if image.slot.spinner_visible() { "Loading…" } else { "" };
			container(text(label).size(12))
				.width(Length::Fixed(size))
				.height(Length::Fixed(size))
				.center_x()
				.center_y()
				.into()
		}
	}
}
