use super::resolver::FALLBACK;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadState {
	Loading,
	Loaded,
	Failed
}

/// State of one displayed image.
/// Starts as [`LoadState::Loading`] and ends in either `Loaded` or `Failed`.
/// Once ended, no further event changes it until it is remounted.
#[derive(Clone, Debug)]
pub struct ImageSlot {
	src: String,
	state: LoadState
}

impl ImageSlot {
	pub fn new(src: impl Into<String>) -> Self {
		Self {
			src: src.into(),
			state: LoadState::Loading
		}
	}

	pub fn state(&self) -> LoadState {
		self.state
	}

	/// source which should be drawn
	pub fn displayed_src(&self) -> &str {
		match self.state {
			LoadState::Failed => FALLBACK,
			_ => &self.src
		}
	}

	pub fn spinner_visible(&self) -> bool {
		self.state == LoadState::Loading
	}

	pub fn opacity(&self) -> f32 {
		match self.state {
			LoadState::Loading => 0.0,
			_ => 1.0
		}
	}

	pub fn on_load(&mut self) {
		if self.state == LoadState::Loading {
			self.state = LoadState::Loaded;
		}
	}

	pub fn on_error(&mut self) {
		if self.state == LoadState::Loading {
			self.state = LoadState::Failed;
		}
	}

	/// Show `src` again, e.g. when its screen is opened anew.
	/// A new source or a failed one starts over as `Loading`; returns true if it did.
	pub fn remount(&mut self, src: &str) -> bool {
		if self.src == src && self.state != LoadState::Failed {
			return false;
		}
		*self = Self::new(src);
		true
	}
}
