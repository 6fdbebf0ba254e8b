/// origin used when no other one is configured
pub const DEFAULT_ORIGIN: &str = "https://cinemate.runasp.net";

/// name the backend stores when no image was uploaded
pub const SENTINEL: &str = "default-movie.jpg";

/// image shown after an image failed to load
pub const FALLBACK: &str = "/images/fallback.png";

const SERVER_PREFIX: &str = "Images/";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ImageKind {
	Movie,
	Snack,
	User,
	Hall
}

impl ImageKind {
	pub fn placeholder(self) -> &'static str {
		match self {
			ImageKind::Movie => "/images/movies/placeholder.jpg",
			ImageKind::Snack => "/images/snacks/placeholder.png",
			ImageKind::User => "/images/users/avatar.png",
			ImageKind::Hall => "/images/halls/placeholder.jpg"
		}
	}

	/// local directory bare file names are served from
	pub fn asset_dir(self) -> &'static str {
		match self {
			ImageKind::Movie => "/images/movies/",
			ImageKind::Snack => "/images/snacks/",
			ImageKind::User => "/images/users/",
			ImageKind::Hall => "/images/halls/"
		}
	}
}

/// Maps raw image references of the backend to something displayable.
#[derive(Clone, Debug)]
pub struct ImageResolver {
	origin: String
}

impl Default for ImageResolver {
	fn default() -> Self {
		Self::new(DEFAULT_ORIGIN)
	}
}

impl ImageResolver {
	pub fn new(origin: &str) -> Self {
		Self {
			origin: origin.trim_end_matches('/').to_owned()
		}
	}

	/// Never fails and never returns an empty string.
	/// Rules are checked in order: missing/sentinel, server relative, absolute, bare file name.
	pub fn resolve(&self, raw: Option<&str>, kind: ImageKind) -> String {
		let raw = raw.map(str::trim).unwrap_or_default();
		if raw.is_empty() || raw == SENTINEL {
			kind.placeholder().to_owned()
		} else if raw.starts_with(SERVER_PREFIX) {
			format!("{}/{raw}", self.origin)
		} else if raw.starts_with("http") {
			raw.to_owned()
		} else {
			format!("{}{raw}", kind.asset_dir())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn resolve(raw: Option<&str>, kind: ImageKind) -> String {
		ImageResolver::default().resolve(raw, kind)
	}

	const KINDS: [ImageKind; 4] = [
		ImageKind::Movie,
		ImageKind::Snack,
		ImageKind::User,
		ImageKind::Hall
	];

	#[test]
	fn missing_and_sentinel_use_placeholder() {
		let placeholder = ImageKind::Snack.placeholder();
		assert_eq!(resolve(Some(""), ImageKind::Snack), placeholder);
		assert_eq!(resolve(None, ImageKind::Snack), placeholder);
		assert_eq!(resolve(Some(SENTINEL), ImageKind::Snack), placeholder);
	}

	#[test]
	fn server_relative_is_joined_onto_origin() {
		assert_eq!(
			resolve(Some("Images/foo.png"), ImageKind::Movie),
			format!("{DEFAULT_ORIGIN}/Images/foo.png")
		);
		let resolver = ImageResolver::new("http://localhost:5000/");
		assert_eq!(
			resolver.resolve(Some("Images/foo.png"), ImageKind::Hall),
			"http://localhost:5000/Images/foo.png"
		);
	}

	#[test]
	fn absolute_urls_pass_through() {
		assert_eq!(
			resolve(Some("http://x/y.png"), ImageKind::Movie),
			"http://x/y.png"
		);
		assert_eq!(
			resolve(Some("https://cdn.example/p.jpg"), ImageKind::User),
			"https://cdn.example/p.jpg"
		);
	}

	#[test]
	fn bare_file_names_use_local_assets() {
		assert_eq!(
			resolve(Some("bar.png"), ImageKind::Snack),
			"/images/snacks/bar.png"
		);
		assert_eq!(
			resolve(Some("poster.jpg"), ImageKind::Movie),
			"/images/movies/poster.jpg"
		);
	}

	#[test]
	fn never_empty() {
		for kind in KINDS {
			for raw in [None, Some(""), Some("  "), Some(SENTINEL), Some("a"), Some("Images/")] {
				assert!(!resolve(raw, kind).is_empty(), "{raw:?} {kind:?}");
			}
		}
	}
}
