use crate::{
	images::{ImageDirs, DEFAULT_ORIGIN},
	listing::DEFAULT_PAGE_SIZE,
	DIRS
};
use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
	env,
	path::{Path, PathBuf},
	time::Duration
};

pub const SETTINGS_ENV: &str = "CINEMATE_SETTINGS";
pub const ORIGIN_ENV: &str = "CINEMATE_API_ORIGIN";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Settings {
	/// backend, also used for `Images/...` references
	pub api_origin: String,
	/// entries per page while not searching
	pub page_size: usize,
	/// `PageSize` sent when fetching snacks and drinks
	pub fetch_size: u32,
	pub search_debounce_ms: u64,
	/// how long notifications stay visible
	pub notification_ms: u64,
	pub max_cached_images: usize,
	/// root of the local `/images` assets; defaults to the data dir
	pub assets_dir: Option<PathBuf>
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			api_origin: DEFAULT_ORIGIN.to_owned(),
			page_size: DEFAULT_PAGE_SIZE,
			fetch_size: 1000,
			search_debounce_ms: 300,
			notification_ms: 3000,
			max_cached_images: 500,
			assets_dir: None
		}
	}
}

impl Settings {
	/// `$CINEMATE_SETTINGS`, or `settings.json` in the config dir
	pub fn path() -> PathBuf {
		match env::var_os(SETTINGS_ENV) {
			Some(path) => PathBuf::from(path),
			None => DIRS.config_dir().join("settings.json")
		}
	}

	/// Read settings from `path`. A missing file gives the defaults.
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		if !path.exists() {
			info!("no settings at {path:?}, using defaults");
			return Ok(Self::default());
		}
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read settings {path:?}"))?;
		let settings = serde_json::from_str(&text)
			.with_context(|| format!("failed to parse settings {path:?}"))?;
		Ok(settings)
	}

	pub fn with_origin(mut self, origin: Option<String>) -> Self {
		if let Some(origin) = origin.filter(|origin| !origin.trim().is_empty()) {
			self.api_origin = origin;
		}
		self
	}

	pub fn search_debounce(&self) -> Duration {
		Duration::from_millis(self.search_debounce_ms)
	}

	pub fn notification_delay(&self) -> Duration {
		Duration::from_millis(self.notification_ms)
	}

	pub fn image_dirs(&self) -> ImageDirs {
		ImageDirs {
			assets: self
				.assets_dir
				.clone()
				.unwrap_or_else(|| DIRS.data_dir().join("assets")),
			cache: DIRS.cache_dir().join("img")
		}
	}
}
