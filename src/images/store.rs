use super::{
	loader::{ImageSlot, LoadState},
	resolver::FALLBACK
};
use crate::{Message, CLIENT};
use anyhow::Context;
use iced::{widget::image::Handle, Command};
use log::{debug, info, warn};
use parking_lot::Mutex;
use reqwest::Url;
use rustc_hash::{FxHashMap, FxHashSet};
use std::{
	collections::BTreeMap,
	path::{Path, PathBuf},
	sync::Arc
};
use tokio::fs;

/// Where images are read from and downloaded to.
#[derive(Clone, Debug)]
pub struct ImageDirs {
	/// root of the local `/images/...` assets
	pub assets: PathBuf,
	/// remote images are downloaded here
	pub cache: PathBuf
}

impl ImageDirs {
	/// file backing a source, either a local asset or the download location
	pub fn file_for(&self, src: &str) -> anyhow::Result<PathBuf> {
		if src.starts_with("http") {
			let url = Url::parse(src).with_context(|| format!("invalid image url {src:?}"))?;
			Ok(url_to_file(&self.cache, &url))
		} else {
			Ok(self.assets.join(src.trim_start_matches('/')))
		}
	}
}

/// What the view needs to draw one image.
#[derive(Clone, Debug)]
pub struct ImageView {
	pub slot: ImageSlot,
	pub handle: Option<Handle>
}

#[derive(Debug)]
struct Entry {
	slot: ImageSlot,
	handle: Option<Handle>
}

#[derive(Debug, Default)]
/// Since [`crate::App::view`] has only readonly access,
/// the access times, which must be updated while drawing, live behind a Mutex.
struct Inner {
	/// maps the source to (last_access_time, entry)
	data: FxHashMap<Arc<str>, (u64, Entry)>,
	/// maps the last access time to the key used in the HashMap
	last_access: BTreeMap<u64, Arc<str>>,
	time: u64
}

impl Inner {
	fn touch(&mut self, src: &str) {
		let Some((time, _)) = self.data.get_mut(src) else {
			return;
		};
		let old = std::mem::replace(time, self.time);
		let key = self
			.last_access
			.remove(&old)
			.unwrap_or_else(|| Arc::from(src));
		self.last_access.insert(self.time, key);
		self.time += 1;
	}
}

/// Keeps loaded images in memory.
/// Remote images are downloaded to disk once, local assets are read directly.
/// If full, the least recently drawn images are dropped and loaded again when needed.
#[derive(Debug)]
pub struct ImageStore {
	dirs: ImageDirs,
	inner: Mutex<Inner>,
	max_size: usize,
	fallback: Handle
}

impl ImageStore {
	pub fn new(dirs: ImageDirs, max_size: usize) -> Self {
		let fallback = Handle::from_path(dirs.assets.join(FALLBACK.trim_start_matches('/')));
		Self {
			dirs,
			inner: Default::default(),
			max_size: max_size.max(1),
			fallback
		}
	}

	/// Start loading `src`, unless it is already loaded or loading.
	/// A failed source is tried again.
	/// The result arrives as [`Message::ImageLoaded`].
	pub fn request(&mut self, src: &str) -> Option<Command<Message>> {
		let inner = self.inner.get_mut();
		let retry = inner.data.get_mut(src).map(|(_, entry)| {
			let reset = entry.slot.remount(src);
			if reset {
				entry.handle = None;
			}
			reset
		});
		match retry {
			Some(false) => {
				inner.touch(src);
				return None;
			},
			Some(true) => {
				debug!("retry image {src:?}");
				inner.touch(src);
			},
			None => {
				let entry = Entry {
					slot: ImageSlot::new(src),
					handle: None
				};
				let key: Arc<str> = Arc::from(src);
				inner.last_access.insert(inner.time, key.clone());
				inner.data.insert(key, (inner.time, entry));
				inner.time += 1;
			}
		}
		let key: Arc<str> = Arc::from(src);
		let dirs = self.dirs.clone();
		Some(Command::perform(
			load_image(key.clone(), dirs),
			move |res| Message::ImageLoaded(key, res.map_err(|err| format!("{err:#}")))
		))
	}

	pub fn request_all<'a>(&mut self, srcs: impl IntoIterator<Item = &'a str>) -> Command<Message> {
		let commands: Vec<_> = srcs
			.into_iter()
			.filter_map(|src| self.request(src))
			.collect();
		Command::batch(commands)
	}

	/// Insert the outcome of a load.
	/// Should be called when [`Message::ImageLoaded`] was sent.
	pub fn callback(&mut self, src: &str, result: Result<Handle, String>) {
		let fallback = self.fallback.clone();
		// entries are not evicted while loading, so `None` means it was never requested
		if let Some((_time, entry)) = self.inner.get_mut().data.get_mut(src) {
			match result {
				Ok(handle) => {
					entry.slot.on_load();
					if entry.slot.state() == LoadState::Loaded {
						entry.handle = Some(handle);
					}
				},
				Err(err) => {
					warn!("failed to load image {src:?}: {err}");
					entry.slot.on_error();
					entry.handle = Some(fallback);
				}
			}
		}
	}

	/// current state of `src`; marks it as recently used
	pub fn get(&self, src: &str) -> ImageView {
		let mut guard = self.inner.lock();
		guard.touch(src);
		match guard.data.get(src) {
			Some((_, entry)) => ImageView {
				slot: entry.slot.clone(),
				handle: entry.handle.clone()
			},
			None => ImageView {
				slot: ImageSlot::new(src),
				handle: None
			}
		}
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.inner.lock().data.len()
	}

	/// Drop the least recently used images until at most `max_size` are left.
	/// Images still loading and the ones in `keep` are never dropped,
	/// so the store may stay above `max_size` while they are in use.
	pub fn cache_replacement<'a>(&mut self, keep: impl IntoIterator<Item = &'a str>) {
		let keep: FxHashSet<&str> = keep.into_iter().collect();
		let inner = self.inner.get_mut();
		let excess = inner.data.len().saturating_sub(self.max_size);
		if excess == 0 {
			return;
		}
		// oldest first
		let evict: Vec<(u64, Arc<str>)> = inner
			.last_access
			.iter()
			.filter(|(_, key)| {
				!keep.contains(&***key)
					&& inner
						.data
						.get(&***key)
						.is_some_and(|(_, entry)| entry.slot.state() != LoadState::Loading)
			})
			.take(excess)
			.map(|(time, key)| (*time, key.clone()))
			.collect();
		for (time, key) in evict {
			debug!("evict image {key:?}");
			inner.last_access.remove(&time);
			inner.data.remove(&key);
		}
	}
}

pub async fn load_image(src: Arc<str>, dirs: ImageDirs) -> anyhow::Result<Handle> {
	let path = dirs.file_for(&src)?;
	if src.starts_with("http") && !path.exists() {
		download_file(&src, &path).await?;
	}
	let data = fs::read(&path)
		.await
		.with_context(|| format!("failed to read file {path:?}"))?;
	Ok(Handle::from_memory(data))
}

async fn download_file(url: &str, path: &Path) -> anyhow::Result<()> {
	info!("download {url:?}");
	let img = CLIENT
		.get(url)
		.send()
		.await?
		.error_for_status()?
		.bytes()
		.await?;
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)
			.await
			.with_context(|| format!("failed to create {parent:?}"))?;
	}
	fs::write(path, img)
		.await
		.with_context(|| format!("failed to write to {path:?}"))?;
	Ok(())
}

pub fn url_to_file(cache: &Path, url: &Url) -> PathBuf {
	let extension = PathBuf::from(url.path());
	let extension = extension.extension();
	let path: String = url
		.as_str()
		.chars()
		.map(|char| if char.is_alphanumeric() { char } else { '_' })
		.collect();
	let mut path = cache.join(path);
	if let Some(extension) = extension {
		//extension is needed for the iced image widget
		path.set_extension(extension);
	}
	path
}
