use super::filter::{filter, Searchable};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Search box and page position of one screen.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchState {
	query: String,
	current_page: usize,
	page_size: usize
}

impl Default for SearchState {
	fn default() -> Self {
		Self::new(DEFAULT_PAGE_SIZE)
	}
}

impl SearchState {
	pub fn new(page_size: usize) -> Self {
		Self {
			query: String::new(),
			current_page: 1,
			page_size: page_size.max(1)
		}
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	#[cfg(test)]
	pub fn current_page(&self) -> usize {
		self.current_page
	}

	/// a search disables pagination
	pub fn is_searching(&self) -> bool {
		!self.query.trim().is_empty()
	}

	/// Returns true if the query changed. Any change goes back to the first page.
	pub fn set_query(&mut self, query: impl Into<String>) -> bool {
		let query = query.into();
		if query == self.query {
			return false;
		}
		self.query = query;
		self.current_page = 1;
		true
	}
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
	len.div_ceil(page_size.max(1)).max(1)
}

/// Derived view of the list; recomputed for every draw.
#[derive(Debug)]
pub struct Page<'a, T> {
	pub items: Vec<&'a T>,
	pub current_page: usize,
	pub total_pages: usize,
	/// false while searching or if everything fits on one page
	pub show_controls: bool
}

/// Full list of a screen, as fetched, and the user's position in it.
#[derive(Debug)]
pub struct ListView<T> {
	items: Vec<T>,
	search: SearchState
}

impl<T: Searchable> Default for ListView<T> {
	fn default() -> Self {
		Self::new(DEFAULT_PAGE_SIZE)
	}
}

impl<T: Searchable> ListView<T> {
	pub fn new(page_size: usize) -> Self {
		Self {
			items: Vec::new(),
			search: SearchState::new(page_size)
		}
	}

	pub fn items(&self) -> &[T] {
		&self.items
	}

	pub fn search(&self) -> &SearchState {
		&self.search
	}

	/// replace the list wholesale, e.g. after a refetch
	pub fn replace(&mut self, items: Vec<T>) {
		self.items = items;
		let total = self.total_pages();
		self.search.current_page = self.search.current_page.clamp(1, total);
	}

	pub fn set_query(&mut self, query: impl Into<String>) -> bool {
		self.search.set_query(query)
	}

	pub fn total_pages(&self) -> usize {
		if self.search.is_searching() {
			1
		} else {
			total_pages(self.items.len(), self.search.page_size)
		}
	}

	/// Returns false, and does nothing, if `page` is out of range.
	pub fn go_to_page(&mut self, page: usize) -> bool {
		if page < 1 || page > self.total_pages() {
			return false;
		}
		self.search.current_page = page;
		true
	}

	pub fn next_page(&mut self) -> bool {
		self.go_to_page(self.search.current_page + 1)
	}

	pub fn previous_page(&mut self) -> bool {
		match self.search.current_page.checked_sub(1) {
			Some(page) => self.go_to_page(page),
			None => false
		}
	}

	pub fn page(&self) -> Page<'_, T> {
		if self.search.is_searching() {
			return Page {
				items: filter(&self.items, &self.search.query),
				current_page: 1,
				total_pages: 1,
				show_controls: false
			};
		}
		let total_pages = self.total_pages();
		let size = self.search.page_size;
		let start = (self.search.current_page - 1) * size;
		let items = self.items.iter().skip(start).take(size).collect();
		Page {
			items,
			current_page: self.search.current_page,
			total_pages,
			show_controls: total_pages > 1
		}
	}
}
