/// Something the search box can match against.
pub trait Searchable {
	/// text fields which are searched; an item matches if any field does
	fn search_fields(&self) -> Vec<&str>;
}

pub fn normalize(text: &str) -> String {
	text.to_lowercase()
}

pub fn matches<T: Searchable + ?Sized>(item: &T, query: &str) -> bool {
	let needle = normalize(query.trim());
	item.search_fields()
		.into_iter()
		.any(|field| normalize(field).contains(&needle))
}

/// all items matching `query`, in their original order
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
	items.iter().filter(|item| matches(*item, query)).collect()
}
