use crate::api::ListItem;

#[derive(Clone, Debug, PartialEq)]
pub struct OrderLine {
	pub id: String,
	pub name: String,
	pub price: Option<f64>,
	pub quantity: u32
}

/// Snacks and drinks picked by a signed in user.
#[derive(Debug, Default)]
pub struct Basket {
	lines: Vec<OrderLine>
}

impl Basket {
	pub fn add(&mut self, item: &ListItem) {
		match self.lines.iter_mut().find(|line| line.id == item.id) {
			Some(line) => line.quantity += 1,
			None => self.lines.push(OrderLine {
				id: item.id.clone(),
				name: item.name.clone(),
				price: item.price,
				quantity: 1
			})
		}
	}

	pub fn count(&self) -> u32 {
		self.lines.iter().map(|line| line.quantity).sum()
	}

	/// sum of all known prices
	pub fn total(&self) -> f64 {
		self.lines
			.iter()
			.filter_map(|line| line.price.map(|price| price * f64::from(line.quantity)))
			.sum()
	}

	pub fn clear(&mut self) {
		self.lines.clear();
	}
}
