/// Identifies one issued request.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Ticket(u64);

/// Hands out increasing tickets, so only the answer to the latest request is used.
/// Answers may arrive in any order; everything but the latest ticket is stale.
#[derive(Debug, Default)]
pub struct RequestTracker {
	latest: u64
}

impl RequestTracker {
	pub fn issue(&mut self) -> Ticket {
		self.latest += 1;
		Ticket(self.latest)
	}

	pub fn is_current(&self, ticket: Ticket) -> bool {
		ticket.0 == self.latest
	}

	/// invalidate every outstanding ticket, e.g. when the owning screen is left
	pub fn cancel(&mut self) {
		self.latest += 1;
	}
}
