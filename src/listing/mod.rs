mod filter;
mod paginator;
mod request;

pub use filter::Searchable;
pub use paginator::{ListView, Page, DEFAULT_PAGE_SIZE};
pub use request::{RequestTracker, Ticket};
