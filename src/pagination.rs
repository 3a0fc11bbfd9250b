use serde::Serialize;

/// The number of posts shown on every paginated listing.
pub const PAGE_SIZE: i64 = 10;

/// Splits a collection of `count` items into pages of `per_page`.
///
/// There is always at least one page, even for an empty collection.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
	count: i64,
	per_page: i64,
}

impl Paginator {
	pub fn new(count: i64, per_page: i64) -> Self {
		Self {
			count: count.max(0),
			per_page: per_page.max(1),
		}
	}

	pub fn num_pages(&self) -> i64 {
		((self.count + self.per_page - 1) / self.per_page).max(1)
	}

	/// Resolves the raw `page` query value into a valid page.
	///
	/// Values that are not integers resolve to the first page, and
	/// out-of-range values clamp to the first or last page.
	pub fn locate(&self, requested: Option<&str>) -> Window {
		let number = requested
			.and_then(|page| page.trim().parse::<i64>().ok())
			.unwrap_or(1)
			.clamp(1, self.num_pages());

		Window {
			number,
			num_pages: self.num_pages(),
			count: self.count,
			per_page: self.per_page,
		}
	}
}

/// A resolved page, before its items have been fetched.
#[derive(Debug, Clone, Copy)]
pub struct Window {
	pub number: i64,
	pub num_pages: i64,
	pub count: i64,
	per_page: i64,
}

impl Window {
	pub fn offset(&self) -> i64 {
		(self.number - 1) * self.per_page
	}

	pub fn limit(&self) -> i64 {
		self.per_page
	}

	pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
		Page {
			items,
			number: self.number,
			num_pages: self.num_pages,
			count: self.count,
			has_next: self.number < self.num_pages,
			has_previous: self.number > 1,
			next_page_number: (self.number < self.num_pages).then_some(self.number + 1),
			previous_page_number: (self.number > 1).then_some(self.number - 1),
		}
	}
}

/// One page of a listing, with enough metadata to render navigation.
#[derive(Debug, Serialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub number: i64,
	pub num_pages: i64,
	pub count: i64,
	pub has_next: bool,
	pub has_previous: bool,
	pub next_page_number: Option<i64>,
	pub previous_page_number: Option<i64>,
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_num_pages() {
		assert_eq!(Paginator::new(0, 10).num_pages(), 1);
		assert_eq!(Paginator::new(10, 10).num_pages(), 1);
		assert_eq!(Paginator::new(11, 10).num_pages(), 2);
		assert_eq!(Paginator::new(13, 10).num_pages(), 2);
	}

	#[test]
	fn test_window_offset() {
		let paginator = Paginator::new(25, 10);

		assert_eq!(paginator.locate(None).offset(), 0);
		assert_eq!(paginator.locate(Some("2")).offset(), 10);
		assert_eq!(paginator.locate(Some("3")).offset(), 20);
		assert_eq!(paginator.locate(Some("3")).limit(), 10);
	}

	#[test]
	fn test_out_of_range_clamps() {
		let paginator = Paginator::new(25, 10);

		assert_eq!(paginator.locate(Some("0")).number, 1);
		assert_eq!(paginator.locate(Some("-4")).number, 1);
		assert_eq!(paginator.locate(Some("99")).number, 3);
	}

	#[test]
	fn test_garbage_is_first_page() {
		let paginator = Paginator::new(25, 10);

		assert_eq!(paginator.locate(Some("last")).number, 1);
		assert_eq!(paginator.locate(Some("")).number, 1);
	}

	#[test]
	fn test_page_metadata() {
		let paginator = Paginator::new(13, PAGE_SIZE);

		let first = paginator.locate(Some("1")).into_page(vec![0; 10]);
		assert!(first.has_next);
		assert!(!first.has_previous);
		assert_eq!(first.next_page_number, Some(2));
		assert_eq!(first.previous_page_number, None);

		let last = paginator.locate(Some("2")).into_page(vec![0; 3]);
		assert!(!last.has_next);
		assert!(last.has_previous);
		assert_eq!(last.previous_page_number, Some(1));
		assert_eq!(last.items.len(), 3);
	}

	#[test]
	fn test_empty_collection_has_one_page() {
		let page = Paginator::new(0, PAGE_SIZE).locate(Some("5")).into_page(Vec::<i64>::new());

		assert_eq!(page.number, 1);
		assert_eq!(page.num_pages, 1);
		assert!(!page.has_next);
		assert!(!page.has_previous);
	}
}
