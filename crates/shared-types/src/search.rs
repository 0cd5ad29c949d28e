/// Records that can be narrowed by the free-text search box.
pub trait Searchable {
    /// Text fields the query is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

/// True when every whitespace-separated term of `query` appears,
/// case-insensitively, in at least one of the item's fields.
/// A blank query matches everything.
pub fn matches_query<T: Searchable + ?Sized>(item: &T, query: &str) -> bool {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() {
        return true;
    }
    let fields: Vec<String> = item
        .search_fields()
        .into_iter()
        .map(str::to_lowercase)
        .collect();
    terms
        .iter()
        .all(|term| fields.iter().any(|field| field.contains(term.as_str())))
}

/// Keep the items matching `query`, preserving order.
pub fn filter_by_query<T: Searchable>(items: Vec<T>, query: &str) -> Vec<T> {
    if query.trim().is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| matches_query(item, query))
        .collect()
}
