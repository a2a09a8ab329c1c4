pub const POPULAR_CITIES: [&str; 15] = [
    "London", "New York", "Tokyo", "Paris", "Dubai", "Singapore", "Hong Kong", "Sydney",
    "Toronto", "Berlin", "Mumbai", "Bangkok", "Istanbul", "Moscow", "Rome",
];

const QUICK_PICKS: usize = 5;

/// Popular cities containing `query`, ignoring case. An empty query offers
/// the first few popular cities instead.
pub fn suggestions(query: &str) -> Vec<&'static str> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return POPULAR_CITIES[..QUICK_PICKS].to_vec();
    }
    POPULAR_CITIES
        .iter()
        .copied()
        .filter(|city| city.to_lowercase().contains(&query))
        .collect()
}

#[test]
fn test_suggestions() {
    assert_eq!(suggestions("on"), ["London", "Hong Kong", "Toronto"]);
    assert_eq!(suggestions("NEW"), ["New York"]);
    assert_eq!(suggestions("xyz"), Vec::<&str>::new());
    assert_eq!(suggestions(""), ["London", "New York", "Tokyo", "Paris", "Dubai"]);
}
