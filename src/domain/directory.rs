//! Directory filtering, ranking, and pagination
//!
//! The pure core behind the public professional directory. Given the
//! full listing set, a filter (selected category, selected city,
//! free-text query) produces a stable filtered view; pagination slices
//! that view into fixed-size pages; and the geo helpers rank entries by
//! great-circle distance from a caller-supplied origin.
//!
//! Filter predicates apply in a fixed order: city containment
//! (case-insensitive, with the "All" sentinel bypassing the check),
//! then category equality, then free-text substring match across the
//! provider's name, address, serviced cities, and the localized name of
//! its category. Filtering never reorders entries, so ties keep their
//! original positions.
//!
//! [`DirectoryView`] models the client-held view state (active filter +
//! current page); the HTTP listing is stateless, so the view type is
//! exercised by the test suite.

#![allow(dead_code)]

use crate::domain::catalog::{self, Language, CITY_ALL};
use crate::domain::professionals::Professional;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Great-circle distance between two points, in kilometers (haversine).
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Filter state for a directory view.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryFilter {
    /// Selected category id, if any
    pub category: Option<String>,
    /// Selected city; [`CITY_ALL`] disables the city predicate
    pub city: String,
    /// Free-text query, matched lowercased and trimmed
    pub query: String,
    /// Locale used to resolve category display names for text search
    pub lang: Language,
}

impl Default for DirectoryFilter {
    fn default() -> Self {
        Self {
            category: None,
            city: CITY_ALL.to_string(),
            query: String::new(),
            lang: Language::default(),
        }
    }
}

impl DirectoryFilter {
    /// Whether a single entry passes every active predicate.
    pub fn matches(&self, pro: &Professional) -> bool {
        // 1. City containment, case-insensitive; "All" bypasses the check
        if self.city != CITY_ALL
            && !pro
                .service_cities
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&self.city))
        {
            return false;
        }

        // 2. Category equality
        if let Some(category) = &self.category {
            if &pro.service_id != category {
                return false;
            }
        }

        // 3. Free-text substring match
        let query = self.query.trim().to_lowercase();
        if !query.is_empty() {
            let name_hit = pro.name.to_lowercase().contains(&query);
            let address_hit = pro
                .address
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(&query));
            let city_hit = pro
                .service_cities
                .iter()
                .any(|c| c.to_lowercase().contains(&query));
            let category_hit = catalog::find(&pro.service_id)
                .is_some_and(|cat| cat.name(self.lang).to_lowercase().contains(&query));

            if !(name_hit || address_hit || city_hit || category_hit) {
                return false;
            }
        }

        true
    }

    /// Apply the filter, preserving the input order.
    pub fn apply<'a>(&self, pros: &'a [Professional]) -> Vec<&'a Professional> {
        pros.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Number of pages a list of `len` items occupies at `per_page` items each.
pub fn total_pages(len: usize, per_page: u32) -> u32 {
    (len as u64).div_ceil(per_page.max(1) as u64) as u32
}

/// The slice of `items` visible on 1-indexed `page`.
///
/// Pages past the end are empty, never an error.
pub fn page_slice<T>(items: &[T], page: u32, per_page: u32) -> &[T] {
    let per_page = per_page.max(1) as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

/// Rank `pros` by ascending distance from `origin` and keep the closest `n`.
///
/// Entries without coordinates are skipped. The sort is stable, so equal
/// distances keep their original order.
pub fn nearest<'a>(
    origin: Coordinates,
    pros: &'a [Professional],
    n: usize,
) -> Vec<(&'a Professional, f64)> {
    let mut ranked: Vec<(&Professional, f64)> = pros
        .iter()
        .filter_map(|p| p.coordinates().map(|c| (p, haversine_km(origin, c))))
        .collect();

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.truncate(n);
    ranked
}

/// Client-visible directory state: the active filter plus the current page.
///
/// Every filter mutation produces a view positioned back at page 1; only
/// explicit page navigation moves it. Query updates additionally run the
/// catalog matcher and can auto-select a category.
#[derive(Debug, Clone, Default)]
pub struct DirectoryView {
    filter: DirectoryFilter,
    page: u32,
}

impl DirectoryView {
    pub fn new(filter: DirectoryFilter) -> Self {
        Self { filter, page: 1 }
    }

    pub fn filter(&self) -> &DirectoryFilter {
        &self.filter
    }

    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Select a category; selecting the active one again clears it.
    pub fn toggle_category(&mut self, category_id: &str) {
        if self.filter.category.as_deref() == Some(category_id) {
            self.filter.category = None;
        } else {
            self.filter.category = Some(category_id.to_string());
        }
        self.page = 1;
    }

    pub fn set_city(&mut self, city: &str) {
        self.filter.city = city.to_string();
        self.page = 1;
    }

    /// Update the free-text query, auto-selecting the category the
    /// catalog matcher resolves it to (if any).
    pub fn set_query(&mut self, query: &str) {
        self.filter.query = query.to_string();
        if let Some(cat) = catalog::match_query(query) {
            self.filter.category = Some(cat.id.to_string());
        }
        self.page = 1;
    }

    /// The current page of the filtered listing.
    pub fn current_page<'a>(&self, pros: &'a [Professional], per_page: u32) -> Vec<&'a Professional> {
        let filtered = self.filter.apply(pros);
        page_slice(&filtered, self.page(), per_page).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn pro(name: &str, service_id: &str, cities: &[&str]) -> Professional {
        Professional {
            id: Uuid::new_v4(),
            name: name.to_string(),
            service_id: service_id.to_string(),
            service_cities: cities.iter().map(|c| c.to_string()).collect(),
            address: None,
            phone: None,
            rating: 4.5,
            lat: None,
            lng: None,
            created_at: Utc::now(),
        }
    }

    fn pro_at(name: &str, service_id: &str, lat: f64, lng: f64) -> Professional {
        Professional {
            lat: Some(lat),
            lng: Some(lng),
            ..pro(name, service_id, &["Casablanca"])
        }
    }

    fn sample_listing() -> Vec<Professional> {
        vec![
            pro("Youssef El-Amrani", "plumbing", &["Casablanca"]),
            pro("Fatima Zahra", "electrical", &["Rabat"]),
            pro("Ahmed Bouzid", "painting", &["Marrakech"]),
            pro("Khadija Mansouri", "carpentry", &["Casablanca", "Rabat"]),
            pro("Mehdi Bennani", "general_repair", &["Tanger"]),
            pro("Salma Alami", "assembly", &["Agadir"]),
            pro("Omar Chraibi", "plumbing", &["Rabat"]),
            pro("Leila Fassi", "electrical", &["Casablanca"]),
            pro("Hassan Idrissi", "plumbing", &["Marrakech"]),
            pro("Nadia Berrada", "painting", &["Rabat"]),
            pro("Karim Tazi", "carpentry", &["Agadir", "Marrakech"]),
            pro("Sofia Lahlou", "assembly", &["Casablanca"]),
        ]
    }

    #[test]
    fn city_all_is_a_no_op() {
        let pros = sample_listing();
        let filter = DirectoryFilter::default();
        assert_eq!(filter.apply(&pros).len(), pros.len());
    }

    #[test]
    fn city_filter_is_case_insensitive_containment() {
        let pros = sample_listing();
        let filter = DirectoryFilter {
            city: "rabat".to_string(),
            ..Default::default()
        };
        let filtered = filter.apply(&pros);
        assert_eq!(filtered.len(), 4);
        assert!(filtered
            .iter()
            .all(|p| p.service_cities.iter().any(|c| c.eq_ignore_ascii_case("rabat"))));
    }

    #[test]
    fn category_filter_keeps_equal_ids_only() {
        let pros = sample_listing();
        let filter = DirectoryFilter {
            category: Some("plumbing".to_string()),
            ..Default::default()
        };
        let filtered = filter.apply(&pros);
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|p| p.service_id == "plumbing"));
    }

    #[test]
    fn query_matches_name_city_and_localized_category() {
        let pros = sample_listing();

        let by_name = DirectoryFilter {
            query: "fatima".to_string(),
            ..Default::default()
        };
        assert_eq!(by_name.apply(&pros).len(), 1);

        let by_city = DirectoryFilter {
            query: "tanger".to_string(),
            ..Default::default()
        };
        assert_eq!(by_city.apply(&pros).len(), 1);

        // French is the default locale; "plomberie" hits every plumber
        let by_category = DirectoryFilter {
            query: "plomberie".to_string(),
            ..Default::default()
        };
        assert_eq!(by_category.apply(&pros).len(), 3);
    }

    #[test]
    fn empty_filtered_result_is_an_empty_page() {
        let pros = sample_listing();
        let filter = DirectoryFilter {
            query: "does-not-exist".to_string(),
            ..Default::default()
        };
        let filtered = filter.apply(&pros);
        assert!(filtered.is_empty());
        assert_eq!(total_pages(filtered.len(), 5), 0);
        assert!(page_slice(&filtered, 1, 5).is_empty());
    }

    #[test]
    fn pagination_partitions_the_filtered_list() {
        let pros = sample_listing();
        let filter = DirectoryFilter::default();
        let filtered = filter.apply(&pros);
        assert_eq!(filtered.len(), 12);

        let per_page = 5;
        assert_eq!(total_pages(filtered.len(), per_page), 3);

        let sizes: Vec<usize> = (1..=3)
            .map(|page| page_slice(&filtered, page, per_page).len())
            .collect();
        assert_eq!(sizes, vec![5, 5, 2]);

        // Concatenating all pages in order reproduces the filtered list
        let concat: Vec<&Professional> = (1..=3)
            .flat_map(|page| page_slice(&filtered, page, per_page).iter().copied())
            .collect();
        let concat_ids: Vec<Uuid> = concat.iter().map(|p| p.id).collect();
        let filtered_ids: Vec<Uuid> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(concat_ids, filtered_ids);
    }

    #[test]
    fn city_match_of_three_fits_one_page() {
        let pros = sample_listing();
        let filter = DirectoryFilter {
            city: "Marrakech".to_string(),
            ..Default::default()
        };
        let filtered = filter.apply(&pros);
        assert_eq!(filtered.len(), 3);
        assert_eq!(total_pages(filtered.len(), 5), 1);
        assert_eq!(page_slice(&filtered, 1, 5).len(), 3);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let pros = sample_listing();
        let filtered = DirectoryFilter::default().apply(&pros);
        assert!(page_slice(&filtered, 4, 5).is_empty());
        assert!(page_slice(&filtered, 100, 5).is_empty());
    }

    #[test]
    fn filtering_preserves_input_order() {
        let pros = sample_listing();
        let filter = DirectoryFilter {
            category: Some("electrical".to_string()),
            ..Default::default()
        };
        let names: Vec<&str> = filter.apply(&pros).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Fatima Zahra", "Leila Fassi"]);
    }

    #[test]
    fn haversine_is_symmetric_and_zero_at_identity() {
        let casablanca = Coordinates {
            lat: 33.5731,
            lng: -7.5898,
        };
        let rabat = Coordinates {
            lat: 34.0209,
            lng: -6.8416,
        };

        let there = haversine_km(casablanca, rabat);
        let back = haversine_km(rabat, casablanca);
        assert!((there - back).abs() < 1e-9);
        assert_eq!(haversine_km(casablanca, casablanca), 0.0);

        // Casablanca-Rabat is roughly 87 km as the crow flies
        assert!((there - 87.0).abs() < 5.0, "got {there} km");
    }

    #[test]
    fn nearest_ranks_ascending_and_takes_top_five() {
        let origin = Coordinates {
            lat: 33.5731,
            lng: -7.5898,
        };
        let pros = vec![
            pro_at("Rabat pro", "plumbing", 34.0209, -6.8416),
            pro_at("Marrakech pro", "plumbing", 31.6295, -7.9811),
            pro_at("Casablanca pro", "plumbing", 33.5731, -7.5898),
            pro_at("Tanger pro", "plumbing", 35.7595, -5.8340),
            pro_at("Agadir pro", "plumbing", 30.4278, -9.5981),
            pro_at("Fes pro", "plumbing", 34.0331, -5.0003),
            pro("No coords", "plumbing", &["Casablanca"]),
        ];

        let ranked = nearest(origin, &pros, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].0.name, "Casablanca pro");
        assert!(ranked.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!(ranked.iter().all(|(p, _)| p.name != "No coords"));
    }

    #[test]
    fn any_filter_change_resets_the_page() {
        let mut view = DirectoryView::default();
        view.set_page(3);
        view.set_city("Rabat");
        assert_eq!(view.page(), 1);

        view.set_page(2);
        view.toggle_category("plumbing");
        assert_eq!(view.page(), 1);
        assert_eq!(view.filter().category.as_deref(), Some("plumbing"));

        view.set_page(2);
        view.set_query("fatima");
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn toggling_the_active_category_clears_it() {
        let mut view = DirectoryView::default();
        view.toggle_category("painting");
        assert_eq!(view.filter().category.as_deref(), Some("painting"));
        view.toggle_category("painting");
        assert_eq!(view.filter().category, None);
    }

    #[test]
    fn query_update_can_auto_select_a_category() {
        let mut view = DirectoryView::default();
        view.set_query("menuiserie");
        assert_eq!(view.filter().category.as_deref(), Some("carpentry"));

        // Too short to match: query applies but the category stays
        view.set_query("me");
        assert_eq!(view.filter().category.as_deref(), Some("carpentry"));
        assert_eq!(view.filter().query, "me");
    }

    #[test]
    fn view_serves_the_current_page_of_the_filtered_list() {
        let pros = sample_listing();
        let mut view = DirectoryView::default();
        view.set_city("Casablanca");

        let page = view.current_page(&pros, 3);
        assert_eq!(page.len(), 3);

        view.set_page(2);
        let page = view.current_page(&pros, 3);
        assert_eq!(page.len(), 1); // 4 Casablanca entries in total
    }
}
