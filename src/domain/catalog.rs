//! Static service catalog
//!
//! The six home-service trades and the cities the platform serves are
//! compiled into the binary; they change with releases, not at runtime.
//! Category display names exist in the three supported locales, and the
//! free-text search box resolves queries against all of them.

use serde::{Deserialize, Serialize};

/// Supported display locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Fr,
    Ar,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::En),
            "fr" => Some(Self::Fr),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }

    pub const ALL: [Language; 3] = [Language::En, Language::Fr, Language::Ar];
}

/// One entry of the service catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceCategory {
    pub id: &'static str,
    name_en: &'static str,
    name_fr: &'static str,
    name_ar: &'static str,
}

impl ServiceCategory {
    pub fn name(&self, lang: Language) -> &'static str {
        match lang {
            Language::En => self.name_en,
            Language::Fr => self.name_fr,
            Language::Ar => self.name_ar,
        }
    }
}

pub static CATEGORIES: [ServiceCategory; 6] = [
    ServiceCategory {
        id: "plumbing",
        name_en: "Plumbing",
        name_fr: "Plomberie",
        name_ar: "السباكة",
    },
    ServiceCategory {
        id: "electrical",
        name_en: "Electrical",
        name_fr: "Électricité",
        name_ar: "الكهرباء",
    },
    ServiceCategory {
        id: "painting",
        name_en: "Painting",
        name_fr: "Peinture",
        name_ar: "الدهان",
    },
    ServiceCategory {
        id: "carpentry",
        name_en: "Carpentry",
        name_fr: "Menuiserie",
        name_ar: "النجارة",
    },
    ServiceCategory {
        id: "general_repair",
        name_en: "General Repair",
        name_fr: "Réparation Générale",
        name_ar: "إصلاحات عامة",
    },
    ServiceCategory {
        id: "assembly",
        name_en: "Furniture Assembly",
        name_fr: "Montage de Meubles",
        name_ar: "تركيب الأثاث",
    },
];

/// Sentinel meaning "no city filter".
pub const CITY_ALL: &str = "All";

/// Cities a professional can declare as serviced.
pub const CITIES: [&str; 7] = [
    "Casablanca",
    "Rabat",
    "Salé",
    "Marrakech",
    "Agadir",
    "Tanger",
    "Other",
];

/// Queries shorter than this never auto-select a category.
pub const MIN_MATCH_QUERY_LEN: usize = 3;

/// Look up a category by its id.
pub fn find(id: &str) -> Option<&'static ServiceCategory> {
    CATEGORIES.iter().find(|c| c.id == id)
}

pub fn is_known_city(city: &str) -> bool {
    CITIES.iter().any(|c| c.eq_ignore_ascii_case(city))
}

/// Resolve a free-text query to a category.
///
/// The normalized (lowercased, trimmed) query is matched by substring
/// against display names in every locale; the first catalog-order hit
/// wins. Queries below [`MIN_MATCH_QUERY_LEN`] characters never match.
pub fn match_query(query: &str) -> Option<&'static ServiceCategory> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_MATCH_QUERY_LEN {
        return None;
    }

    CATEGORIES.iter().find(|cat| {
        Language::ALL
            .iter()
            .any(|&lang| cat.name(lang).to_lowercase().contains(&query))
    })
}

/// Category as exposed over the API: id plus every localized name.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub id: &'static str,
    pub name: CategoryNames,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryNames {
    pub en: &'static str,
    pub fr: &'static str,
    pub ar: &'static str,
}

impl From<&'static ServiceCategory> for CategoryInfo {
    fn from(cat: &'static ServiceCategory) -> Self {
        Self {
            id: cat.id,
            name: CategoryNames {
                en: cat.name(Language::En),
                fr: cat.name(Language::Fr),
                ar: cat.name(Language::Ar),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_known_and_unknown_ids() {
        assert_eq!(find("plumbing").map(|c| c.id), Some("plumbing"));
        assert!(find("locksmith").is_none());
    }

    #[test]
    fn short_queries_never_match() {
        assert!(match_query("pl").is_none());
        assert!(match_query("  pl  ").is_none());
        assert!(match_query("").is_none());
    }

    #[test]
    fn matches_french_name() {
        let cat = match_query("plomberie").expect("should match");
        assert_eq!(cat.id, "plumbing");
    }

    #[test]
    fn matches_partial_english_name() {
        let cat = match_query("Elect").expect("should match");
        assert_eq!(cat.id, "electrical");
    }

    #[test]
    fn matches_arabic_name() {
        let cat = match_query("السباكة").expect("should match");
        assert_eq!(cat.id, "plumbing");
    }

    #[test]
    fn first_catalog_order_match_wins() {
        // "Peinture" and "Furniture Assembly" both contain "ure";
        // painting precedes assembly in catalog order
        let cat = match_query("ure").expect("should match");
        assert_eq!(cat.id, "painting");
    }

    #[test]
    fn city_check_is_case_insensitive() {
        assert!(is_known_city("casablanca"));
        assert!(is_known_city("Rabat"));
        assert!(!is_known_city("Paris"));
    }
}
