//! Free-text search parsing.
//!
//! Pulls structured filters (cities, employment types) out of a
//! natural-language query such as `"need a part time dentist in baghdad"` or
//! `"طبيب اسنان دوام جزئي في بغداد"`. Recognition is plain substring matching
//! against fixed bilingual dictionaries; the query itself is handed back
//! untouched.

use data_loader::EmploymentType;
use serde::Serialize;

/// Cities recognized in queries, lowercase, English then Arabic spellings.
/// Output order follows this list.
pub const KNOWN_LOCATIONS: &[&str] = &[
    "baghdad",
    "basra",
    "erbil",
    "mosul",
    "najaf",
    "karbala",
    "sulaymaniyah",
    "kirkuk",
    "duhok",
    "hilla",
    "nasiriyah",
    "ramadi",
    "diwaniyah",
    "samawah",
    "baqubah",
    "tikrit",
    "fallujah",
    "بغداد",
    "البصرة",
    "أربيل",
    "اربيل",
    "الموصل",
    "النجف",
    "كربلاء",
    "السليمانية",
    "كركوك",
    "دهوك",
    "الحلة",
    "الناصرية",
    "الرمادي",
    "الديوانية",
    "السماوة",
    "بعقوبة",
    "تكريت",
    "الفلوجة",
];

/// Phrase variants, lowercase, mapped to the employment type they denote.
pub const EMPLOYMENT_TYPE_PHRASES: &[(&str, EmploymentType)] = &[
    ("full time", EmploymentType::FullTime),
    ("full-time", EmploymentType::FullTime),
    ("fulltime", EmploymentType::FullTime),
    ("دوام كامل", EmploymentType::FullTime),
    ("الكامل", EmploymentType::FullTime),
    ("part time", EmploymentType::PartTime),
    ("part-time", EmploymentType::PartTime),
    ("parttime", EmploymentType::PartTime),
    ("دوام جزئي", EmploymentType::PartTime),
    ("الجزئي", EmploymentType::PartTime),
    ("contract", EmploymentType::Contract),
    ("عقد", EmploymentType::Contract),
    ("temporary", EmploymentType::Temporary),
    ("مؤقت", EmploymentType::Temporary),
];

/// Filters extracted from a free-text query.
///
/// `None` means "no constraint"; an extracted list is never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// The raw query exactly as typed
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<Vec<EmploymentType>>,
}

impl SearchFilters {
    /// Filters that only carry the query text
    pub fn query_only(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn has_structured_filters(&self) -> bool {
        self.location.is_some() || self.employment_type.is_some()
    }
}

/// Parse a free-text query into [`SearchFilters`].
///
/// Never fails: a query with nothing recognizable simply comes back with
/// only `query` set.
pub fn parse_smart_search(raw_query: &str) -> SearchFilters {
    let lowered = raw_query.to_lowercase();

    let mut locations: Vec<String> = Vec::new();
    for city in KNOWN_LOCATIONS {
        if lowered.contains(city) && !locations.iter().any(|found| found == city) {
            locations.push(city.to_string());
        }
    }

    let mut employment_types: Vec<EmploymentType> = Vec::new();
    for (phrase, employment_type) in EMPLOYMENT_TYPE_PHRASES {
        if lowered.contains(phrase) && !employment_types.contains(employment_type) {
            employment_types.push(*employment_type);
        }
    }

    SearchFilters {
        query: raw_query.to_string(),
        location: (!locations.is_empty()).then_some(locations),
        employment_type: (!employment_types.is_empty()).then_some(employment_types),
    }
}

/// The lowercased query with every recognized city and employment phrase
/// removed and whitespace collapsed. What is left is the keyword part.
pub fn residual_keywords(raw_query: &str) -> String {
    let mut text = raw_query.to_lowercase();

    for (phrase, _) in EMPLOYMENT_TYPE_PHRASES {
        text = text.replace(phrase, " ");
    }
    for city in KNOWN_LOCATIONS {
        text = text.replace(city, " ");
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        let filters = parse_smart_search("");
        assert_eq!(filters, SearchFilters::query_only(""));
        assert!(!filters.has_structured_filters());
    }

    #[test]
    fn test_english_query() {
        let raw = "need a part time dentist in baghdad";
        let filters = parse_smart_search(raw);

        assert_eq!(filters.query, raw);
        assert_eq!(filters.location, Some(vec!["baghdad".to_string()]));
        assert_eq!(filters.employment_type, Some(vec![EmploymentType::PartTime]));
    }

    #[test]
    fn test_arabic_query() {
        let filters = parse_smart_search("مساعد طبيب اسنان دوام جزئي في البصرة");

        assert_eq!(filters.location, Some(vec!["البصرة".to_string()]));
        assert_eq!(filters.employment_type, Some(vec![EmploymentType::PartTime]));
    }

    #[test]
    fn test_query_is_kept_verbatim() {
        let raw = "  Full-Time ORTHODONTIST, Erbil ";
        let filters = parse_smart_search(raw);

        assert_eq!(filters.query, raw);
        assert_eq!(filters.location, Some(vec!["erbil".to_string()]));
        assert_eq!(filters.employment_type, Some(vec![EmploymentType::FullTime]));
    }

    #[test]
    fn test_synonyms_collapse_to_one_value() {
        let filters = parse_smart_search("full time / full-time / دوام كامل");
        assert_eq!(filters.employment_type, Some(vec![EmploymentType::FullTime]));
    }

    #[test]
    fn test_output_follows_dictionary_order() {
        let filters = parse_smart_search("contract or part time, najaf or baghdad");

        assert_eq!(
            filters.location,
            Some(vec!["baghdad".to_string(), "najaf".to_string()])
        );
        assert_eq!(
            filters.employment_type,
            Some(vec![EmploymentType::PartTime, EmploymentType::Contract])
        );
    }

    #[test]
    fn test_nothing_recognized() {
        let filters = parse_smart_search("dental hygienist");
        assert_eq!(filters, SearchFilters::query_only("dental hygienist"));
    }

    #[test]
    fn test_residual_keywords() {
        assert_eq!(
            residual_keywords("need a Part Time dentist in BAGHDAD"),
            "need a dentist in"
        );
        assert_eq!(residual_keywords("baghdad full time"), "");
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(parse_smart_search("contract in mosul")).unwrap();

        assert_eq!(value["query"], "contract in mosul");
        assert_eq!(value["location"][0], "mosul");
        assert_eq!(value["employmentType"][0], "contract");

        let value = serde_json::to_value(parse_smart_search("")).unwrap();
        assert!(value.get("location").is_none());
        assert!(value.get("employmentType").is_none());
    }
}
