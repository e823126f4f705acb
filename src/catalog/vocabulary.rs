//! Keyword tables used to classify catalog candidates
//!
//! Everything here is plain data. Extend the lists rather than adding
//! special cases to the filter.

/// Category or name terms that mark an attraction.
pub const ATTRACTION_TERMS: &[&str] = &[
    "attraction",
    "museum",
    "gallery",
    "park",
    "garden",
    "monument",
    "memorial",
    "landmark",
    "bridge",
    "tower",
    "palace",
    "castle",
    "fort",
    "cathedral",
    "church",
    "basilica",
    "temple",
    "mosque",
    "shrine",
    "abbey",
    "ruins",
    "historic",
    "heritage",
    "square",
    "plaza",
    "observation",
    "viewpoint",
    "lookout",
    "zoo",
    "aquarium",
    "beach",
    "waterfall",
    "lake",
    "island",
    "statue",
    "opera",
    "theater",
    "theatre",
    "sights",
    "points of interest",
];

/// Name terms that signal an attraction when the category is generic.
pub const ATTRACTION_SIGNAL_TERMS: &[&str] = &[
    "tour",
    "ticket",
    "observation",
    "sightseeing",
    "cruise",
    "excursion",
    "experience",
    "skip-the-line",
    "walking",
    "viewpoint",
    "deck",
];

/// Categories too generic to classify on their own.
pub const GENERIC_CATEGORIES: &[&str] = &["location", "geographic", "geo", "place", "other"];

/// Categories of ordinary businesses that are not worth recommending.
pub const BUSINESS_TERMS: &[&str] = &[
    "restaurant",
    "cafe",
    "coffee",
    "bar",
    "pub",
    "bakery",
    "fast food",
    "shop",
    "store",
    "mall",
    "supermarket",
    "gym",
    "fitness",
    "clinic",
    "hospital",
    "pharmacy",
    "dentist",
    "bank",
    "atm",
    "salon",
    "spa",
    "laundry",
    "office",
    "school",
    "car rental",
    "parking",
    "gas station",
];

/// Terms that rescue a business-category candidate, e.g. a historic cafe.
pub const ATTRACTION_OVERRIDE_TERMS: &[&str] = &[
    "museum",
    "historic",
    "heritage",
    "landmark",
    "monument",
    "observation",
    "gallery",
];

/// Places commonly confused with a famous namesake.
pub const CONFUSABLE_LOCATIONS: &[&str] = &[
    "paris, tx",
    "paris, texas",
    "paris, tn",
    "rome, ga",
    "rome, georgia",
    "rome, ny",
    "london, on",
    "london, ontario",
    "london, ky",
    "athens, ga",
    "athens, georgia",
    "athens, oh",
    "moscow, id",
    "moscow, idaho",
    "venice, fl",
    "naples, fl",
    "florence, sc",
    "florence, al",
    "dublin, oh",
    "dublin, ca",
    "berlin, nh",
    "cairo, il",
    "sydney, ns",
    "sydney, nova scotia",
];

/// Country names with the spellings a catalog address may use.
pub const COUNTRY_ALIASES: &[(&str, &[&str])] = &[
    ("united states", &["united states", "usa", "u.s.a", "us"]),
    ("usa", &["united states", "usa", "u.s.a", "us"]),
    ("united kingdom", &["united kingdom", "uk", "england", "scotland", "wales"]),
    ("uk", &["united kingdom", "uk", "england", "scotland", "wales"]),
    ("england", &["united kingdom", "uk", "england"]),
    ("italy", &["italy", "italia"]),
    ("france", &["france"]),
    ("spain", &["spain", "españa", "espana"]),
    ("germany", &["germany", "deutschland"]),
    ("japan", &["japan"]),
    ("china", &["china", "prc"]),
    ("india", &["india", "bharat"]),
    ("thailand", &["thailand"]),
    ("indonesia", &["indonesia", "bali"]),
    ("uae", &["united arab emirates", "uae", "dubai", "abu dhabi"]),
    ("united arab emirates", &["united arab emirates", "uae", "dubai", "abu dhabi"]),
    ("greece", &["greece", "hellas"]),
    ("turkey", &["turkey", "türkiye", "turkiye"]),
    ("australia", &["australia"]),
    ("canada", &["canada"]),
    ("mexico", &["mexico", "méxico"]),
    ("netherlands", &["netherlands", "holland", "the netherlands"]),
];

/// Name fragments of globally recognisable landmarks.
pub const ICONIC_NAME_FRAGMENTS: &[&str] = &[
    "bridge",
    "tower",
    "museum",
    "palace",
    "castle",
    "cathedral",
    "basilica",
    "colosseum",
    "statue",
    "temple",
    "opera house",
    "great wall",
    "taj mahal",
    "big ben",
    "louvre",
    "eiffel",
    "acropolis",
    "pyramid",
    "abbey",
    "burj",
];

/// Interest → category keywords used by the ranker.
pub const INTEREST_KEYWORDS: &[(&str, &[&str])] = &[
    ("history", &["museum", "historic", "monument", "castle", "palace", "heritage", "ruins", "ancient"]),
    ("culture", &["museum", "temple", "church", "cathedral", "cultural", "theater", "theatre", "opera"]),
    ("art", &["museum", "gallery", "art"]),
    ("nature", &["park", "garden", "nature", "beach", "mountain", "lake", "waterfall"]),
    ("adventure", &["adventure", "hiking", "tour", "sport", "climbing", "diving"]),
    ("food", &["restaurant", "food", "cuisine", "market", "cafe"]),
    ("nightlife", &["bar", "club", "nightlife", "music"]),
    ("shopping", &["shopping", "market", "mall", "boutique"]),
    ("architecture", &["architecture", "tower", "bridge", "cathedral", "building", "palace"]),
    ("beaches", &["beach", "coast", "island"]),
    ("relaxation", &["spa", "beach", "garden", "park"]),
    ("family", &["zoo", "aquarium", "park", "theme"]),
    ("photography", &["viewpoint", "observation", "lookout", "bridge", "tower"]),
];

/// True if `haystack` contains any of `terms` (both expected lowercase).
pub fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| haystack.contains(term))
}

/// Word-bounded containment, so "us" does not match "museum".
pub fn contains_word(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

pub fn country_aliases(destination: &str) -> Option<&'static [&'static str]> {
    COUNTRY_ALIASES
        .iter()
        .find(|(country, _)| *country == destination)
        .map(|(_, aliases)| *aliases)
}

pub fn interest_keywords(interest: &str) -> &'static [&'static str] {
    INTEREST_KEYWORDS
        .iter()
        .find(|(name, _)| *name == interest)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}
