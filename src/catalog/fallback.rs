use crate::types::candidate::CatalogCandidate;

struct CuratedAttraction {
    name: &'static str,
    category: &'static str,
    address: &'static str,
    rating: f64,
    review_count: u64,
    description: &'static str,
}

struct FallbackEntry {
    /// Lowercase substrings of the destination that select this table
    keys: &'static [&'static str],
    slug: &'static str,
    attractions: &'static [CuratedAttraction],
}

const fn attraction(
    name: &'static str,
    category: &'static str,
    address: &'static str,
    rating: f64,
    review_count: u64,
    description: &'static str,
) -> CuratedAttraction {
    CuratedAttraction {
        name,
        category,
        address,
        rating,
        review_count,
        description,
    }
}

const FALLBACK_TABLE: &[FallbackEntry] = &[
    FallbackEntry {
        keys: &["new york", "nyc", "manhattan"],
        slug: "new-york",
        attractions: &[
            attraction("Statue of Liberty", "Monument", "Liberty Island, New York, NY, USA", 4.7, 98_000, "Iconic copper statue and symbol of freedom in New York Harbor."),
            attraction("Central Park", "Park", "New York, NY, USA", 4.8, 150_000, "Vast urban park with lakes, meadows and walking paths in Manhattan."),
            attraction("Empire State Building", "Landmark", "20 W 34th St, New York, NY, USA", 4.7, 110_000, "Art Deco skyscraper with an open-air observation deck."),
            attraction("The Metropolitan Museum of Art", "Museum", "1000 5th Ave, New York, NY, USA", 4.8, 90_000, "World-class art museum spanning 5,000 years of culture."),
            attraction("Brooklyn Bridge", "Bridge", "Brooklyn Bridge, New York, NY, USA", 4.8, 70_000, "Historic suspension bridge with views of the Manhattan skyline."),
            attraction("Top of the Rock", "Observation Deck", "30 Rockefeller Plaza, New York, NY, USA", 4.7, 45_000, "Observation decks atop Rockefeller Center."),
        ],
    },
    FallbackEntry {
        keys: &["paris"],
        slug: "paris",
        attractions: &[
            attraction("Eiffel Tower", "Landmark", "Champ de Mars, Paris, France", 4.7, 140_000, "Wrought-iron tower and the most visited monument in Paris."),
            attraction("Louvre Museum", "Museum", "Rue de Rivoli, Paris, France", 4.7, 120_000, "The world's largest art museum, home of the Mona Lisa."),
            attraction("Notre-Dame Cathedral", "Cathedral", "6 Parvis Notre-Dame, Paris, France", 4.7, 80_000, "Gothic cathedral on the Île de la Cité."),
            attraction("Musée d'Orsay", "Museum", "1 Rue de la Légion d'Honneur, Paris, France", 4.8, 60_000, "Impressionist art in a former railway station."),
            attraction("Sacré-Cœur Basilica", "Basilica", "Montmartre, Paris, France", 4.7, 55_000, "Hilltop basilica with sweeping views over the city."),
            attraction("Arc de Triomphe", "Monument", "Place Charles de Gaulle, Paris, France", 4.7, 65_000, "Triumphal arch at the top of the Champs-Élysées."),
        ],
    },
    FallbackEntry {
        keys: &["london"],
        slug: "london",
        attractions: &[
            attraction("Tower of London", "Castle", "London EC3N 4AB, United Kingdom", 4.7, 75_000, "Historic castle and home of the Crown Jewels."),
            attraction("British Museum", "Museum", "Great Russell St, London, United Kingdom", 4.7, 90_000, "Museum of human history, art and culture."),
            attraction("Tower Bridge", "Bridge", "Tower Bridge Rd, London, United Kingdom", 4.7, 60_000, "Victorian bascule bridge over the Thames."),
            attraction("Westminster Abbey", "Church", "20 Deans Yd, London, United Kingdom", 4.7, 40_000, "Gothic abbey church and coronation site."),
            attraction("Buckingham Palace", "Palace", "London SW1A 1AA, United Kingdom", 4.5, 85_000, "Official London residence of the monarch."),
            attraction("The London Eye", "Observation Wheel", "Riverside Building, London, United Kingdom", 4.5, 95_000, "Giant observation wheel on the South Bank."),
        ],
    },
    FallbackEntry {
        keys: &["tokyo"],
        slug: "tokyo",
        attractions: &[
            attraction("Senso-ji Temple", "Temple", "2-3-1 Asakusa, Taito City, Tokyo, Japan", 4.6, 40_000, "Tokyo's oldest temple with the Kaminarimon gate."),
            attraction("Tokyo Skytree", "Observation Tower", "1-1-2 Oshiage, Sumida City, Tokyo, Japan", 4.5, 30_000, "The tallest tower in Japan with two observation decks."),
            attraction("Meiji Jingu", "Shrine", "1-1 Yoyogikamizonocho, Shibuya City, Tokyo, Japan", 4.6, 25_000, "Forested Shinto shrine dedicated to Emperor Meiji."),
            attraction("Tokyo National Museum", "Museum", "13-9 Uenokoen, Taito City, Tokyo, Japan", 4.5, 12_000, "Japan's oldest and largest art museum."),
            attraction("Shinjuku Gyoen National Garden", "Garden", "11 Naitomachi, Shinjuku City, Tokyo, Japan", 4.6, 20_000, "Landscaped garden famous for cherry blossoms."),
            attraction("Tokyo Tower", "Tower", "4-2-8 Shibakoen, Minato City, Tokyo, Japan", 4.5, 28_000, "Red-and-white communications tower with city views."),
        ],
    },
    FallbackEntry {
        keys: &["rome"],
        slug: "rome",
        attractions: &[
            attraction("Colosseum", "Monument", "Piazza del Colosseo, Rome, Italy", 4.7, 150_000, "Ancient amphitheatre and the icon of imperial Rome."),
            attraction("Vatican Museums", "Museum", "Viale Vaticano, Vatican City", 4.6, 110_000, "Papal art collections and the Sistine Chapel."),
            attraction("Pantheon", "Monument", "Piazza della Rotonda, Rome, Italy", 4.8, 90_000, "Roman temple with the world's largest unreinforced concrete dome."),
            attraction("Trevi Fountain", "Landmark", "Piazza di Trevi, Rome, Italy", 4.7, 120_000, "Baroque fountain where coins are tossed for a return trip."),
            attraction("Roman Forum", "Historic Site", "Via della Salara Vecchia, Rome, Italy", 4.7, 60_000, "Ruins of ancient Rome's political centre."),
            attraction("St. Peter's Basilica", "Basilica", "Piazza San Pietro, Vatican City", 4.8, 100_000, "Renaissance basilica with Michelangelo's dome."),
        ],
    },
    FallbackEntry {
        keys: &["dubai"],
        slug: "dubai",
        attractions: &[
            attraction("Burj Khalifa", "Observation Deck", "1 Sheikh Mohammed bin Rashid Blvd, Dubai, United Arab Emirates", 4.7, 130_000, "The world's tallest building with observation decks."),
            attraction("Dubai Mall", "Shopping Mall", "Financial Centre Rd, Dubai, United Arab Emirates", 4.7, 140_000, "Vast mall with an aquarium and ice rink."),
            attraction("Dubai Creek", "Landmark", "Deira, Dubai, United Arab Emirates", 4.5, 20_000, "Historic waterway crossed by traditional abra boats."),
            attraction("Museum of the Future", "Museum", "Sheikh Zayed Rd, Dubai, United Arab Emirates", 4.5, 15_000, "Futuristic museum in a torus-shaped building."),
            attraction("Palm Jumeirah", "Island", "Palm Jumeirah, Dubai, United Arab Emirates", 4.6, 25_000, "Palm-shaped artificial archipelago."),
            attraction("Dubai Frame", "Landmark", "Zabeel Park, Dubai, United Arab Emirates", 4.5, 35_000, "Picture-frame landmark with a glass-floored bridge."),
        ],
    },
];

/// Curated attractions for a well-known destination, matched by substring.
pub fn fallback_attractions(destination: &str) -> Option<Vec<CatalogCandidate>> {
    let destination = destination.trim().to_lowercase();
    if destination.is_empty() {
        return None;
    }

    let entry = FALLBACK_TABLE
        .iter()
        .find(|entry| entry.keys.iter().any(|key| destination.contains(key)))?;

    Some(
        entry
            .attractions
            .iter()
            .enumerate()
            .map(|(position, curated)| {
                CatalogCandidate::new(
                    format!("fallback-{}-{}", entry.slug, position + 1),
                    curated.name,
                    curated.category,
                    curated.address,
                )
                .with_rating(curated.rating)
                .with_review_count(curated.review_count)
                .with_description(curated.description)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_table() {
        let attractions = fallback_attractions("New York").unwrap();
        assert_eq!(attractions.len(), 6);
        assert_eq!(attractions[0].name, "Statue of Liberty");
        assert_eq!(attractions[0].id, "fallback-new-york-1");
        assert!(attractions.iter().all(|a| a.rating.is_some()));
    }

    #[test]
    fn test_substring_keys() {
        assert!(fallback_attractions("Rome, Italy").is_some());
        assert!(fallback_attractions("Downtown Dubai").is_some());
        assert!(fallback_attractions("Reykjavik").is_none());
        assert!(fallback_attractions("").is_none());
    }
}
