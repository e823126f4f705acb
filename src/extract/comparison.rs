use super::{cached_regex, normalize_newlines, Rule, RuleChain, RuleMatch};
use crate::types::records::{Badge, PriceComparison, PriceEntry};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

/// Phrases that must appear before a numbered list is read as a price table.
pub const COMPARISON_LEAD_INS: &[&str] = &["price comparison", "cheapest:", "most expensive:"];

pub const DEFAULT_CURRENCY: &str = "$";
const DEFAULT_TITLE: &str = "Price Comparison";

#[derive(Debug, Clone, PartialEq)]
struct RawEntry {
    name: String,
    price: Decimal,
    currency: Option<String>,
    badge: Option<Badge>,
}

fn comparison_rules() -> RuleChain<RawEntry> {
    RuleChain::new(vec![Rule::new("numbered_price_list", numbered_price_list)])
}

/// Parse a multi-destination price table such as
///
/// ```text
/// Flights from Mumbai:
/// 1. CHEAPEST: Thailand - ₹189
/// 2. Bali - ₹293
/// ```
pub fn parse_price_comparison(text: &str) -> Option<PriceComparison> {
    let text = normalize_newlines(text);
    let lowered = text.to_lowercase();
    if !COMPARISON_LEAD_INS
        .iter()
        .any(|phrase| lowered.contains(phrase))
    {
        return None;
    }

    static CHAIN: OnceLock<RuleChain<RawEntry>> = OnceLock::new();
    let raw_entries = CHAIN.get_or_init(comparison_rules).apply(&text).items;
    if raw_entries.is_empty() {
        return None;
    }

    let shared_currency = first_currency_symbol(&text);
    let currency = raw_entries
        .iter()
        .find_map(|entry| entry.currency.clone())
        .or(shared_currency)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let mut seen_cheapest = false;
    let mut seen_most_expensive = false;
    let entries = raw_entries
        .into_iter()
        .map(|raw| {
            let badge = match raw.badge {
                Some(Badge::Cheapest) if seen_cheapest => None,
                Some(Badge::MostExpensive) if seen_most_expensive => None,
                other => other,
            };
            if raw.badge.is_some() && badge.is_none() {
                debug!(
                    target: "travel_extract::comparison",
                    destination = %raw.name,
                    "dropping duplicate badge"
                );
            }
            match badge {
                Some(Badge::Cheapest) => seen_cheapest = true,
                Some(Badge::MostExpensive) => seen_most_expensive = true,
                None => {}
            }

            PriceEntry {
                destination_name: raw.name,
                price: raw.price,
                currency: raw.currency.unwrap_or_else(|| currency.clone()),
                badge,
            }
        })
        .collect();

    let origin = find_origin(&text);
    let title = find_title(&text, origin.is_some());

    Some(PriceComparison {
        title,
        origin,
        currency,
        entries,
    })
}

fn numbered_price_list(text: &str) -> Vec<RuleMatch<RawEntry>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached_regex(
        &RE,
        r"(?im)^[ \t]*\d+[.)][ \t]+(?:\*\*)?(?:(CHEAPEST|MOST[ _]EXPENSIVE)[ \t]*:[ \t]*)?(.+)[ \t]+[-–—][ \t]+(₹|\$|€|£|¥|Rs\.?|INR|USD|EUR|GBP)?[ \t]*(\S+?)(?:\*\*)?(?:[ \t].*)?$",
    );

    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps[2].trim().trim_matches('*').trim().to_string();
            let amount = caps[4].replace(',', "");
            let price = match Decimal::from_str(&amount) {
                Ok(price) => price,
                Err(_) => {
                    debug!(
                        target: "travel_extract::comparison",
                        destination = %name,
                        raw = &caps[4],
                        "skipping entry with unparsable price"
                    );
                    return None;
                }
            };
            if name.is_empty() {
                return None;
            }

            Some(RuleMatch::new(
                whole.range(),
                RawEntry {
                    name,
                    price,
                    currency: caps.get(3).map(|m| m.as_str().trim().to_string()),
                    badge: caps.get(1).and_then(|m| Badge::from_label(m.as_str())),
                },
            ))
        })
        .collect()
}

fn first_currency_symbol(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached_regex(&RE, r"[₹$€£¥]");
    re.find(text).map(|m| m.as_str().to_string())
}

fn find_origin(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached_regex(&RE, r"\b[Ff]rom[ \t]+([A-Z][^\n:]*?)[ \t]*:");
    re.captures(text)
        .map(|caps| caps[1].trim().trim_matches('*').trim().to_string())
        .filter(|origin| !origin.is_empty())
}

fn find_title(text: &str, has_origin: bool) -> String {
    let heading = text.lines().map(clean_heading).find(|line| {
        let lowered = line.to_lowercase();
        lowered.contains("price comparison") || (has_origin && lowered.contains("from "))
    });

    match heading {
        Some(line) if !line.is_empty() && !starts_with_list_number(&line) => line,
        _ => DEFAULT_TITLE.to_string(),
    }
}

fn clean_heading(line: &str) -> String {
    line.trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches('*')
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

fn starts_with_list_number(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_ascii_digit())
}
