//! Booking links embedded in assistant text
//!
//! Tiers, most specific first:
//! 1. `[BOOKING_LINK: Paris | https://...]`
//! 2. `[BOOKING_LINK: https://...]`
//! 3. `[Book Paris](https://...)`
//! 4. `Book here: https://...` or a lead-in followed by `- Paris: https://...` lines
//! 5. any `Label: https://...` line pointing at a known booking site

use super::{cached_regex, normalize_newlines, Rule, RuleChain, RuleMatch};
use crate::types::records::{ActionLink, DEFAULT_LINK_LABEL};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

/// Hosts treated as booking targets by the last-resort tier.
pub const BOOKING_DOMAINS: &[&str] = &[
    "skyscanner.com",
    "skyscanner.net",
    "skyscanner.co.in",
    "booking.com",
    "expedia.com",
    "kayak.com",
    "momondo.com",
    "makemytrip.com",
    "cleartrip.com",
    "goibibo.com",
    "airbnb.com",
    "agoda.com",
    "trip.com",
    "hotels.com",
    "priceline.com",
    "hostelworld.com",
    "tripadvisor.com",
    "viator.com",
    "getyourguide.com",
];

const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '>', '"', '\''];

/// The booking-link recognizer chain in priority order
pub fn action_link_rules() -> RuleChain<ActionLink> {
    RuleChain::new(vec![
        Rule::new("labeled_marker", labeled_marker),
        Rule::new("unlabeled_marker", unlabeled_marker),
        Rule::new("display_link", display_link),
        Rule::new("legacy_lead_in", legacy_lead_in),
        Rule::new("booking_domain_line", booking_domain_line),
    ])
}

/// Find booking links and return them with the text they were removed from.
pub fn extract_action_links(text: &str) -> (Vec<ActionLink>, String) {
    static CHAIN: OnceLock<RuleChain<ActionLink>> = OnceLock::new();
    let chain = CHAIN.get_or_init(action_link_rules);

    let normalized = normalize_newlines(text);
    let extraction = chain.apply(&normalized);
    if let Some(tier) = extraction.tier {
        debug!(
            target: "travel_extract::links",
            tier,
            links = extraction.items.len(),
            "extracted booking links"
        );
    }
    (extraction.items, extraction.residual)
}

fn labeled_marker(text: &str) -> Vec<RuleMatch<ActionLink>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached_regex(
        &RE,
        r"(?i)\[(?:BOOKING_LINK|BOOK_LINK|ACTION_LINK)[ \t]*:[ \t]*([^\]|\n]+?)[ \t]*\|[ \t]*(https?://[^\s\]]+)[ \t]*\]",
    );

    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let url = marker_url(&caps[2])?;
            Some(RuleMatch::new(
                whole.range(),
                ActionLink::new(caps[1].trim(), url),
            ))
        })
        .collect()
}

fn unlabeled_marker(text: &str) -> Vec<RuleMatch<ActionLink>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached_regex(
        &RE,
        r"(?i)\[(?:BOOKING_LINK|BOOK_LINK|ACTION_LINK)[ \t]*:[ \t]*(https?://[^\s\]]+)[ \t]*\]",
    );

    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let url = marker_url(&caps[1])?;
            Some(RuleMatch::new(
                whole.range(),
                ActionLink::new(DEFAULT_LINK_LABEL, url),
            ))
        })
        .collect()
}

fn display_link(text: &str) -> Vec<RuleMatch<ActionLink>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached_regex(&RE, r"\[([^\[\]\n]+)\]\((https?://[^\s)]+)\)");

    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let url = clean_url(&caps[2])?;
            let label = caps[1].trim().trim_matches('*').trim();
            Some(RuleMatch::new(whole.range(), ActionLink::new(label, url)))
        })
        .collect()
}

fn legacy_lead_in(text: &str) -> Vec<RuleMatch<ActionLink>> {
    static LEAD_IN: OnceLock<Regex> = OnceLock::new();
    static SAME_LINE_URL: OnceLock<Regex> = OnceLock::new();
    static LIST_LINE: OnceLock<Regex> = OnceLock::new();

    let lead_in = cached_regex(
        &LEAD_IN,
        r"(?im)^[ \t]*(?:[-*•][ \t]*)?(?:👉[ \t]*)?(?:book(?:ing)?[ \t]+(?:here|now|links?)|book[ \t]+your[ \t]+(?:trip|flights?|hotels?|stay))[ \t]*:[ \t]*",
    );
    let same_line_url = cached_regex(&SAME_LINE_URL, r"^(https?://\S+)");
    let list_line = cached_regex(
        &LIST_LINE,
        r"^[ \t]*[-*•][ \t]*(.+?)[ \t]*(?::|[-–])[ \t]*(https?://\S+)[ \t]*$",
    );

    let mut matches = Vec::new();

    for lead in lead_in.find_iter(text) {
        let rest = &text[lead.end()..];

        if let Some(url_match) = same_line_url.find(rest) {
            if let Some(url) = clean_url(url_match.as_str()) {
                // Trailing sentence punctuation goes with the link.
                let end = lead.end() + url_match.end();
                matches.push(RuleMatch::new(
                    lead.start()..end,
                    ActionLink::new(DEFAULT_LINK_LABEL, url),
                ));
            }
            continue;
        }

        // Lead-in on its own line: consume the bullet list directly below it.
        let Some(newline) = rest.find('\n') else {
            continue;
        };
        let mut cursor = lead.end() + newline + 1;
        let mut span_start = lead.start();

        while cursor < text.len() {
            let line_end = text[cursor..]
                .find('\n')
                .map_or(text.len(), |offset| cursor + offset);
            let line = &text[cursor..line_end];

            let Some(caps) = list_line.captures(line) else {
                break;
            };
            if let Some(url) = clean_url(&caps[2]) {
                matches.push(RuleMatch::new(
                    span_start..line_end,
                    ActionLink::new(caps[1].trim(), url),
                ));
            }
            span_start = line_end;
            cursor = line_end + 1;
        }
    }

    matches
}

fn booking_domain_line(text: &str) -> Vec<RuleMatch<ActionLink>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached_regex(
        &RE,
        r"(?m)^[ \t]*(?:[-*•][ \t]*)?([^\n:]{1,80}?)[ \t]*:[ \t]*(https?://\S+)[ \t]*$",
    );

    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let url = clean_url(&caps[2])?;
            let parsed = Url::parse(&url).ok()?;
            if !is_booking_url(&parsed) {
                return None;
            }
            let label = caps[1].trim().trim_matches('*').trim();
            Some(RuleMatch::new(whole.range(), ActionLink::new(label, url)))
        })
        .collect()
}

/// Strip sentence punctuation and accept only absolute http(s) URLs with a host.
fn clean_url(raw: &str) -> Option<String> {
    marker_url(raw.trim().trim_end_matches(URL_TRAILING_PUNCTUATION))
}

/// A URL already bounded by marker brackets is kept exactly as written.
fn marker_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return None;
    }
    Some(raw.to_string())
}

pub fn is_booking_url(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();

    let known = BOOKING_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)));

    let google_travel = (host == "google.com" || host.ends_with(".google.com"))
        && (url.path().starts_with("/travel") || url.path().starts_with("/flights"));

    known || google_travel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_markers() {
        let text = "Here are your options.\n[BOOKING_LINK: Paris | https://www.skyscanner.com/paris]\n[BOOKING_LINK:Rome|https://www.skyscanner.com/rome]\nEnjoy!";
        let (links, residual) = extract_action_links(text);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].label, "Paris");
        assert_eq!(links[0].url, "https://www.skyscanner.com/paris");
        assert_eq!(links[1].label, "Rome");
        assert!(!residual.contains("BOOKING_LINK"));
        assert_eq!(residual, "Here are your options.\n\nEnjoy!");
    }

    #[test]
    fn test_unlabeled_marker_uses_default_label() {
        let (links, residual) =
            extract_action_links("Ready? [BOOKING_LINK: https://www.booking.com/x?id=1]");
        assert_eq!(links, vec![ActionLink::new(DEFAULT_LINK_LABEL, "https://www.booking.com/x?id=1")]);
        assert_eq!(residual, "Ready?");
    }

    #[test]
    fn test_marker_beats_legacy_lead_in() {
        let text = "[BOOKING_LINK: Bali | https://example.com/bali]\nBook here: https://example.com/legacy";
        let (links, residual) = extract_action_links(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/bali");
        assert!(residual.contains("Book here: https://example.com/legacy"));
    }

    #[test]
    fn test_display_links() {
        let text = "Options: [Book Tokyo](https://www.expedia.com/tokyo) or [**Book Osaka**](https://www.expedia.com/osaka).";
        let (links, residual) = extract_action_links(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].label, "Book Tokyo");
        assert_eq!(links[1].label, "Book Osaka");
        assert_eq!(residual, "Options:  or .");
    }

    #[test]
    fn test_legacy_single_url_strips_trailing_period() {
        let (links, residual) =
            extract_action_links("Great choice!\nBook here: https://www.kayak.com/flights/BOM-BKK.");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://www.kayak.com/flights/BOM-BKK");
        assert_eq!(links[0].label, DEFAULT_LINK_LABEL);
        assert_eq!(residual, "Great choice!");
    }

    #[test]
    fn test_marker_url_keeps_closing_punctuation() {
        let url = "https://en.wikipedia.org/wiki/Paris_(disambiguation)";
        let (links, residual) = extract_action_links(&format!("See [BOOKING_LINK: Paris | {url}]"));
        assert_eq!(links, vec![ActionLink::new("Paris", url)]);
        assert_eq!(residual, "See");

        let (links, _) = extract_action_links("[BOOKING_LINK: https://example.com/tours/rome.]");
        assert_eq!(links[0].url, "https://example.com/tours/rome.");
    }

    #[test]
    fn test_legacy_list_keeps_rejected_lines() {
        let text = "Book links:\n- Paris: https://example.com/paris\n- Broken: https://?\n- Rome: https://example.com/rome\nBye";
        let (links, residual) = extract_action_links(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].label, "Rome");
        assert_eq!(residual, "- Broken: https://?\nBye");
    }

    #[test]
    fn test_legacy_list() {
        let text = "Booking links:\n- Paris: https://example.com/paris\n- Rome - https://example.com/rome\nSafe travels";
        let (links, residual) = extract_action_links(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].label, "Paris");
        assert_eq!(links[1].label, "Rome");
        assert_eq!(links[1].url, "https://example.com/rome");
        assert_eq!(residual, "Safe travels");
    }

    #[test]
    fn test_booking_domain_fallback_ignores_other_hosts() {
        let text = "Flights to Goa: https://www.makemytrip.com/flights/goa\nWikipedia: https://en.wikipedia.org/wiki/Goa";
        let (links, residual) = extract_action_links(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].label, "Flights to Goa");
        assert_eq!(residual, "Wikipedia: https://en.wikipedia.org/wiki/Goa");
    }

    #[test]
    fn test_rejects_non_http_urls() {
        let (links, residual) = extract_action_links("[BOOKING_LINK: https://]");
        assert!(links.is_empty());
        assert_eq!(residual, "[BOOKING_LINK: https://]");
    }

    #[test]
    fn test_google_travel_is_booking_url() {
        let url = Url::parse("https://www.google.com/travel/flights?q=x").unwrap();
        assert!(is_booking_url(&url));
        let url = Url::parse("https://www.google.com/search?q=x").unwrap();
        assert!(!is_booking_url(&url));
    }
}
