use super::{cached_regex, normalize_newlines, Rule, RuleChain, RuleMatch};
use crate::types::records::{Activity, ItineraryDay, TimeOfDay};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn itinerary_rules() -> RuleChain<ItineraryDay> {
    RuleChain::new(vec![Rule::new("day_blocks", day_blocks)])
}

/// Parse `Day N` blocks into itinerary days.
///
/// Days without any activity are dropped, as is any day whose number does not
/// increase on the previous emitted day.
pub fn parse_itinerary(text: &str) -> Vec<ItineraryDay> {
    static CHAIN: OnceLock<RuleChain<ItineraryDay>> = OnceLock::new();
    let text = normalize_newlines(text);
    let days = CHAIN.get_or_init(itinerary_rules).apply(&text).items;

    let mut emitted: Vec<ItineraryDay> = Vec::with_capacity(days.len());
    for day in days {
        if day.activities.is_empty() {
            debug!(
                target: "travel_extract::itinerary",
                day = day.day_number,
                "dropping day without activities"
            );
            continue;
        }
        if let Some(previous) = emitted.last() {
            if day.day_number <= previous.day_number {
                debug!(
                    target: "travel_extract::itinerary",
                    day = day.day_number,
                    previous = previous.day_number,
                    "dropping out-of-order day"
                );
                continue;
            }
        }
        emitted.push(day);
    }
    emitted
}

fn day_blocks(text: &str) -> Vec<RuleMatch<ItineraryDay>> {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    let header = cached_regex(
        &HEADER,
        r"(?im)^[ \t]*(?:#+[ \t]*)?(?:\*\*)?Day[ \t]+(\d+)(?:\*\*)?[ \t]*(?:[:\-–—](?:\*\*)?[ \t]*([^\n]*))?$",
    );

    let headers: Vec<_> = header.captures_iter(text).collect();
    let mut matches = Vec::with_capacity(headers.len());

    for (position, caps) in headers.iter().enumerate() {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let Ok(day_number) = caps[1].parse::<u32>() else {
            continue;
        };
        if day_number == 0 {
            continue;
        }

        let block_end = headers
            .get(position + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |next| next.start());
        let body = &text[whole.end()..block_end];

        let inline_title = caps
            .get(2)
            .map(|m| clean_line(m.as_str()))
            .unwrap_or_default();
        let (title, activities) = parse_day_body(body, inline_title);

        matches.push(RuleMatch::new(
            whole.start()..block_end,
            ItineraryDay {
                day_number,
                title,
                activities,
            },
        ));
    }

    matches
}

fn parse_day_body(body: &str, inline_title: String) -> (String, Vec<Activity>) {
    static TITLE_PREFIX: OnceLock<Regex> = OnceLock::new();
    static ACTIVITIES_MARKER: OnceLock<Regex> = OnceLock::new();
    let title_prefix = cached_regex(&TITLE_PREFIX, r"(?i)^(?:\*\*)?title(?:\*\*)?[ \t]*:[ \t]*");
    let activities_marker = cached_regex(
        &ACTIVITIES_MARKER,
        r"(?i)^(?:\*\*)?activities(?:\*\*)?[ \t]*(?::(?:\*\*)?[ \t]*|$)",
    );

    let mut lines = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .peekable();

    let mut title = inline_title;
    if title.is_empty() {
        if let Some(line) = lines.next_if(|line| !activities_marker.is_match(line)) {
            title = clean_line(&title_prefix.replace(line, ""));
        }
    }

    let mut content: Vec<String> = Vec::new();
    for line in lines {
        if let Some(marker) = activities_marker.find(line) {
            let rest = clean_line(&line[marker.end()..]);
            if !rest.is_empty() {
                content.push(rest);
            }
            continue;
        }
        content.push(line.to_string());
    }

    (title, split_activities(&content))
}

fn split_activities(lines: &[String]) -> Vec<Activity> {
    static TIME_LABEL: OnceLock<Regex> = OnceLock::new();
    let time_label = cached_regex(
        &TIME_LABEL,
        r"(?i)^(?:[-*•][ \t]*)?(?:\p{So}[ \t]*)?(?:\*\*)?(morning|afternoon|evening|night)(?:\*\*)?[ \t]*(?:\([^)]*\))?[ \t]*[:\-–](?:\*\*)?[ \t]*(.*)$",
    );

    let has_time_structure = lines.iter().any(|line| time_label.is_match(line));
    if !has_time_structure {
        return lines
            .iter()
            .map(|line| clean_line(line))
            .filter(|text| !text.is_empty())
            .map(|text| Activity {
                time_of_day: None,
                text,
            })
            .collect();
    }

    let mut activities = Vec::new();
    let mut current: Option<(Option<TimeOfDay>, Vec<String>)> = None;

    let flush = |current: Option<(Option<TimeOfDay>, Vec<String>)>, out: &mut Vec<Activity>| {
        if let Some((time_of_day, parts)) = current {
            let text = parts
                .iter()
                .map(|part| clean_line(part))
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !text.is_empty() {
                out.push(Activity { time_of_day, text });
            }
        }
    };

    for line in lines {
        if let Some(caps) = time_label.captures(line) {
            flush(current.take(), &mut activities);
            let time_of_day = TimeOfDay::from_label(&caps[1]);
            current = Some((time_of_day, vec![caps[2].to_string()]));
            continue;
        }

        match current.as_mut() {
            Some((_, parts)) => parts.push(line.clone()),
            // Lines before the first time-of-day label stand on their own.
            None => flush(Some((None, vec![line.clone()])), &mut activities),
        }
    }
    flush(current, &mut activities);

    activities
}

fn clean_line(line: &str) -> String {
    line.trim()
        .trim_start_matches(['-', '*', '•'])
        .trim()
        .trim_matches('*')
        .trim()
        .to_string()
}
