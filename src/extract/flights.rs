use super::{cached_regex, normalize_newlines, Rule, RuleChain, RuleMatch};
use crate::types::records::FlightOption;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

// Field lines may carry a bullet and markdown bold around the label.
macro_rules! field {
    ($label:literal) => {
        concat!(r"[ \t]*(?:[-*•][ \t]*)?(?:\*\*)?", $label, r"(?:\*\*)?[ \t]*:(?:\*\*)?[ \t]*")
    };
}

fn option_block_pattern() -> String {
    [
        r"(?im)^[ \t]*(?:#+[ \t]*)?(?:\*\*)?Option[ \t]+\d+(?:\*\*)?[ \t]*:?[^\n]*\n",
        concat!(r"(?:", field!("Route"), r"[^\n]*\n)?"),
        concat!(field!("Airline"), r"([^\n]+)\n"),
        concat!(field!("Price"), r"([^\d\n]*?)[ \t]*([\d,]+(?:\.\d+)?)[^\n]*\n"),
        concat!(
            field!("Departure"),
            r"([^\n]+?)[ \t]+(?:at[ \t]+)?(\d{1,2}:\d{2}(?:[ \t]*[AP]M)?)[^\n]*\n"
        ),
        concat!(field!("Arrival"), r"([^\n]+)\n"),
        concat!(field!("Duration"), r"([^\n]+)\n"),
        concat!(field!("Stops"), r"([^\n]+)"),
        concat!(
            r"(?:\n[ \t]*(?:[-*•][ \t]*)?(?:\*\*)?(?:Why(?:[ \t]+choose(?:[ \t]+this)?)?|Reason)(?:\*\*)?[ \t]*:(?:\*\*)?[ \t]*([^\n]*))?"
        ),
    ]
    .concat()
}

fn flight_rules() -> RuleChain<FlightOption> {
    RuleChain::new(vec![Rule::new("option_block", option_blocks)])
}

/// Parse `Option N:` flight blocks; `index` follows the order blocks appear in.
pub fn parse_flight_options(text: &str) -> Vec<FlightOption> {
    static CHAIN: OnceLock<RuleChain<FlightOption>> = OnceLock::new();
    let text = normalize_newlines(text);
    let mut options = CHAIN.get_or_init(flight_rules).apply(&text).items;
    for (position, option) in options.iter_mut().enumerate() {
        option.index = position as u32 + 1;
    }
    options
}

fn option_blocks(text: &str) -> Vec<RuleMatch<FlightOption>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(&option_block_pattern()).expect("built-in pattern must compile")
    });

    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let airline = clean_field(&caps[1]);
            let Some(price_amount) = parse_whole_amount(&caps[3]) else {
                debug!(
                    target: "travel_extract::flights",
                    airline = %airline,
                    raw = &caps[3],
                    "skipping option with unparsable price"
                );
                return None;
            };

            Some(RuleMatch::new(
                whole.range(),
                FlightOption {
                    index: 0,
                    airline,
                    price_amount,
                    currency: clean_field(&caps[2]),
                    departure: format!("{} {}", clean_field(&caps[4]), clean_field(&caps[5])),
                    arrival: clean_field(&caps[6]),
                    duration_label: clean_field(&caps[7]),
                    stops_label: clean_field(&caps[8]),
                    reason: caps.get(9).map(|m| clean_field(m.as_str())).unwrap_or_default(),
                },
            ))
        })
        .collect()
}

/// Strip thousands separators and round half away from zero to a whole unit.
fn parse_whole_amount(raw: &str) -> Option<Decimal> {
    let amount = Decimal::from_str(&raw.replace(',', "")).ok()?;
    Some(amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

fn clean_field(raw: &str) -> String {
    raw.trim()
        .trim_matches('*')
        .trim()
        .trim_end_matches(',')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OPTIONS: &str = "Here are the best flights:

Option 1:
Route: BOM → BKK
Airline: Thai Airways
Price: ₹18,950
Departure: 15 Mar 2025 at 08:30
Arrival: 14:20 local time
Duration: 4h 20m
Stops: Non-stop
Why: Fastest direct option

Option 2:
Airline: IndiGo
Price: ₹12,499.50
Departure: 15 Mar 2025 23:05
Arrival: 05:10 (+1)
Duration: 5h 35m
Stops: 1 stop (DEL)

Let me know which one you like.";

    #[test]
    fn test_two_options_in_order() {
        let options = parse_flight_options(TWO_OPTIONS);
        assert_eq!(options.len(), 2);

        let first = &options[0];
        assert_eq!(first.index, 1);
        assert_eq!(first.airline, "Thai Airways");
        assert_eq!(first.price_amount, Decimal::new(18950, 0));
        assert_eq!(first.currency, "₹");
        assert_eq!(first.departure, "15 Mar 2025 08:30");
        assert_eq!(first.arrival, "14:20 local time");
        assert_eq!(first.duration_label, "4h 20m");
        assert_eq!(first.stops_label, "Non-stop");
        assert_eq!(first.reason, "Fastest direct option");

        let second = &options[1];
        assert_eq!(second.index, 2);
        assert_eq!(second.airline, "IndiGo");
        assert_eq!(second.price_amount, Decimal::new(12500, 0));
        assert_eq!(second.departure, "15 Mar 2025 23:05");
        assert_eq!(second.stops_label, "1 stop (DEL)");
        assert_eq!(second.reason, "");
    }

    #[test]
    fn test_index_follows_text_order_not_labels() {
        let text = TWO_OPTIONS
            .replace("Option 1:", "Option 7:")
            .replace("Option 2:", "Option 3:");
        let indexes: Vec<u32> = parse_flight_options(&text).iter().map(|o| o.index).collect();
        assert_eq!(indexes, vec![1, 2]);
    }

    #[test]
    fn test_markdown_bullets_and_crlf() {
        let text = "**Option 1:**\r\n- **Airline:** Emirates\r\n- **Price:** USD 1,204\r\n- **Departure:** 2025-06-01 at 9:15 PM\r\n- **Arrival:** 2025-06-02 07:40\r\n- **Duration:** 13h 25m\r\n- **Stops:** Non-stop\r\n- **Reason:** Best comfort";
        let options = parse_flight_options(text);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].airline, "Emirates");
        assert_eq!(options[0].currency, "USD");
        assert_eq!(options[0].price_amount, Decimal::new(1204, 0));
        assert_eq!(options[0].departure, "2025-06-01 9:15 PM");
        assert_eq!(options[0].reason, "Best comfort");
    }

    #[test]
    fn test_incomplete_block_is_ignored() {
        let text = "Option 1:\nAirline: Vistara\nPrice: ₹9,000\nDeparture: 1 Apr 10:00";
        assert!(parse_flight_options(text).is_empty());
    }
}
