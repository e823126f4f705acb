use crate::{
    catalog::CatalogClient,
    ScoringWeights, TravelPipeline, UserPreferenceProfile,
};
use anyhow::{bail, Context};
use clap::{Arg, ArgAction, Command};
use serde_json::{json, Value};
use std::{env, io::Read, path::Path, time::Duration};
use tracing::{info, warn};

/// CLI entry point for the travel-extract tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("travel-extract")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract structured travel data from assistant responses and rank attractions")
        .arg(
            Arg::new("input")
                .help("File holding the assistant response, or - for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("destination")
                .short('d')
                .long("destination")
                .value_name("PLACE")
                .help("Also recommend attractions for this destination"),
        )
        .arg(
            Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("FILE")
                .help("JSON preference profile used for ranking"),
        )
        .arg(
            Arg::new("weights")
                .short('w')
                .long("weights")
                .value_name("FILE")
                .help("JSON scoring weights overriding the defaults"),
        )
        .arg(
            Arg::new("catalog-url")
                .short('u')
                .long("catalog-url")
                .value_name("URL")
                .help("Places catalog base URL (or set CATALOG_BASE_URL env var)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("Catalog API key (or set CATALOG_API_KEY env var)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Per-query catalog timeout in seconds")
                .default_value("8"),
        )
        .arg(
            Arg::new("max-candidates")
                .short('n')
                .long("max-candidates")
                .value_name("COUNT")
                .help("Cap on merged catalog candidates")
                .default_value("12"),
        )
        .arg(
            Arg::new("summary")
                .short('s')
                .long("summary")
                .action(ArgAction::SetTrue)
                .help("Print a readable summary instead of JSON"),
        )
        .get_matches();

    let input = matches
        .get_one::<String>("input")
        .context("input argument is required")?;
    let text = read_input(input)?;

    let timeout_seconds: u64 = matches
        .get_one::<String>("timeout")
        .context("timeout has a default")?
        .parse()
        .context("--timeout must be a whole number of seconds")?;
    let max_candidates: usize = matches
        .get_one::<String>("max-candidates")
        .context("max-candidates has a default")?
        .parse()
        .context("--max-candidates must be a whole number")?;
    let timeout = Duration::from_secs(timeout_seconds);

    let catalog_url = matches
        .get_one::<String>("catalog-url")
        .cloned()
        .or_else(|| env::var("CATALOG_BASE_URL").ok())
        .filter(|url| !url.trim().is_empty());
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| env::var("CATALOG_API_KEY").ok());

    let mut pipeline = match &catalog_url {
        Some(url) => {
            let mut client = CatalogClient::with_timeout(url, timeout)?;
            if let Some(key) = api_key {
                client = client.with_api_key(key);
            }
            info!("Catalog: {}", url);
            TravelPipeline::new(client)
        }
        None => TravelPipeline::offline(),
    }
    .with_query_timeout(timeout)
    .with_max_candidates(max_candidates);

    if let Some(path) = matches.get_one::<String>("weights") {
        let weights = ScoringWeights::from_json(&read_json(path)?)?;
        pipeline = pipeline.with_weights(weights);
    }

    let profile = match matches.get_one::<String>("profile") {
        Some(path) => Some(UserPreferenceProfile::from_json(&read_json(path)?)?),
        None => None,
    };

    let extraction = pipeline.extract(&text);

    let recommendations = match matches.get_one::<String>("destination") {
        Some(destination) => {
            if !pipeline.has_source() {
                warn!("No catalog URL configured, using curated attractions only");
            }
            info!("Recommending attractions for {}", destination);
            Some(pipeline.recommend(destination, profile.as_ref()).await)
        }
        None => None,
    };

    if matches.get_flag("summary") {
        println!("{}", extraction.summary());
        if let Some(recommendations) = &recommendations {
            println!(
                "Recommendations for {} ({:?}):",
                recommendations.destination, recommendations.origin
            );
            for item in &recommendations.items {
                println!("  - {} ({:.2})", item.name(), item.personalization_score);
            }
            if let Some(err) = &recommendations.error {
                println!("  ! {}", err);
            }
        }
        return Ok(());
    }

    let mut output = json!({ "extraction": extraction });
    if let Some(recommendations) = &recommendations {
        let mut value = serde_json::to_value(recommendations)?;
        if let Some(err) = &recommendations.error {
            value["error"] = err.to_error_payload()["error"].clone();
        }
        output["recommendations"] = value;
    }
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read assistant text from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(Path::new(input))
        .with_context(|| format!("failed to read assistant text from {input}"))
}

fn read_json(path: &str) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let value: Value =
        serde_json::from_str(&raw).with_context(|| format!("{path} is not valid JSON"))?;
    if !value.is_object() {
        bail!("{path} must contain a JSON object");
    }
    Ok(value)
}
