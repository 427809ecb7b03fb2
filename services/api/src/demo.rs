use crate::infra::{load_catalog, InMemoryResultsPublisher, StaticCatalog};
use card_match::catalog::CardCatalog;
use card_match::config::{AppConfig, CatalogConfig};
use card_match::error::AppError;
use card_match::matching::{
    explain_recommendation, explain_split, format_currency, format_currency_cents,
    validate_criteria, MatchOutcome, MatchingCriteria, RecommendationService,
    RecommendationServiceError,
};
use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// JSON file with the assessment answers (camelCase or snake_case keys)
    #[arg(long)]
    pub(crate) criteria: PathBuf,
    /// CSV catalog export. Defaults to CARD_CATALOG_PATH, then the sample catalog.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the raw outcome as JSON instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Tuition amount in dollars
    #[arg(long, default_value_t = 25_000.0)]
    pub(crate) tuition: f64,
    /// Preferred rewards type: cash_back, travel_points or flexible
    #[arg(long, default_value = "flexible")]
    pub(crate) preference: String,
    /// Self-reported credit tier: excellent, good, fair or below
    #[arg(long)]
    pub(crate) credit_score: Option<String>,
    /// Include business cards
    #[arg(long)]
    pub(crate) business: bool,
    /// Preferred airline (repeatable)
    #[arg(long = "airline")]
    pub(crate) airlines: Vec<String>,
    /// Preferred hotel chain (repeatable)
    #[arg(long = "hotel")]
    pub(crate) hotels: Vec<String>,
    /// Card already held (repeatable)
    #[arg(long = "holding")]
    pub(crate) current_cards: Vec<String>,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        criteria,
        catalog,
        json,
    } = args;

    let catalog_config = match catalog {
        Some(path) => CatalogConfig { path: Some(path) },
        None => AppConfig::load()?.catalog,
    };
    let catalog = load_catalog(&catalog_config)?;

    let raw = std::fs::read_to_string(&criteria)?;
    let raw: Value = serde_json::from_str(&raw)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;

    let (criteria, outcome) = match_criteria(catalog, &raw)?;
    if json {
        print_json(&outcome)
    } else {
        render_outcome(&outcome, &criteria);
        Ok(())
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let raw = demo_criteria(&args);
    let publisher = Arc::new(InMemoryResultsPublisher::default());
    let service = RecommendationService::new(
        Arc::new(StaticCatalog::new(CardCatalog::sample())),
        publisher.clone(),
    );

    let criteria = validate_criteria(&raw).map_err(RecommendationServiceError::from)?;
    let outcome = service.recommend_criteria(&criteria)?;

    println!("Tuition card matcher demo (sample catalog)");
    render_outcome(&outcome, &criteria);

    for notice in publisher.notices() {
        println!(
            "\nQueued '{}' notice for {} ({} detail fields)",
            notice.template,
            notice.top_card,
            notice.details.len()
        );
    }

    Ok(())
}

fn demo_criteria(args: &DemoArgs) -> Value {
    let mut raw = json!({
        "tuitionAmount": args.tuition,
        "preferredRewardsType": args.preference,
        "openToBusinessCards": args.business,
        "preferredAirlines": args.airlines,
        "preferredHotels": args.hotels,
        "currentCards": args.current_cards,
    });
    if let Some(tier) = &args.credit_score {
        raw["creditScore"] = json!(tier);
    }
    raw
}

fn match_criteria(
    catalog: StaticCatalog,
    raw: &Value,
) -> Result<(MatchingCriteria, MatchOutcome), AppError> {
    let service = RecommendationService::new(
        Arc::new(catalog),
        Arc::new(InMemoryResultsPublisher::default()),
    );
    let criteria = validate_criteria(raw).map_err(RecommendationServiceError::from)?;
    let outcome = service.recommend_criteria(&criteria)?;
    Ok((criteria, outcome))
}

fn print_json(outcome: &MatchOutcome) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(outcome)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    println!("{rendered}");
    Ok(())
}

fn render_outcome(outcome: &MatchOutcome, criteria: &MatchingCriteria) {
    println!(
        "\nMatches for {} of tuition ({} preference, {} eligible cards)",
        format_currency(criteria.tuition_amount),
        criteria.preferred_rewards_type.label(),
        outcome.eligible_count
    );

    for warning in &outcome.warnings {
        println!("  ! {}", warning.message());
    }

    for result in &outcome.recommendations {
        let breakdown = &result.breakdown;
        println!(
            "\n  {}. {} [{}] scored {}",
            result.rank,
            result.card.name,
            result.category.label(),
            format_currency(result.estimated_savings)
        );
        println!(
            "     bonus {} | rewards {} | annual fee {} | processing {} | net {}",
            format_currency_cents(breakdown.signup_bonus),
            format_currency_cents(breakdown.rewards_earned),
            format_currency_cents(breakdown.annual_fee_impact),
            format_currency_cents(-breakdown.processing_fee),
            format_currency_cents(breakdown.net_first_year_value)
        );
        println!("     {}", explain_recommendation(result, criteria));
        if !result.partner_values.is_empty() {
            let partners = result
                .partner_values
                .iter()
                .map(|value| {
                    format!(
                        "{} {} ({:.1}c/pt)",
                        value.partner,
                        format_currency(value.value),
                        value.cents_per_point
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            println!("     partners: {partners}");
        }
    }

    match &outcome.split_strategy {
        Some(strategy) => println!("\n{}", explain_split(strategy)),
        None => println!("\nNo two-card split improves on a single card for this payment."),
    }
}
