mod cli;
mod config;
mod core;
mod error;
mod tui;

use crate::cli::{Cli, Commands};
use crate::config::Settings;
use crate::core::{
    MetadataCache, MetadataService, ReportService, ReviewStore, SegmentAnalyzer,
    TranscriptService, backfill_title, extract_video_id, summarize,
};
use crate::error::{Error, Result};
use crate::tui::{App, EventHandler, init as tui_init, restore as tui_restore, ui};
use clap::Parser;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    // Every failure surfaces as one short message, never a trace.
    if let Err(e) = run(cli, &settings).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, settings: &Settings) -> Result<()> {
    match cli.command {
        Some(Commands::Analyze {
            video_url,
            product,
            languages,
        }) => {
            run_cli_analyze(settings, video_url, product, languages).await?;
        }
        Some(Commands::Summary { product }) => {
            run_cli_summary(settings, product)?;
        }
        Some(Commands::Products) => {
            run_cli_products(settings)?;
        }
        Some(Commands::Report { product }) => {
            run_cli_report(settings, product).await?;
        }
        Some(Commands::Tui) | None => {
            if cli.cli {
                println!("Use 'revu --help' for available commands");
            } else {
                run_tui(settings).await?;
            }
        }
    }

    Ok(())
}

async fn run_cli_analyze(
    settings: &Settings,
    video_url: String,
    product: String,
    languages: Option<String>,
) -> Result<()> {
    let product = product.trim().to_string();
    if product.is_empty() {
        return Err(Error::invalid_input(
            "please enter the name of the product you want to analyze",
        ));
    }

    let video_id = extract_video_id(&video_url)?;
    println!("Processing video: {video_id}");

    let languages = languages
        .map(|raw| config::parse_languages(&raw))
        .unwrap_or_else(|| settings.languages.clone());

    let transcript_service = TranscriptService::new()?;
    let metadata_service =
        MetadataService::new(settings.api_key.clone(), MetadataCache::default());
    let analyzer = SegmentAnalyzer::new();
    let store = ReviewStore::new(settings.store_path.clone());

    println!("Fetching transcript...");
    let segments = transcript_service.fetch(&video_url, &languages).await?;
    println!("Fetched {} segments.", segments.len());

    println!("Analyzing segments...");
    let mut analyzed = analyzer.analyze_all(&segments, &product, &video_url);

    println!("Fetching video details...");
    match metadata_service.fetch(&video_url).await {
        Ok(details) => {
            backfill_title(&mut analyzed, &details.title);
            let trending = if details.is_trending { ", trending" } else { "" };
            println!(
                "Video: {} ({} views, engagement {:.1}%{trending})",
                details.title, details.views, details.engagement_rate
            );
        }
        // Reported but not fatal; titles stay "N/A".
        Err(e) => eprintln!("Could not fetch video details: {e}"),
    }

    store.append(&analyzed)?;
    println!(
        "Saved {} segments to {}.",
        analyzed.len(),
        store.path().display()
    );

    let summary = summarize(&analyzed);
    println!();
    println!("{}", summary.summary_text);

    Ok(())
}

fn run_cli_summary(settings: &Settings, product: Option<String>) -> Result<()> {
    let store = ReviewStore::new(settings.store_path.clone());
    let segments = match &product {
        Some(product) => store.load_for_product(product)?,
        None => store.load_all()?,
    };

    if segments.is_empty() {
        println!("No product reviews analyzed yet.");
        return Ok(());
    }

    let summary = summarize(&segments);

    println!("Reviews for: {}", product.as_deref().unwrap_or("All Products"));
    println!();
    println!("{}", summary.summary_text);
    println!();

    let max = summary
        .sentiment_distribution
        .iter()
        .map(|(_, count)| *count)
        .max()
        .unwrap_or(1);
    for (sentiment, count) in &summary.sentiment_distribution {
        let width = (count * 40).div_ceil(max);
        println!("{:<9} {:>4} {}", sentiment.as_str(), count, "█".repeat(width));
    }

    Ok(())
}

fn run_cli_products(settings: &Settings) -> Result<()> {
    let store = ReviewStore::new(settings.store_path.clone());
    let all = store.load_all()?;

    if all.is_empty() {
        println!("No products analyzed yet.");
        return Ok(());
    }

    let mut counts: Vec<(String, usize)> = Vec::new();
    for segment in all {
        match counts.iter_mut().find(|(name, _)| *name == segment.product_name) {
            Some((_, count)) => *count += 1,
            None => counts.push((segment.product_name, 1)),
        }
    }
    counts.sort_by(|a, b| a.0.cmp(&b.0));

    println!("Found {} products:", counts.len());
    println!();
    for (name, count) in counts {
        println!("{name:<30} {count:>5} segments");
    }

    Ok(())
}

async fn run_cli_report(settings: &Settings, product: String) -> Result<()> {
    let store = ReviewStore::new(settings.store_path.clone());
    let segments = store.load_for_product(&product)?;
    let summary = summarize(&segments);

    println!("Generating report for product: {product}");

    let report_service = ReportService::new();
    let content = report_service
        .generate_report(&product, &segments, &summary)
        .await?;

    let path = core::save_report(&product, &content)?;
    println!("Report saved to: {}", path.display());

    Ok(())
}

async fn run_tui(settings: &Settings) -> Result<()> {
    let mut terminal = tui_init()?;

    let mut app = App::new(settings)?;
    let event_handler = EventHandler::new();

    // Async communication channel for background analysis runs
    let (tx, rx) = mpsc::unbounded_channel();
    app.processing_tx = Some(tx.clone());
    app.processing_rx = Some(rx);

    loop {
        let event = event_handler.next_event()?;
        app.handle_event(event)?;

        terminal.draw(|f| {
            ui::draw(f, &mut app);
        })?;

        if app.should_quit {
            break;
        }
    }

    tui_restore()?;
    Ok(())
}
