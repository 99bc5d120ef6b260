use crate::infra::Services;
use clap::Args;
use recruitment::config::AppConfig;
use recruitment::error::AppError;
use recruitment::telemetry;
use recruitment::workflows::screening::{FolderClassification, Ranking, SkipReason};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ClassifyArgs {
    /// Folder holding the résumés to classify (defaults to APP_CVS_DIR)
    #[arg(long)]
    pub(crate) cvs_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RankArgs {
    /// Print the ranking without writing the JSON and CSV reports
    #[arg(long)]
    pub(crate) skip_export: bool,
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let services = Services::from_config(&config)?;
    let folder = args.cvs_dir.unwrap_or_else(|| config.storage.cvs_dir.clone());
    let outcome = services.screening.ingest_folder(&folder)?;

    render_classification(&outcome);
    println!(
        "Classification saved to {}",
        config.storage.classification_path().display()
    );
    Ok(())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let services = Services::from_config(&config)?;
    let ranking = if args.skip_export {
        services.screening.ranking()?
    } else {
        services.screening.export_ranking()?
    };

    render_ranking(&ranking);
    if !args.skip_export {
        let paths = services.screening.paths();
        println!("\nReports written:");
        println!("- {}", paths.ranking_json.display());
        println!("- {}", paths.ranking_csv.display());
    }
    Ok(())
}

pub(crate) fn render_classification(outcome: &FolderClassification) {
    println!("Résumé classification");
    for resume in &outcome.classified {
        println!("- {} → {}", resume.filename, resume.areas.join(", "));
    }

    if outcome.skipped.is_empty() {
        return;
    }
    println!("\nSkipped documents:");
    for skipped in &outcome.skipped {
        match &skipped.reason {
            SkipReason::UnsupportedFormat => {
                println!("- {} (unsupported format)", skipped.filename)
            }
            SkipReason::Unreadable(detail) => println!("- {} ({})", skipped.filename, detail),
        }
    }
}

pub(crate) fn render_ranking(ranking: &Ranking) {
    if ranking.is_empty() {
        println!("No classified candidates match a configured area.");
        return;
    }

    for bucket in ranking.buckets() {
        println!("\nTop candidates for {}:", bucket.area);
        for entry in &bucket.entries {
            println!("  - {} (score {})", entry.candidate, entry.score);
        }
    }
}
