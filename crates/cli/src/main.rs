use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::JobBoard;
use matching::{parse_smart_search, MatchResult, MatchScorer, MatchWeights};
use rand::seq::IndexedRandom;
use server::{CandidateRecommendation, JobRecommendation, MatchOrchestrator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// ClinicMatch - dental job marketplace matching engine
#[derive(Parser)]
#[command(name = "clinic-match")]
#[command(about = "Match dental job postings with candidate CVs", long_about = None)]
struct Cli {
    /// Directory containing jobs.json and cvs.json
    #[arg(short, long, default_value = "data/sample")]
    data_dir: PathBuf,

    /// JSON file overriding some or all match weights
    #[arg(short, long)]
    weights: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one job against one CV
    Score {
        #[arg(long)]
        job_id: String,

        #[arg(long)]
        cv_id: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the filters extracted from a free-text query
    Parse {
        /// Query text, English or Arabic
        query: String,

        #[arg(long)]
        json: bool,
    },

    /// Smart search over the job listing
    Search {
        query: String,

        /// Rank results for this CV
        #[arg(long)]
        cv_id: Option<String>,

        #[arg(long, default_value = "20")]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// Best jobs for a candidate
    Recommend {
        #[arg(long)]
        cv_id: String,

        #[arg(long, default_value = "10")]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// Best candidates for a job posting
    Candidates {
        #[arg(long)]
        job_id: String,

        #[arg(long, default_value = "10")]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// Score random job/CV pairs and report latency
    Benchmark {
        /// Number of pairs to score
        #[arg(long, default_value = "10000")]
        requests: usize,

        /// Number of concurrent recommendation requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Parsing needs no data
    if let Commands::Parse { query, json } = &cli.command {
        return handle_parse(query, *json);
    }

    let scorer = load_scorer(cli.weights.as_deref())?;

    let start = Instant::now();
    let board = Arc::new(
        JobBoard::load_from_files(&cli.data_dir)
            .with_context(|| format!("Failed to load data from {}", cli.data_dir.display()))?,
    );
    let (job_count, cv_count) = board.counts();
    eprintln!(
        "{} Loaded {} jobs and {} CVs in {:?}",
        "✓".green(),
        job_count,
        cv_count,
        start.elapsed()
    );

    let orchestrator = MatchOrchestrator::with_scorer(board, scorer);

    match cli.command {
        Commands::Score { job_id, cv_id, json } => {
            handle_score(&orchestrator, &job_id, &cv_id, json)?
        }
        Commands::Parse { query, json } => handle_parse(&query, json)?,
        Commands::Search {
            query,
            cv_id,
            limit,
            json,
        } => handle_search(&orchestrator, &query, cv_id.as_deref(), limit, json).await?,
        Commands::Recommend { cv_id, limit, json } => {
            let recommendations = orchestrator.recommend_jobs(&cv_id, limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&recommendations)?);
            } else {
                println!("{}", format!("Top jobs for {}:", cv_id).bold().blue());
                print_jobs(&recommendations);
            }
        }
        Commands::Candidates { job_id, limit, json } => {
            let recommendations = orchestrator.recommend_candidates(&job_id, limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&recommendations)?);
            } else {
                println!("{}", format!("Top candidates for {}:", job_id).bold().blue());
                print_candidates(&recommendations);
            }
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(orchestrator, requests, concurrent).await?,
    }

    Ok(())
}

fn load_scorer(path: Option<&Path>) -> Result<MatchScorer> {
    let Some(path) = path else {
        return Ok(MatchScorer::new());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read weights file {}", path.display()))?;
    let weights: MatchWeights = serde_json::from_str(&content)
        .with_context(|| format!("Invalid weights file {}", path.display()))?;

    MatchScorer::with_weights(weights).context("Rejected weights file")
}

/// Handle the 'parse' command
fn handle_parse(query: &str, json: bool) -> Result<()> {
    let filters = parse_smart_search(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&filters)?);
        return Ok(());
    }

    println!("{}", format!("Filters for '{}':", filters.query).bold().blue());
    match &filters.location {
        Some(locations) => println!("{}Location: {}", "• ".green(), locations.join(", ")),
        None => println!("{}Location: {}", "• ".green(), "any".dimmed()),
    }
    match &filters.employment_type {
        Some(types) => {
            let labels: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
            println!("{}Employment type: {}", "• ".green(), labels.join(", "));
        }
        None => println!("{}Employment type: {}", "• ".green(), "any".dimmed()),
    }
    Ok(())
}

/// Handle the 'score' command
fn handle_score(
    orchestrator: &MatchOrchestrator,
    job_id: &str,
    cv_id: &str,
    json: bool,
) -> Result<()> {
    let result = orchestrator.score_pair(job_id, cv_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let max = orchestrator.scorer().weights().max_total();
    println!(
        "{} {} vs {}: {} / {}",
        "Match".bold().blue(),
        job_id,
        cv_id,
        result.score.to_string().green().bold(),
        max
    );
    print_breakdown(&result);
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(
    orchestrator: &MatchOrchestrator,
    query: &str,
    cv_id: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let outcome = orchestrator.search_jobs(query, cv_id, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("{}", format!("Search results for '{}':", query).bold().blue());
    if !outcome.filters.has_structured_filters() {
        println!("  {}", "keywords only".dimmed());
    }
    if let Some(locations) = &outcome.filters.location {
        println!("  location: {}", locations.join(", ").cyan());
    }
    if let Some(types) = &outcome.filters.employment_type {
        let labels: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
        println!("  type: {}", labels.join(", ").cyan());
    }

    if outcome.results.is_empty() {
        println!("{}", "No matching jobs".yellow());
    } else {
        print_jobs(&outcome.results);
    }
    Ok(())
}

/// Handle the 'benchmark' command
///
/// Two phases: raw scoring of random pairs on one thread, then concurrent
/// `recommend_jobs` requests through the orchestrator.
async fn handle_benchmark(
    orchestrator: MatchOrchestrator,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let board = orchestrator.board().clone();
    let jobs: Vec<_> = board.jobs().collect();
    let cvs: Vec<_> = board.cvs().collect();
    if jobs.is_empty() || cvs.is_empty() || requests == 0 {
        return Err(anyhow!("Benchmark needs at least one job, one CV and one request"));
    }

    let mut rng = rand::rng();
    let scorer = orchestrator.scorer();

    let mut timings = Vec::with_capacity(requests);
    let start = Instant::now();
    for _ in 0..requests {
        let (Some(job), Some(cv)) = (jobs.choose(&mut rng), cvs.choose(&mut rng)) else {
            continue;
        };
        let pair_start = Instant::now();
        std::hint::black_box(scorer.score(job, cv));
        timings.push(pair_start.elapsed());
    }
    let total_time = start.elapsed();

    println!("{}", "Scoring benchmark:".bold().blue());
    print_latency_stats(&mut timings, total_time, "pairs");

    // Concurrent recommendations, `concurrent` requests in flight at a time
    let cv_ids: Vec<String> = (0..requests.min(1000))
        .filter_map(|_| cvs.choose(&mut rng).map(|cv| cv.id.clone()))
        .collect();

    let mut timings = Vec::with_capacity(cv_ids.len());
    let start = Instant::now();
    for batch in cv_ids.chunks(concurrent.max(1)) {
        let mut handles = vec![];
        for cv_id in batch {
            let orchestrator = orchestrator.clone();
            let cv_id = cv_id.clone();
            handles.push(tokio::spawn(async move {
                let start = Instant::now();
                orchestrator.recommend_jobs(&cv_id, 10).await?;
                Ok::<_, anyhow::Error>(start.elapsed())
            }));
        }
        for handle in handles {
            timings.push(handle.await??);
        }
    }
    let total_time = start.elapsed();

    println!("{}", "Recommendation benchmark:".bold().blue());
    print_latency_stats(&mut timings, total_time, "requests");

    Ok(())
}

fn print_latency_stats(timings: &mut [Duration], total_time: Duration, unit: &str) {
    if timings.is_empty() {
        println!("  no samples");
        return;
    }

    timings.sort();
    let sum: Duration = timings.iter().sum();
    let avg_latency = sum / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("  Total time: {:?}", total_time);
    println!("  Average latency: {:?}", avg_latency);
    println!("  P50 latency: {:?}", percentile(0.50));
    println!("  P95 latency: {:?}", percentile(0.95));
    println!("  P99 latency: {:?}", percentile(0.99));
    println!("  Throughput: {:.2} {}/second", throughput, unit);
}

fn print_breakdown(result: &MatchResult) {
    let b = &result.breakdown;
    for (label, points) in [
        ("title", b.title),
        ("location", b.location),
        ("type", b.employment_type),
        ("skills", b.skills),
        ("salary", b.salary),
        ("experience", b.experience),
    ] {
        let points = if points > 0 {
            points.to_string().green()
        } else {
            points.to_string().dimmed()
        };
        println!("  {}{:<11}{}", "• ".cyan(), label, points);
    }
}

fn print_jobs(recommendations: &[JobRecommendation]) {
    for (i, rec) in recommendations.iter().enumerate() {
        let kind = rec.employment_type.map(|t| t.as_str()).unwrap_or("-");
        let company = rec.company.as_deref().unwrap_or("-");
        match &rec.result {
            Some(result) => println!(
                "{}. [{}] {} @ {}, {} ({}) - Score: {}",
                (i + 1).to_string().green(),
                rec.job_id,
                rec.title.bold(),
                company,
                rec.location,
                kind,
                result.score
            ),
            None => println!(
                "{}. [{}] {} @ {}, {} ({})",
                (i + 1).to_string().green(),
                rec.job_id,
                rec.title.bold(),
                company,
                rec.location,
                kind
            ),
        }
        println!("   {}", rec.explanation.dimmed());
    }
}

fn print_candidates(recommendations: &[CandidateRecommendation]) {
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. [{}] {} ({}) - Score: {}",
            (i + 1).to_string().green(),
            rec.cv_id,
            rec.full_name.as_deref().unwrap_or("unnamed").bold(),
            rec.city,
            rec.result.score
        );
        println!("   {}", rec.explanation.dimmed());
    }
}
