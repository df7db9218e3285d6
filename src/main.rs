use anyhow::{bail, Context};
use clap::Parser;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use talentmatch::{
    EngineConfig, EntityType, HashingEmbedder, InMemoryRecords, JobRecord, MarketSignals,
    QueryEntity, RecommendationRequest, Recommender, RecordFilter, RecordSource, ResumeRecord,
    SnapshotManager,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Recommend jobs for a candidate, or candidates for a job
#[derive(Parser, Debug)]
#[command(name = "talentmatch")]
#[command(about = "Explainable job and candidate recommendations", long_about = None)]
struct Args {
    /// JSON array of job records
    #[arg(long)]
    jobs: PathBuf,

    /// JSON array of resume records
    #[arg(long)]
    resumes: PathBuf,

    /// Recommend jobs for this resume id
    #[arg(long, conflicts_with = "job", required_unless_present = "job")]
    resume: Option<String>,

    /// Recommend candidates for this job id
    #[arg(long)]
    job: Option<String>,

    /// Number of results
    #[arg(short, default_value_t = 10)]
    k: usize,

    /// TOML engine configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hard filter as JSON, e.g. '{"has_skill":{"skill":"rust"}}'
    #[arg(long)]
    filter: Option<String>,

    /// Remote work trend in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    remote_trend: f32,

    /// Skill shortage in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    skill_shortage: f32,

    /// Economic uncertainty in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    economic_uncertainty: f32,

    /// Write a snapshot of the vector store to this directory
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn read_records<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr; stdout carries the JSON result
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting TalentMatch v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let embedder = Arc::new(HashingEmbedder::new(config.store.jobs.dim));
    let records = Arc::new(InMemoryRecords::new());
    let engine = Recommender::new(config, embedder, records.clone())?;

    let jobs: Vec<JobRecord> = read_records(&args.jobs)?;
    let resumes: Vec<ResumeRecord> = read_records(&args.resumes)?;
    info!("Loaded {} jobs and {} resumes", jobs.len(), resumes.len());

    for job in jobs {
        engine
            .ingest_job(&job)
            .with_context(|| format!("ingesting job '{}'", job.id))?;
        records.insert_job(job);
    }
    for resume in resumes {
        engine
            .ingest_resume(&resume)
            .with_context(|| format!("ingesting resume '{}'", resume.id))?;
        records.insert_resume(resume);
    }
    for stats in engine.rebuild_all() {
        info!(
            "{} index: {} vectors, {} mode",
            stats.entity_type, stats.indexed, stats.mode
        );
    }

    if let Some(dir) = &args.snapshot_dir {
        let manager = SnapshotManager::new(dir)?;
        let snapshot = manager.create(engine.store(), &engine.config().store)?;
        info!("Snapshot written: {}", snapshot.name);
    }

    let query = match (&args.resume, &args.job) {
        (Some(id), _) => match records.resume(id) {
            Some(resume) => QueryEntity::Resume(resume.as_ref().clone()),
            None => bail!("resume '{}' not found in {}", id, args.resumes.display()),
        },
        (None, Some(id)) => match records.job(id) {
            Some(job) => QueryEntity::Job(job.as_ref().clone()),
            None => bail!("job '{}' not found in {}", id, args.jobs.display()),
        },
        (None, None) => bail!("one of --resume or --job is required"),
    };

    let mut request = RecommendationRequest::new(query, args.k).with_market(MarketSignals {
        remote_work_trend: args.remote_trend,
        skill_shortage: args.skill_shortage,
        economic_uncertainty: args.economic_uncertainty,
    });
    if let Some(filter) = &args.filter {
        let filter: RecordFilter = serde_json::from_str(filter).context("parsing --filter")?;
        request = request.with_filter(filter);
    }

    let recs = engine.recommend(&request)?;

    let results: Vec<_> = recs
        .results
        .iter()
        .map(|result| {
            let explanation = result.explain();
            json!({
                "rank": result.rank,
                "id": result.counterpart_id(),
                "score": result.score,
                "weight_fallback": result.weight_fallback,
                "breakdown": result.breakdown,
                "matched_skills": result.skills.matched_required,
                "missing_skills": result.skills.missing_required,
                "reasons": explanation.reasons,
                "concerns": explanation.concerns,
            })
        })
        .collect();

    let target = match recs.diagnostics.target {
        EntityType::Job => "jobs",
        EntityType::Resume => "candidates",
    };
    let output = json!({
        "query": recs.diagnostics.query_id,
        "recommending": target,
        "results": results,
        "stats": recs.stats(),
        "diagnostics": recs.diagnostics,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
