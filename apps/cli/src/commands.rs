use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use persistence::IdeaStore;
use serde::Serialize;
use sim_ai::{GenerationConfig, Prompt, QUICK_START_TEMPLATES};
use sim_core::{MonthlyResult, ParamField, SimulationParams};
use sim_econ::Summary;
use sim_runtime::{MockFeed, Session};
use tracing::info;

use crate::scenario;

pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_SHA"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "monetize", version = VERSION, about = "Monetization planning toolkit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Project monthly revenue, users and expenses
    Simulate(SimulateArgs),
    /// Print the prompt sent to the text-generation provider
    Prompt(PromptArgs),
    /// Replay the mock founder chat for a stretch of time
    Feed(FeedArgs),
    /// Manage saved ideas
    Ideas(IdeasArgs),
}

#[derive(Args)]
pub struct SimulateArgs {
    /// YAML or JSON scenario file; flags override its values
    #[arg(long)]
    pub scenario: Option<PathBuf>,
    /// New users per month
    #[arg(long, allow_hyphen_values = true)]
    pub acquisition: Option<f64>,
    /// Monthly paid churn, percent
    #[arg(long, allow_hyphen_values = true)]
    pub churn: Option<f64>,
    /// Monthly free-to-paid conversion, percent
    #[arg(long, allow_hyphen_values = true)]
    pub conversion: Option<f64>,
    /// Monthly price per paid user
    #[arg(long, allow_hyphen_values = true)]
    pub arpu: Option<f64>,
    /// Free users at month zero
    #[arg(long, allow_hyphen_values = true)]
    pub initial_users: Option<f64>,
    /// Horizon length
    #[arg(long)]
    pub months: Option<u32>,
    /// Refuse parameters outside their documented ranges
    #[arg(long)]
    pub strict: bool,
    /// Also write the delimited export to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Print a JSON report instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PromptArgs {
    /// YAML generation config (model, temperature, system_instruction)
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub kind: PromptKind,
}

#[derive(Subcommand)]
pub enum PromptKind {
    /// Monetization analysis for an app idea
    Strategy {
        #[arg(long)]
        idea: String,
    },
    /// Current monetization trends
    Trends,
    /// Guide to making money with AI
    AiTips,
    /// List the quick-start ideas
    Templates,
}

#[derive(Args)]
pub struct FeedArgs {
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Seconds of feed to replay
    #[arg(long, default_value_t = 60)]
    pub seconds: u64,
    /// Post a message as yourself at the end
    #[arg(long)]
    pub post: Option<String>,
}

#[derive(Args)]
pub struct IdeasArgs {
    /// Snapshot file
    #[arg(long, default_value = persistence::default_store_path())]
    pub store: PathBuf,
    #[command(subcommand)]
    pub action: IdeaAction,
}

#[derive(Subcommand)]
pub enum IdeaAction {
    List,
    Show {
        #[arg(long)]
        id: u64,
    },
    Add {
        #[arg(long, default_value = "")]
        title: String,
        /// Markdown file holding the analysis
        #[arg(long)]
        content_file: PathBuf,
    },
    Delete {
        #[arg(long)]
        id: u64,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    params: &'a SimulationParams,
    summary: Summary,
    months: &'a [MonthlyResult],
}

pub fn simulate(args: SimulateArgs) -> Result<()> {
    let base = match &args.scenario {
        Some(path) => scenario::load(path)?,
        None => SimulationParams::default(),
    };
    let params = scenario::apply_overrides(
        base,
        &[
            (ParamField::Acquisition, args.acquisition),
            (ParamField::Churn, args.churn),
            (ParamField::Conversion, args.conversion),
            (ParamField::Arpu, args.arpu),
            (ParamField::InitialUsers, args.initial_users),
            (ParamField::Months, args.months.map(f64::from)),
        ],
    )?;
    info!(?params, strict = args.strict, "simulating");

    let session = if args.strict {
        Session::strict(params).context("parameters rejected by --strict")?
    } else {
        Session::new(params)
    };
    let results = session.results();
    let summary = session.summary();

    if let Some(path) = &args.csv {
        data_pipeline::write_export(path, results)?;
    }

    if args.json {
        let report = Report {
            params: session.params(),
            summary,
            months: results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{:>5} {:>12} {:>12} {:>10} {:>12}", "Month", "Revenue", "Users", "Expenses", "Profit");
    for r in results {
        println!(
            "{:>5} {:>12} {:>12} {:>10} {:>12}",
            r.month,
            r.revenue,
            r.users,
            r.expenses,
            r.profit()
        );
    }
    println!(
        "KPI | months: {} | revenue: ${} | expenses: ${} | profit: ${} | margin: {}%",
        results.len(),
        summary.total_revenue,
        summary.total_expenses,
        summary.total_profit,
        summary.margin_percent
    );
    Ok(())
}

pub fn prompt(args: PromptArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            GenerationConfig::from_yaml_str(&text)?
        }
        None => GenerationConfig::default(),
    };
    let prompt = match args.kind {
        PromptKind::Strategy { idea } => Prompt::strategy(&idea)?,
        PromptKind::Trends => Prompt::MarketTrends,
        PromptKind::AiTips => Prompt::AiMonetization,
        PromptKind::Templates => {
            for (i, t) in QUICK_START_TEMPLATES.iter().enumerate() {
                println!("{}. {}", i + 1, t);
            }
            return Ok(());
        }
    };
    let request = config.request(&prompt);
    println!("model: {}", request.model);
    if let Some(t) = request.temperature {
        println!("temperature: {t}");
    }
    if let Some(s) = &request.system_instruction {
        println!("system: {s}");
    }
    println!();
    println!("{}", request.contents);
    Ok(())
}

pub fn feed(args: FeedArgs) -> Result<()> {
    let mut feed = MockFeed::new(args.seed, chrono::Local::now().naive_local());
    feed.advance(Duration::from_secs(args.seconds));
    if let Some(text) = &args.post {
        if feed.post(text).is_none() {
            bail!("refusing to post an empty message");
        }
    }
    for m in feed.history() {
        let who = if m.is_me { "(you) " } else { "" };
        println!("[{}] {}{}: {}", m.timestamp, who, m.user, m.text);
    }
    println!("online: {}", feed.online());
    Ok(())
}

pub fn ideas(args: IdeasArgs) -> Result<()> {
    let mut store = IdeaStore::load(&args.store)?;
    match args.action {
        IdeaAction::List => {
            if store.is_empty() {
                println!("No saved ideas yet");
            }
            for idea in store.list() {
                println!("#{} [{}] {}", idea.id, idea.date, idea.title);
                println!("    {}", persistence::preview(&idea.content));
            }
        }
        IdeaAction::Show { id } => match store.get(id) {
            Some(idea) => println!("# {}\n{}\n\n{}", idea.title, idea.date, idea.content),
            None => bail!("no idea with id {id}"),
        },
        IdeaAction::Add {
            title,
            content_file,
        } => {
            let content = fs::read_to_string(&content_file)
                .with_context(|| format!("reading {}", content_file.display()))?;
            let id = store.create(&title, &content)?.id;
            store.save(&args.store)?;
            println!("saved idea #{id}");
        }
        IdeaAction::Delete { id } => {
            if !store.delete(id) {
                bail!("no idea with id {id}");
            }
            store.save(&args.store)?;
            println!("deleted idea #{id}");
        }
    }
    Ok(())
}
