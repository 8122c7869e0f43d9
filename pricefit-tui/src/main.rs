mod display;
mod theme;
mod tui_app;
mod tui_events;
mod tui_ui;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pricefit_core::{
    AnthropicPredictor, ConstantPredictor, DEFAULT_SAMPLE_SIZE, Decode, Evaluator,
    NamedPredictor, NullSink, OllamaPredictor, OpenAiPredictor, PredictionRecord, TestItem,
    extract_price, extract_price_loose, load_items,
};
use std::path::PathBuf;
use std::time::Duration;

use crate::display::ConsoleSink;
use crate::tui_app::App;

#[derive(Parser)]
#[command(name = "pricefit")]
#[command(about = "Score LLM price predictors against a labeled test set", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a predictor over the first N items and report accuracy
    Eval(EvalArgs),

    /// Extract a price from model output text
    Extract {
        /// Raw model output
        text: String,

        /// Take the first number anywhere instead of after "Price is $"
        #[arg(long)]
        loose: bool,
    },

    /// Classify a single guess against its true price
    Tier {
        #[arg(long)]
        truth: f64,

        #[arg(long)]
        guess: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Always guess the same price (dataset mean unless --value is given)
    Constant,
    /// Local model served by Ollama
    Ollama,
    /// OpenAI or any compatible chat completion server
    Openai,
    /// Anthropic messages API
    Anthropic,
}

impl Backend {
    fn default_model(&self) -> &'static str {
        match self {
            Backend::Constant => "constant_pricer",
            Backend::Ollama => "llama3.2",
            Backend::Openai => "gpt-4o-mini",
            Backend::Anthropic => "claude-3-5-sonnet-20240620",
        }
    }
}

#[derive(Args)]
struct EvalArgs {
    /// Test items (.jsonl, .json or .csv with prompt and price columns)
    #[arg(short, long)]
    data: PathBuf,

    /// Predictor backend
    #[arg(short, long, value_enum, env = "PRICEFIT_PREDICTOR", default_value_t = Backend::Constant)]
    predictor: Backend,

    /// Model name for the backend
    #[arg(short, long)]
    model: Option<String>,

    /// Fixed guess for the constant predictor
    #[arg(long)]
    value: Option<f64>,

    /// Score the first token by a weighted average of its top-k candidates
    /// (OpenAI-compatible backends only, 1-20)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=20))]
    top_k: Option<u8>,

    /// Number of items to evaluate
    #[arg(short = 'n', long, env = "PRICEFIT_SIZE", default_value_t = DEFAULT_SAMPLE_SIZE)]
    size: usize,

    /// Report title (defaults to a readable form of the predictor name)
    #[arg(long)]
    title: Option<String>,

    /// Predictor name (defaults to the model name)
    #[arg(long)]
    name: Option<String>,

    /// Override the backend endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// HTTP timeout per prediction, in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Output the report as JSON
    #[arg(long)]
    json: bool,

    /// Open the interactive scatter chart when the run finishes
    #[arg(long)]
    chart: bool,

    /// Suppress per-item lines
    #[arg(short, long)]
    quiet: bool,
}

fn build_predictor(args: &EvalArgs, items: &[TestItem]) -> Result<NamedPredictor, String> {
    let model = args
        .model
        .clone()
        .unwrap_or_else(|| args.predictor.default_model().to_string());
    let name = args.name.clone().unwrap_or_else(|| model.clone());
    let timeout = Duration::from_secs(args.timeout);
    log::debug!("building {:?} predictor '{name}' for model {model}", args.predictor);

    if args.top_k.is_some() && args.predictor != Backend::Openai {
        return Err("--top-k is only supported with --predictor openai".to_string());
    }

    let predictor = match args.predictor {
        Backend::Constant => {
            let p = match args.value {
                Some(v) => ConstantPredictor::new(v),
                None => ConstantPredictor::mean_of(items.iter().map(|i| i.truth)),
            };
            NamedPredictor::new(name, p)
        }
        Backend::Ollama => {
            let mut p = OllamaPredictor::new(model).with_timeout(timeout);
            if let Some(url) = &args.base_url {
                p = p.with_base_url(url);
            }
            NamedPredictor::new(name, p)
        }
        Backend::Openai => {
            let decode = match args.top_k {
                Some(k) => Decode::WeightedTopK(k),
                _ => Decode::Greedy,
            };
            let mut p = OpenAiPredictor::new(model)
                .with_decode(decode)
                .with_timeout(timeout);
            if let Some(url) = &args.base_url {
                p = p.with_base_url(url);
            }
            NamedPredictor::new(name, p)
        }
        Backend::Anthropic => {
            let mut p = AnthropicPredictor::new(model).with_timeout(timeout);
            if let Some(url) = &args.base_url {
                p = p.with_base_url(url);
            }
            NamedPredictor::new(name, p)
        }
    };
    Ok(predictor)
}

fn run_eval(args: &EvalArgs) -> Result<(), String> {
    let items = load_items(&args.data).map_err(|e| e.to_string())?;
    let predictor = build_predictor(args, &items)?;

    let mut evaluator =
        Evaluator::new(predictor, &items, args.size).map_err(|e| e.to_string())?;
    if let Some(title) = &args.title {
        evaluator = evaluator.with_title(title.clone());
    }
    evaluator = if args.quiet || args.json {
        evaluator.with_sink(NullSink)
    } else {
        evaluator.with_sink(ConsoleSink)
    };

    let report = evaluator.run().map_err(|e| e.to_string())?;

    if args.json {
        display::display_json(&report)?;
    } else {
        display::display_summary(&report);
    }

    if args.chart {
        let records: Vec<PredictionRecord> = evaluator.records().to_vec();
        let labels: Vec<String> = items[..args.size].iter().map(TestItem::label).collect();
        run_tui(App::new(report, records, labels)).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn run_tui(mut app: App) -> std::io::Result<()> {
    let mut terminal = ratatui::init();
    let result = tui_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn tui_loop(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> std::io::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| tui_ui::draw(frame, app))?;
        tui_events::handle_events(app, Duration::from_millis(250))?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval(args) => run_eval(&args),
        Commands::Extract { text, loose } => {
            let price = if loose {
                extract_price_loose(&text)
            } else {
                extract_price(&text)
            };
            display::display_extracted(price);
            Ok(())
        }
        Commands::Tier { truth, guess } => {
            display::display_tier(&PredictionRecord::score(0, guess, truth));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
