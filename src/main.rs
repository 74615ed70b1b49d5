use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use show_secretary::{
    load_prizes, open_manager, open_registrar, Contestant, EntryLabel, Renderer, ShowConfig,
    ShowError, TextRenderer, VERSION,
};

const DEFAULT_LOG_FILTER: &str = "show_secretary=info";

#[derive(Parser, Debug)]
#[command(
    name = "show-secretary",
    version = VERSION,
    about = "Registration, allocation, judging and prizes for a show"
)]
struct Cli {
    /// Directory holding the show's ledgers
    #[arg(long, global = true, env = "SHOW_LOCATION", default_value = "show-data")]
    location: PathBuf,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new contestant, or add entries to one
    Register {
        #[arg(long)]
        name: String,
        /// Comma-separated class ids, repeated ids for several entries
        #[arg(long, value_delimiter = ',', required = true)]
        entries: Vec<String>,
        #[arg(long, default_value_t = 0.0)]
        paid: f64,
        /// Add the entries to an existing contestant of the same name
        #[arg(long)]
        allow_update: bool,
    },
    /// Allocate contestants to numbers inside classes and print their labels
    Allocate {
        #[arg(long)]
        confirm_reallocate: bool,
        /// Where entry labels are written
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Record placings for a class (entries as numbers or <class>-<number>)
    Judge {
        #[arg(long = "class")]
        class_id: String,
        #[arg(long, value_delimiter = ',')]
        first: Vec<EntryLabel>,
        #[arg(long, value_delimiter = ',')]
        second: Vec<EntryLabel>,
        #[arg(long, value_delimiter = ',')]
        third: Vec<EntryLabel>,
        #[arg(long, value_delimiter = ',')]
        commendations: Vec<EntryLabel>,
    },
    /// Look up who holds an entry
    Lookup {
        #[arg(long = "class")]
        class_id: String,
        #[arg(long)]
        entry: EntryLabel,
    },
    /// List the recipients of all prizes
    Prizes,
    /// Award a prize by hand to the holder of an entry
    ManualPrize {
        #[arg(long = "class")]
        class_id: String,
        #[arg(long)]
        entry: EntryLabel,
        #[arg(long)]
        prize: String,
    },
    /// Export contestants and classes to CSV
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// List all contestants by points
    Ranking,
    /// Show the placings of one class
    ReportClass {
        #[arg(long = "class")]
        class_id: String,
    },
    /// Write the class results, prize and ranking documents
    FinalReport {
        #[arg(long)]
        out: PathBuf,
    },
    /// Write entry labels for every contestant
    RenderEntrants {
        #[arg(long)]
        out: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("show_secretary=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        error!("{:#}", err);
        let code = err
            .downcast_ref::<ShowError>()
            .map(ShowError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let location = cli.location.as_path();
    fs::create_dir_all(location)
        .with_context(|| format!("Failed to create show directory {}", location.display()))?;
    let config = ShowConfig::load(location)?;

    match cli.command {
        Command::Register {
            name,
            entries,
            paid,
            allow_update,
        } => {
            let mut registrar = open_registrar(location, &config)?;
            let contestant = Contestant::new(name, entries).with_paid(paid);
            let outcome = registrar.register(contestant, allow_update)?;
            println!("{:?}", outcome);
        }

        Command::Allocate {
            confirm_reallocate,
            out,
        } => {
            let registrar = open_registrar(location, &config)?;
            let mut manager = open_manager(location, &config)?;
            let show = manager.allocate(&registrar.entries(), confirm_reallocate)?;
            println!(
                "✓ Allocated {} entries across {} classes",
                show.total_entries(),
                show.classes().len()
            );
            let out = out.unwrap_or_else(|| location.join("render"));
            render_entrants(location, &config, &out)?;
        }

        Command::Judge {
            class_id,
            first,
            second,
            third,
            commendations,
        } => {
            let mut manager = open_manager(location, &config)?;
            let judged = manager.add_judgment(&class_id, &first, &second, &third, &commendations)?;
            for row in judged.result_rows() {
                println!("{}: {} ({})", row.placing.as_str(), row.contestant, row.entry);
            }
        }

        Command::Lookup { class_id, entry } => {
            let manager = open_manager(location, &config)?;
            let contestant = manager.lookup_contestant(&class_id, &entry)?;
            println!("Entry {} in class {}: {}", entry, class_id, contestant.name);
        }

        Command::Prizes => {
            let manager = open_manager(location, &config)?;
            let prizes = load_prizes(&config.prize_path(location))?;
            for line in manager.report_prizes(&prizes)? {
                println!("{}", line);
            }
        }

        Command::ManualPrize {
            class_id,
            entry,
            prize,
        } => {
            let mut manager = open_manager(location, &config)?;
            let contestant = manager.add_prize(&class_id, &entry, &prize)?;
            println!("{}: {}", prize, contestant.name);
        }

        Command::Export { out } => {
            fs::create_dir_all(&out)
                .with_context(|| format!("Failed to create export directory {}", out.display()))?;
            let registrar = open_registrar(location, &config)?;
            registrar.to_csv(&out.join("contestants.csv"))?;
            let manager = open_manager(location, &config)?;
            manager.to_csv(&out.join("classes.csv"))?;
            println!("✓ Exported to {}", out.display());
        }

        Command::Ranking => {
            let manager = open_manager(location, &config)?;
            for line in manager.report_ranking()? {
                println!("{}", line);
            }
        }

        Command::ReportClass { class_id } => {
            let manager = open_manager(location, &config)?;
            let show_class = manager.report_class(&class_id)?;
            println!("Class {} --- {}", show_class.class_id, show_class.name);
            for row in show_class.result_rows() {
                println!("  {}: {} ({})", row.placing.as_str(), row.contestant, row.entry);
            }
        }

        Command::FinalReport { out } => {
            let manager = open_manager(location, &config)?;
            let prizes = load_prizes(&config.prize_path(location))?;
            let renderer = TextRenderer::new(&out);

            let results = renderer.render_class_results(&manager.class_results()?)?;
            let prize_doc =
                renderer.render_summary("Prize Winners", &manager.report_prizes(&prizes)?)?;
            let ranking_doc = renderer.render_summary("Ranking", &manager.report_ranking()?)?;
            for path in [results, prize_doc, ranking_doc] {
                println!("✓ Wrote {}", path.display());
            }
        }

        Command::RenderEntrants { out } => {
            render_entrants(location, &config, &out)?;
        }
    }

    Ok(())
}

/// One label document per contestant, with what they still owe
fn render_entrants(location: &Path, config: &ShowConfig, out: &Path) -> Result<()> {
    let registrar = open_registrar(location, config)?;
    let manager = open_manager(location, config)?;
    let renderer = TextRenderer::new(out);

    let owed: Vec<(String, f64)> = registrar
        .contestants()
        .iter()
        .map(|c| (c.name.clone(), registrar.amount_owed(c)))
        .collect();

    for (contestant, entries) in manager.contestant_entries()? {
        let amount = owed
            .iter()
            .find(|(name, _)| name == &contestant.name)
            .map(|(_, amount)| *amount)
            .unwrap_or(0.0);
        let path = renderer.render_entries(&contestant, &entries, amount)?;
        println!("✓ {} → {}", contestant.name, path.display());
    }

    Ok(())
}
