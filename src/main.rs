use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use family_tree::biography::{AlwaysSynthesize, BiographySource, CandidateRecord, Selection, WikidataSource};
use family_tree::config::AppConfig;
use family_tree::error::TreeError;
use family_tree::family::{add_relative, project_tree, FamilyTree, Gender, PersonId, RelativeRole};
use family_tree::persistence::{import_into, load_tree, save_tree};
use family_tree::render::{describe_person, render_text};
use family_tree::synthesis::{AncestrySynthesizer, AutocompleteOutcome};

#[derive(Parser, Debug)]
#[command(name = "family-tree")]
#[command(about = "Build and explore family trees, filling in missing ancestors")]
struct Args {
    /// Tree file to read and update
    #[arg(long, default_value = "family_tree.json")]
    tree: PathBuf,

    /// JSON configuration file (defaults are used if it does not exist)
    #[arg(long, default_value = "family_tree.config.json")]
    config: PathBuf,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a person, optionally related to someone already in the tree
    Add {
        #[arg(long)]
        name: String,

        /// male or female
        #[arg(long, value_parser = parse_gender)]
        gender: Gender,

        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth: Option<NaiveDate>,

        /// Death date (YYYY-MM-DD)
        #[arg(long)]
        death: Option<NaiveDate>,

        /// parent, child, spouse or sibling of --to
        #[arg(long, requires = "to")]
        relation: Option<RelativeRole>,

        /// Id of the person the new one relates to
        #[arg(long, requires = "relation")]
        to: Option<String>,
    },

    /// List everyone in the tree
    List,

    /// Print the tree as seen from one person
    Show {
        /// Root person (defaults to the first person added)
        #[arg(long)]
        root: Option<String>,

        /// Print the projection as JSON instead of an outline
        #[arg(long)]
        json: bool,
    },

    /// Fill in parents, grandparents and siblings of a person
    Autocomplete {
        /// Person to complete (defaults to the first person added)
        id: Option<String>,

        /// Skip the biography lookup and generate relatives directly
        #[arg(long)]
        synthetic: bool,

        /// Answer every prompt automatically: no candidate, generate relatives
        #[arg(short, long)]
        yes: bool,
    },

    /// Write the tree as JSON to a file, or to stdout
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the tree with the contents of a JSON file
    Import { file: PathBuf },

    /// Remove every person and relationship
    Clear,
}

fn parse_gender(s: &str) -> Result<Gender, String> {
    match s.to_ascii_lowercase().as_str() {
        "male" | "m" => Ok(Gender::Male),
        "female" | "f" => Ok(Gender::Female),
        other => Err(format!("unknown gender '{}'", other)),
    }
}

/// Prompts on the terminal. An empty answer cancels.
struct StdinSelection;

async fn prompt(message: &str) -> Option<String> {
    print!("{}", message);
    io::stdout().flush().ok()?;
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().read_line(&mut line).map(|_| line)
    })
    .await
    .ok()?
    .ok()?;
    let answer = line.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

#[async_trait]
impl Selection for StdinSelection {
    async fn choose(&self, candidates: &[CandidateRecord]) -> Option<CandidateRecord> {
        println!("Found {} possible matches:", candidates.len());
        for (i, candidate) in candidates.iter().enumerate() {
            let label = candidate.label.as_deref().unwrap_or(&candidate.id);
            match candidate.description.as_deref() {
                Some(description) => println!("  {}. {} ({})", i + 1, label, description),
                None => println!("  {}. {}", i + 1, label),
            }
        }
        let answer = prompt("Select a number (empty to cancel): ").await?;
        let index = answer.parse::<usize>().ok()?.checked_sub(1)?;
        candidates.get(index).cloned()
    }

    async fn confirm_synthetic(&self) -> bool {
        let answer = prompt("No biographical data merged. Generate plausible relatives? [y/N] ").await;
        matches!(
            answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes" | "s" | "sim")
        )
    }
}

fn resolve_id(tree: &FamilyTree, id: Option<String>) -> Result<PersonId, TreeError> {
    match id {
        Some(id) => Ok(PersonId::from(id)),
        None => tree
            .first_person()
            .map(|p| p.id.clone())
            .ok_or(TreeError::EmptyTree),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load(&args.config)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tree = load_tree(&args.tree)?;

    match args.command {
        Command::Add { name, gender, birth, death, relation, to } => {
            let to = to.map(PersonId::from);
            let relation = relation.zip(to.as_ref());
            let id = add_relative(&mut tree, &name, gender, birth, death, relation, &mut rng)?;
            save_tree(&tree, &args.tree)?;
            println!("Added {}", id);
        }
        Command::List => {
            if tree.is_empty() {
                println!("The tree is empty.");
            }
            for person in tree.people() {
                println!("{}", describe_person(person));
            }
        }
        Command::Show { root, json } => {
            let root = root.map(PersonId::from);
            let Some(node) = project_tree(&tree, root.as_ref()) else {
                match root {
                    Some(id) => return Err(TreeError::PersonNotFound(id).into()),
                    None => {
                        println!("The tree is empty.");
                        return Ok(());
                    }
                }
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&node)?);
            } else {
                print!("{}", render_text(&node));
            }
        }
        Command::Autocomplete { id, synthetic, yes } => {
            let person_id = resolve_id(&tree, id)?;
            let mut autocomplete = config.autocomplete.clone();
            if synthetic {
                autocomplete.use_external_data = false;
            }
            let source = if autocomplete.use_external_data {
                match WikidataSource::new(config.wikidata.clone()) {
                    Ok(source) => Some(source),
                    Err(e) => {
                        warn!(error = %e, "biography source unavailable");
                        None
                    }
                }
            } else {
                None
            };
            let synthesizer = AncestrySynthesizer::new(config.demographics(), autocomplete);
            let selection: &dyn Selection = if yes { &AlwaysSynthesize } else { &StdinSelection };

            println!("Autocompleting with seed: {}", seed);
            let outcome = synthesizer
                .autocomplete(
                    &mut tree,
                    &person_id,
                    source.as_ref().map(|s| s as &dyn BiographySource),
                    selection,
                    &mut rng,
                )
                .await?;
            match outcome {
                AutocompleteOutcome::ExternalMerged(report) => println!(
                    "Imported {} people and {} relationships from biographical records",
                    report.people_added, report.relationships_added
                ),
                AutocompleteOutcome::Synthesized(report) => println!(
                    "Generated {} people and {} relationships",
                    report.people_added, report.relationships_added
                ),
                AutocompleteOutcome::Declined => {
                    println!("Cancelled; the tree was not changed.");
                    return Ok(());
                }
            }
            save_tree(&tree, &args.tree)?;
        }
        Command::Export { output } => match output {
            Some(path) => {
                save_tree(&tree, &path)?;
                println!("Exported {} people to {}", tree.people().len(), path.display());
            }
            None => println!("{}", tree.to_json_pretty()?),
        },
        Command::Import { file } => {
            import_into(&mut tree, &file)?;
            save_tree(&tree, &args.tree)?;
            println!(
                "Imported {} people and {} relationships",
                tree.people().len(),
                tree.relationships().len()
            );
        }
        Command::Clear => {
            tree.clear();
            save_tree(&tree, &args.tree)?;
            println!("Tree cleared.");
        }
    }
    Ok(())
}
