//! finder — compile and run virtual find methods
//!
//! # Usage
//!
//! ```bash
//! # Show the descriptor for a finder name
//! finder compile findOneById -a 2
//!
//! # Explain tokens, descriptor and SQL
//! finder explain findIdNameByNameOrderedByIdDesc --table users
//!
//! # Execute against a database
//! finder run findOneByEmail --table users -a a@b.com
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use finder::prelude::*;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "finder")]
#[command(version)]
#[command(about = "Compile camel-case finder names into queries", long_about = None)]
#[command(after_help = "EXAMPLES:
    finder compile findAll
    finder compile findIdNameByNameAndStatus -a mike -a active --format json
    finder explain findAllOrderedByIdDesc --table users
    finder run findOneById --table users -a 2 --database-url sqlite://app.db")]
struct Cli {
    /// Config file (defaults to ./finder.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Table,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a finder name and print its descriptor
    Compile {
        /// The finder name, e.g. findOneById
        name: String,

        /// Positional arguments bound to the `?` placeholders
        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Show tokens, descriptor and SQL for a finder name
    Explain {
        name: String,

        /// Table used for the generated SQL
        #[arg(short, long, default_value = "records")]
        table: String,
    },
    /// Execute a finder name against a database
    Run {
        name: String,

        #[arg(short, long)]
        table: String,

        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Database connection URL
        #[arg(long, env = "FINDER_DATABASE_URL")]
        database_url: Option<String>,

        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Show the reserved keyword reference
    Keywords,
    /// Interactive REPL mode
    Repl,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "finder=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = FinderConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Compile { name, args, format } => {
            let query = compile(&name, parse_args(&args))?;
            let format = format.map(Into::into).unwrap_or(config.output.format);
            print_descriptor(&query, format)?;
        }
        Commands::Explain { name, table } => explain(&name, &table),
        Commands::Run {
            name,
            table,
            args,
            database_url,
            format,
        } => {
            let mut db_config = config.database.clone();
            if database_url.is_some() {
                db_config.url = database_url;
            }
            if db_config.url.is_none() {
                anyhow::bail!("No database URL. Use --database-url, set FINDER_DATABASE_URL, or configure [database] url");
            }

            let query = compile(&name, parse_args(&args))?;
            let db = FinderDB::connect_with(&db_config).await?;
            if cli.verbose {
                println!("{} {}", "SQL:".dimmed(), db.sql(&table, &query)?.white());
            }
            let found = db.find(&table, &query).await?;
            let format = format.map(Into::into).unwrap_or(config.output.format);
            print_found(found, format)?;
        }
        Commands::Keywords => show_keywords(),
        Commands::Repl => run_repl(),
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Vec<Value> {
    args.iter().map(|a| Value::from_arg(a)).collect()
}

fn print_descriptor(query: &QueryDescriptor, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(query)?),
        OutputFormat::Table => {
            let values: Vec<String> = query.values.iter().map(|v| v.to_string()).collect();
            let rows = [
                ("select", query.select.clone()),
                ("where", query.filter.clone()),
                ("order", query.order.clone()),
                ("limit", query.limit.to_string()),
                ("offset", query.offset.to_string()),
                ("values", format!("[{}]", values.join(", "))),
            ];
            for (key, value) in rows {
                println!("  {:8} {}", key.dimmed(), value.white());
            }
        }
    }
    Ok(())
}

fn print_found(found: Found, format: OutputFormat) -> anyhow::Result<()> {
    if found.is_empty() {
        println!("{}", "(no results)".dimmed());
        return Ok(());
    }

    let one = matches!(found, Found::One(_));
    let results = found.into_records();

    match format {
        OutputFormat::Json if one => {
            println!("{}", serde_json::to_string_pretty(&results[0])?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Table => {
            // Union of column names, sorted for a stable layout
            let columns: Vec<&String> = results
                .iter()
                .flat_map(|r| r.keys())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            let widths: Vec<usize> = columns
                .iter()
                .map(|c| {
                    results
                        .iter()
                        .map(|r| r.get(*c).map(val_to_string).unwrap_or_default().len())
                        .max()
                        .unwrap_or(0)
                        .max(c.len())
                })
                .collect();

            let header: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:width$}", c, width = *w))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in &results {
                let cells: Vec<String> = columns
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| {
                        let val = row.get(*c).map(val_to_string).unwrap_or_default();
                        format!("{:width$}", val, width = *w)
                    })
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", results.len().to_string().cyan());
        }
    }
    Ok(())
}

fn val_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => val.to_string(),
    }
}

fn explain(name: &str, table: &str) {
    println!("{}", "Finder Explanation".cyan().bold());
    println!();
    println!("{} {}", "Name:".dimmed(), name.yellow());
    println!();

    let tokens = match tokenize(name) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{} {}", "Parse Error:".red().bold(), e);
            return;
        }
    };

    println!("{}", "Tokens:".green().bold());
    for token in &tokens {
        match Keyword::from_token(token) {
            Some(kw) => println!("    • {} {}", kw.to_string().cyan().bold(), "(keyword)".dimmed()),
            None => println!("    • {}", token.white()),
        }
    }
    println!();

    match compile(name, vec![]) {
        Ok(query) => {
            println!("{}", "Descriptor:".green().bold());
            let _ = print_descriptor(&query, OutputFormat::Table);
            println!();
            println!("{}", "Generated SQL:".green().bold());
            match query.on(table).to_sql() {
                Ok(sql) => println!("  {}", sql.white()),
                Err(e) => eprintln!("  {} {}", "SQL Error:".red().bold(), e),
            }
        }
        Err(e) => {
            eprintln!("{} {}", "Grammar Error:".red().bold(), e);
        }
    }
}

/// Run the interactive REPL mode.
fn run_repl() {
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    println!("{}", "finder REPL — Interactive Mode".cyan().bold());
    println!("{}", "Type finder names (optionally followed by arguments) to see descriptors.".dimmed());
    println!("  {}  - Exit the REPL", ".exit".yellow());
    println!("  {} - Show keyword reference", ".help".yellow());
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("{} {}", "Failed to initialize REPL:".red(), e);
            return;
        }
    };

    // Load history if available
    let history_path = dirs::home_dir()
        .map(|p| p.join(".finder_history"))
        .unwrap_or_default();
    let _ = rl.load_history(&history_path);

    loop {
        let prompt = "finder> ".cyan().bold().to_string();
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match line {
                    ".exit" | ".quit" | "exit" | "quit" => {
                        println!("{}", "Goodbye!".green());
                        break;
                    }
                    ".help" | "help" => {
                        show_keywords();
                        continue;
                    }
                    _ => {}
                }

                let mut parts = line.split_whitespace();
                let name = parts.next().unwrap_or_default();
                let args: Vec<Value> = parts.map(Value::from_arg).collect();

                match compile(name, args) {
                    Ok(query) => {
                        let _ = print_descriptor(&query, OutputFormat::Table);
                        match query.on("records").to_sql() {
                            Ok(sql) => println!("{} {}", "→".green(), sql.white().bold()),
                            Err(e) => eprintln!("{} {}", "✗".red(), e.to_string().red()),
                        }
                        println!();
                    }
                    Err(e) => {
                        eprintln!("{} {}", "✗".red(), e.to_string().red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red(), e);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
}

fn show_keywords() {
    println!("{}", "Finder Keyword Reference".cyan().bold());
    println!();

    let keywords = [
        (Keyword::All, "Select every column", "findAll"),
        (Keyword::One, "Select every column, LIMIT 1", "findOneById"),
        (Keyword::By, "Following fields become predicates", "findByNameStatus"),
        (Keyword::And, "The next field becomes a predicate", "findByNameAndStatus"),
        (Keyword::Ordered, "OrderedBy<Field>[Asc|Desc]", "findAllOrderedByIdDesc"),
    ];

    println!(
        "{:10} {:40} {}",
        "Keyword".white().bold(),
        "Effect".white().bold(),
        "Example".white().bold()
    );
    println!("{}", "─".repeat(80).dimmed());

    for (kw, effect, example) in keywords {
        println!(
            "{:10} {:40} {}",
            kw.to_string().cyan().bold(),
            effect.white(),
            example.yellow()
        );
    }

    println!();
    println!(
        "{}",
        format!("Reserved words: {}", RESERVED.join(", ")).dimmed()
    );
}
