// Stride Goal Assistant
// Main entry point for the Stride binary

use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use stride_engine::agent::{default_system_prompt, GoalAgent};
use stride_engine::cli::{Cli, Command};
use stride_engine::config::{api_key, Config};
use stride_engine::db::Database;
use stride_engine::llm::groq::GroqProvider;
use stride_engine::telemetry::init_telemetry_with_level;
use stride_engine::tools::ToolRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // The subscriber can only be installed once, so telemetry starts after
    // the log level is known. Precedence: RUST_LOG env > --log > config.
    init_telemetry_with_level(effective_log_level(&cli, &config));

    tracing::info!("Stride v{}", env!("CARGO_PKG_VERSION"));

    let database = Database::new(&config.db_path()).await?;
    let tools = Arc::new(ToolRegistry::new(
        database.goals(),
        database.milestones(),
        database.progress(),
    ));

    match cli.command {
        Some(Command::Analytics { user }) => {
            print_analytics(&database, &user).await?;
            database.close().await?;
            Ok(())
        }

        Some(Command::Run { message }) => {
            let mut agent = build_agent(&config, tools)?;
            let reply = agent.chat(&message).await;
            println!("{}", reply);
            database.close().await?;
            Ok(())
        }

        Some(Command::Chat) | None => {
            let mut agent = build_agent(&config, tools)?;
            run_chat_loop(&mut agent, &database).await?;
            database.close().await?;
            Ok(())
        }
    }
}

/// Log level for this run: the --log flag wins over the config file.
fn effective_log_level<'a>(cli: &'a Cli, config: &'a Config) -> &'a str {
    cli.log.as_deref().unwrap_or(&config.core.log_level)
}

/// Wire up the Groq provider and agent. Fails fast when GROQ_API_KEY is unset.
fn build_agent(config: &Config, tools: Arc<ToolRegistry>) -> anyhow::Result<GoalAgent> {
    let key = api_key()?;
    let provider = Arc::new(GroqProvider::new(config.llm.clone(), key));
    Ok(GoalAgent::new(provider, tools, default_system_prompt()))
}

/// Interactive REPL: free-form messages go to the agent, a few keywords are
/// handled locally.
async fn run_chat_loop(agent: &mut GoalAgent, database: &Database) -> anyhow::Result<()> {
    println!("🎯 Stride Goal Assistant");
    println!("Tell me about your goals, milestones, and progress in plain language.");
    println!("Commands: 'help', 'analytics', 'reset', 'quit'\n");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("You: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "bye" => {
                println!("Goodbye! Keep working towards your goals! 🚀");
                break;
            }
            "help" => {
                print_help();
            }
            "reset" => {
                agent.reset();
                println!("Conversation history cleared.");
            }
            "analytics" => {
                print_analytics(database, "default").await?;
            }
            _ => {
                let reply = agent.chat(input).await;
                println!("\nAssistant: {}\n", reply);
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("\nI can help you with:");
    println!("  - Creating goals       e.g. \"I want to run a marathon by June\"");
    println!("  - Listing goals        e.g. \"show me my active goals\"");
    println!("  - Goal details         e.g. \"how is my marathon goal going?\"");
    println!("  - Adding milestones    e.g. \"add a milestone to finish a 10k first\"");
    println!("  - Logging progress     e.g. \"I ran 5 miles today\"");
    println!("  - Updating goals       e.g. \"mark my reading goal as completed\"");
    println!("  - Analytics            type 'analytics' for a summary\n");
}

async fn print_analytics(database: &Database, user_id: &str) -> anyhow::Result<()> {
    let analytics = database.goals().get_goal_analytics(user_id).await?;

    println!("\n📊 Goal Analytics for '{}'", user_id);
    println!("  Total goals:  {}", analytics.total_goals);
    println!("  Active goals: {}", analytics.active_goals);

    if !analytics.status_breakdown.is_empty() {
        println!("  By status:");
        for stat in &analytics.status_breakdown {
            println!("    {:<12} {}", stat.status, stat.count);
        }
    }
    if !analytics.category_breakdown.is_empty() {
        println!("  By category:");
        for stat in &analytics.category_breakdown {
            println!("    {:<12} {}", stat.category, stat.count);
        }
    }
    println!();
    Ok(())
}
