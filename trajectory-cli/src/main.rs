use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use trajectory_core::{
    calc_progress_percent, parse_goal_input, Goal, GoalCategory, GoalForm, ProgressMode, Unit,
    UserStats,
};

mod config;
mod setup;
mod state;

use state::GoalStore;

#[derive(Parser, Debug)]
#[command(name = "trajectory", version, about = "Trajectory goal tracker CLI")]
struct Cli {
    /// Print JSON instead of text (overrides config)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse free goal text into title, target, unit and progress mode
    Parse {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Progress percentage for a current/target pair
    Percent {
        #[arg(allow_negative_numbers = true)]
        current: f64,
        #[arg(allow_negative_numbers = true)]
        target: f64,
    },

    /// Interactive onboarding: name and a first goal
    Setup,

    /// Manage stored goals
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Counters over stored goals
    Stats,

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    /// Add a goal; blank fields are filled from the text
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        current: Option<f64>,
        /// Unit token or alias (руб, раз, км, кг, шаг, поездка, usd, eur)
        #[arg(long)]
        unit: Option<Unit>,
        /// increment | absolute | best
        #[arg(long)]
        mode: Option<ProgressMode>,
        #[arg(long)]
        category: Option<GoalCategory>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Record a progress report for a goal
    Log {
        id: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// List stored goals
    List,

    /// Pause a goal (reports are rejected until resumed)
    Pause { id: String },

    /// Resume a paused goal
    Resume { id: String },

    /// Delete a goal
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config().await?;
    init_tracing(&cfg.log.level);
    let json = cli.json || cfg.output.json;

    match cli.command {
        Command::Parse { text } => {
            let parsed = parse_goal_input(&text.join(" "));
            if json {
                print_json(&parsed)?;
            } else {
                println!("title:  {}", parsed.title);
                match parsed.target_value {
                    Some(t) => println!("target: {}", t),
                    None => println!("target: (none)"),
                }
                println!("unit:   {}", parsed.unit);
                println!("mode:   {} ({})", parsed.progress_mode, parsed.progress_mode.hint());
            }
        }

        Command::Percent { current, target } => {
            let pct = calc_progress_percent(current, target);
            if json {
                print_json(&pct)?;
            } else {
                println!("{}%", pct);
            }
        }

        Command::Setup => {
            setup::run_setup().await?;
        }

        Command::Goal { command } => run_goal_command(command, cfg.goals.default_category, json).await?,

        Command::Stats => {
            let store = GoalStore::open_default().await?;
            let stats = UserStats::from_goals(store.goals());
            if json {
                print_json(&stats)?;
            } else {
                if let Some(profile) = state::read_profile().await? {
                    println!("{}", profile.name);
                }
                println!(
                    "Goals: {} (active {}, completed {}, paused {})",
                    stats.total_goals, stats.active_goals, stats.completed_goals, stats.paused_goals
                );
                println!("Average active progress: {}%", stats.average_active_percent);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config().await?,
        },
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serialize output")?);
    Ok(())
}

fn print_goal(goal: &Goal) {
    println!(
        "{} [{}] {} {} | {}/{} {} | {}% | {:?}",
        goal.id,
        goal.progress_mode,
        goal.category.icon(),
        goal.title,
        goal.current_value,
        goal.target_value,
        goal.unit,
        goal.progress_percent(),
        goal.status
    );
}

async fn run_goal_command(command: GoalCommand, default_category: GoalCategory, json: bool) -> Result<()> {
    let mut store = GoalStore::open_default().await?;
    let now = chrono::Utc::now();

    match command {
        GoalCommand::Add { text, target, current, unit, mode, category, description } => {
            let form = GoalForm {
                title: text.join(" "),
                description,
                category: category.unwrap_or(default_category),
                target,
                current,
                unit,
                progress_mode: mode,
                color: None,
            };
            let errors = form.validate();
            if !errors.is_empty() {
                let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                bail!("invalid goal:\n- {}", msgs.join("\n- "));
            }
            let goal = form.resolve()?.into_goal(store.next_id(), now);
            store.push(goal.clone());
            store.save().await?;
            if json {
                print_json(&goal)?;
            } else {
                print!("Added ");
                print_goal(&goal);
            }
        }

        GoalCommand::Log { id, value } => {
            let goal = store
                .get_mut(&id)
                .with_context(|| format!("no goal with id {id}"))?;
            let update = goal.record_progress(value, now)?;
            let goal = goal.clone();
            store.save().await?;
            if json {
                print_json(&goal)?;
            } else {
                println!("{}: {} -> {} {}", goal.title, update.previous, update.current, goal.unit);
                println!("{}% ({})", goal.progress_percent(), goal.progress_mode.hint());
                if update.just_completed {
                    println!("Goal completed!");
                }
            }
        }

        GoalCommand::List => {
            if json {
                print_json(&store.goals())?;
            } else if store.goals().is_empty() {
                println!("No goals yet. Add one: trajectory goal add \"Отжимания 100 раз\"");
            } else {
                for goal in store.goals() {
                    print_goal(goal);
                }
            }
        }

        GoalCommand::Pause { id } => {
            let goal = store
                .get_mut(&id)
                .with_context(|| format!("no goal with id {id}"))?;
            goal.pause(now);
            let goal = goal.clone();
            store.save().await?;
            if json {
                print_json(&goal)?;
            } else {
                println!("Paused {} ({:?})", goal.id, goal.status);
            }
        }

        GoalCommand::Resume { id } => {
            let goal = store
                .get_mut(&id)
                .with_context(|| format!("no goal with id {id}"))?;
            goal.resume(now);
            let goal = goal.clone();
            store.save().await?;
            if json {
                print_json(&goal)?;
            } else {
                println!("Resumed {} ({:?})", goal.id, goal.status);
            }
        }

        GoalCommand::Remove { id } => {
            let Some(goal) = store.remove(&id) else {
                bail!("no goal with id {id}");
            };
            store.save().await?;
            if json {
                print_json(&goal)?;
            } else {
                println!("Removed {} ({})", goal.id, goal.title);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag_reaches_goal_subcommands() {
        let cli = Cli::try_parse_from(["trajectory", "goal", "remove", "goal-1", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Goal { command: GoalCommand::Remove { ref id } } if id == "goal-1"
        ));
    }

    #[test]
    fn test_value_parsers_reject_unknown_tokens() {
        let err = Cli::try_parse_from(["trajectory", "goal", "add", "Бег", "--unit", "миль"]).unwrap_err();
        assert!(err.to_string().contains("unknown unit: миль"));
        let cli = Cli::try_parse_from(["trajectory", "goal", "add", "Бег", "--unit", "километров", "--mode", "best"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Goal { command: GoalCommand::Add { unit: Some(Unit::Km), mode: Some(ProgressMode::Best), .. } }
        ));
    }
}
