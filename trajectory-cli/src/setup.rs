use anyhow::{bail, Result};
use std::io::{self, Write};
use trajectory_core::GoalForm;

use crate::state::{profile_path, write_profile, GoalStore, Profile};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Onboarding: a name, one goal in free text, and where the user stands today.
pub async fn run_setup() -> Result<()> {
    println!("Trajectory setup\n");
    let name = prompt("Your name")?;
    let goal_text = prompt("Your goal (e.g. \"Отжимания 100 раз\", \"накопить 50 тыс руб\")")?;
    let progress = prompt("Progress so far (blank for 0)")?;

    let current = if progress.is_empty() {
        0.0
    } else {
        match progress.replace(',', ".").parse::<f64>() {
            Ok(v) => v,
            Err(_) => bail!("not a number: {progress}"),
        }
    };

    let form = GoalForm {
        current: Some(current),
        ..GoalForm::new(goal_text)
    };
    let draft = form.resolve_onboarding()?;

    let mut store = GoalStore::open_default().await?;
    let now = chrono::Utc::now();
    let goal = draft.into_goal(store.next_id(), now);
    println!(
        "\nGoal {}: {} / {} {} ({}, {}%)",
        goal.id,
        goal.title,
        goal.target_value,
        goal.unit,
        goal.progress_mode.hint(),
        goal.progress_percent()
    );
    let id = goal.id.clone();
    store.push(goal);
    store.save().await?;

    let profile = Profile {
        name: if name.is_empty() { "Пользователь".to_string() } else { name },
        created_at_utc: Some(now.to_rfc3339()),
    };
    write_profile(&profile).await?;

    println!("\nWrote:");
    println!("- {}", profile_path().await?.display());

    println!("\nNext:");
    println!("- trajectory goal log {id} <value>");
    println!("- trajectory goal list");

    Ok(())
}
