use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use trajectory_core::Goal;

/// `$TRAJECTORY_HOME`, else `~/.trajectory`.
pub fn trajectory_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TRAJECTORY_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".trajectory"))
}

pub async fn ensure_trajectory_home() -> Result<PathBuf> {
    let dir = trajectory_home()?;
    fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    pub name: String,
    pub created_at_utc: Option<String>,
}

pub async fn goals_path() -> Result<PathBuf> {
    Ok(ensure_trajectory_home().await?.join("goals.json"))
}

pub async fn profile_path() -> Result<PathBuf> {
    Ok(ensure_trajectory_home().await?.join("profile.json"))
}

pub async fn write_profile(profile: &Profile) -> Result<()> {
    let p = profile_path().await?;
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(&p, json)
        .await
        .with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub async fn read_profile() -> Result<Option<Profile>> {
    let p = profile_path().await?;
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p)
        .await
        .with_context(|| format!("read {}", p.display()))?;
    Ok(Some(serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?))
}

/// On-disk shape of `goals.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalFile {
    /// Highest `goal-N` number ever issued; removed ids are not reused.
    #[serde(default)]
    last_id: u64,
    #[serde(default)]
    goals: Vec<Goal>,
}

fn id_number(id: &str) -> Option<u64> {
    id.strip_prefix("goal-")?.parse().ok()
}

/// File-backed goal list.
pub struct GoalStore {
    path: PathBuf,
    last_id: u64,
    goals: Vec<Goal>,
}

impl GoalStore {
    pub async fn open_default() -> Result<Self> {
        Self::open(goals_path().await?).await
    }

    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file: GoalFile = if path.exists() {
            let s = fs::read_to_string(&path)
                .await
                .with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?
        } else {
            GoalFile::default()
        };
        let last_id = file
            .goals
            .iter()
            .filter_map(|g| id_number(&g.id))
            .fold(file.last_id, u64::max);
        tracing::debug!(path = %path.display(), count = file.goals.len(), last_id, "goal store opened");
        Ok(Self {
            path,
            last_id,
            goals: file.goals,
        })
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == id)
    }

    /// Next never-issued id of the form `goal-N`.
    pub fn next_id(&self) -> String {
        format!("goal-{}", self.last_id + 1)
    }

    pub fn push(&mut self, goal: Goal) {
        if let Some(n) = id_number(&goal.id) {
            self.last_id = self.last_id.max(n);
        }
        self.goals.push(goal);
    }

    pub fn remove(&mut self, id: &str) -> Option<Goal> {
        let idx = self.goals.iter().position(|g| g.id == id)?;
        Some(self.goals.remove(idx))
    }

    pub async fn save(&self) -> Result<()> {
        let file = GoalFile {
            last_id: self.last_id,
            goals: self.goals.clone(),
        };
        let json = serde_json::to_string_pretty(&file).context("serialize goals")?;
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}
