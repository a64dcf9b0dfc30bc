use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Workspace {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimeEntry {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: String,
    /// Empty while the entry is running.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stop: String,
    /// Seconds, `-1` while running.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub workspace_id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_with: String,
}

impl TimeEntry {
    pub fn is_running(&self) -> bool {
        self.stop.is_empty()
    }
}

/// Body of `POST /workspaces/{id}/time_entries`.
#[derive(Debug, Clone, Serialize)]
pub struct StartRequest {
    pub description: String,
    pub created_with: String,
    pub workspace_id: u64,
    pub start: String,
    pub duration: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
