use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Team registry — read-only visual reference data keyed by team code
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Logo {
    /// Either a path/URL to an image file or inline `<svg ...>` markup.
    pub url: String,
    #[serde(default)]
    pub background: Option<String>,
}

/// Alternate codes show up as a single string or an array depending on the
/// source the registry was scraped from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alternates {
    One(String),
    Many(Vec<String>),
}

impl Alternates {
    fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Alternates::One(s) => std::slice::from_ref(s),
            Alternates::Many(v) => v,
        };
        slice.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamVisual {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub abbr: String,
    #[serde(default)]
    pub mascot: String,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: String,
    #[serde(default)]
    pub alternates: Option<Alternates>,
    pub logo: Logo,
}

/// Immutable code → visual-identity table, loaded once.
///
/// Lookup is exact code first, then case-insensitive alternate name via a
/// secondary index built at load time.
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    teams: HashMap<String, TeamVisual>,
    alternate_index: HashMap<String, String>,
}

impl TeamRegistry {
    pub fn from_map(teams: HashMap<String, TeamVisual>) -> Self {
        let mut alternate_index = HashMap::new();
        for (code, team) in &teams {
            if let Some(alternates) = &team.alternates {
                for alt in alternates.iter() {
                    alternate_index.insert(alt.to_lowercase(), code.clone());
                }
            }
        }
        Self {
            teams,
            alternate_index,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_map(serde_json::from_str(json)?))
    }

    pub fn get(&self, code: &str) -> Option<&TeamVisual> {
        if let Some(team) = self.teams.get(code) {
            return Some(team);
        }
        let code = self.alternate_index.get(&code.to_lowercase())?;
        self.teams.get(code)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
