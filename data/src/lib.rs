pub mod teams;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Domain types — canonical bracket document, independent of any scraper's
// wire format. Scrapers are an external collaborator that emits this shape.
// ---------------------------------------------------------------------------

/// One of the four 90° regions of the bracket circle.
///
/// The variant names describe the visual corner the region occupies until
/// the Final Four collapses all regions into the center rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    TL,
    TR,
    BL,
    BR,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::TL, Quadrant::TR, Quadrant::BL, Quadrant::BR];
}

impl FromStr for Quadrant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TL" => Ok(Quadrant::TL),
            "TR" => Ok(Quadrant::TR),
            "BL" => Ok(Quadrant::BL),
            "BR" => Ok(Quadrant::BR),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quadrant::TL => "TL",
            Quadrant::TR => "TR",
            Quadrant::BL => "BL",
            Quadrant::BR => "BR",
        };
        f.write_str(s)
    }
}

/// A named tournament region pinned to one quadrant of the circle.
///
/// `position` stays a raw string so a malformed code in source data is a
/// local problem (that label is skipped) rather than a document-level
/// deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub name: String,
    pub position: String,
}

impl Region {
    pub fn quadrant(&self) -> Option<Quadrant> {
        self.position.parse().ok()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contestant {
    #[serde(default)]
    pub name: String,
    /// Stable team identifier; the key into the team registry. Empty for
    /// a TBD slot.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub seed: u8,
    #[serde(default)]
    pub score: Option<u16>,
    #[serde(default)]
    pub winner: bool,
    /// Result later stripped from the record books. Rendered in a
    /// reduced-saturation treatment.
    #[serde(default)]
    pub vacated: bool,
}

impl Contestant {
    pub fn is_placeholder(&self) -> bool {
        self.code.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub home: Contestant,
    pub away: Contestant,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Empty on Final Four / championship records; derive via
    /// [`BracketDocument::find_team_region`] instead.
    #[serde(default, deserialize_with = "quadrant_or_none")]
    pub region: Option<Quadrant>,
    /// 1-based; round 0 is reserved for play-in games and never rendered.
    pub round: u32,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub link: Option<String>,
}

impl Game {
    /// The side flagged as the winner. Both sides unflagged on a complete
    /// game is a valid vacated/forfeit result.
    pub fn winner(&self) -> Option<&Contestant> {
        if self.home.winner {
            Some(&self.home)
        } else if self.away.winner {
            Some(&self.away)
        } else {
            None
        }
    }

    pub fn involves(&self, code: &str) -> bool {
        !code.is_empty() && (self.home.code == code || self.away.code == code)
    }
}

/// Accepts "TL"/"TR"/"BL"/"BR", mapping "" and anything unrecognized to
/// `None` so one malformed record cannot sink the whole document.
fn quadrant_or_none<'de, D>(deserializer: D) -> Result<Option<Quadrant>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|s| s.parse().ok()))
}

/// The canonical bracket document for one tournament season.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketDocument {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    pub year: u16,
    /// `Some(false)` suppresses seed numbers (pre-seeding era brackets).
    #[serde(default)]
    pub display_seeds: Option<bool>,
    /// Free-text flag (e.g. "postponed") that short-circuits rendering in
    /// favor of a status message.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub games: Vec<Game>,
}

impl BracketDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Ring count: 1 + the highest round number present. A 64-entry bracket
    /// with a round-6 championship has 7 rings (the innermost is the
    /// champion medallion).
    pub fn num_rounds(&self) -> u32 {
        1 + self.games.iter().map(|g| g.round).max().unwrap_or(0)
    }

    /// Slot count on the outermost ring: 2^(num_rounds - 1).
    pub fn num_entries(&self) -> u32 {
        2u32.pow(self.num_rounds().saturating_sub(1))
    }

    /// Games that appear on the circle. Play-in (round 0) games are data
    /// only; they never occupy a ring.
    pub fn renderable_games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(|g| g.round > 0)
    }

    pub fn championship_game(&self) -> Option<&Game> {
        let round = self.num_rounds().saturating_sub(1);
        self.games.iter().find(|g| g.round == round && g.round > 0)
    }

    /// The quadrant a team started the tournament in, taken from its
    /// earliest-round game. Needed for Final Four and championship records,
    /// whose own `region` field is empty.
    pub fn find_team_region(&self, code: &str) -> Option<Quadrant> {
        self.games
            .iter()
            .filter(|g| g.round > 0 && g.involves(code))
            .min_by_key(|g| g.round)?
            .region
    }

    /// Look up the game a hit-test resolved: unique by (round, team code).
    pub fn game_for(&self, round: u32, code: &str) -> Option<&Game> {
        self.games
            .iter()
            .find(|g| g.round == round && g.involves(code))
    }

    /// Region labels are all-or-nothing: one unnamed region suppresses the
    /// whole set rather than rendering blanks.
    pub fn all_regions_named(&self) -> bool {
        !self.regions.is_empty() && self.regions.iter().all(|r| !r.name.is_empty())
    }

    /// Sanity checks on a scraped document. Returns human-readable issues;
    /// none of these are fatal to rendering.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for game in self.renderable_games() {
            for side in [&game.home, &game.away] {
                if !side.is_placeholder() && !(1..=16).contains(&side.seed) {
                    issues.push(format!(
                        "round {} team {}: seed {} outside 1..=16",
                        game.round, side.code, side.seed
                    ));
                }
            }
            if game.is_complete && game.home.winner && game.away.winner {
                issues.push(format!(
                    "round {} {} vs {}: both sides flagged winner",
                    game.round, game.home.code, game.away.code
                ));
            }
        }

        for (i, a) in self.games.iter().enumerate() {
            for b in self.games.iter().skip(i + 1) {
                if a.round == b.round && a.round > 0 {
                    for code in [&a.home.code, &a.away.code] {
                        if !code.is_empty() && b.involves(code) {
                            issues.push(format!(
                                "round {}: team {} appears in more than one game",
                                a.round, code
                            ));
                        }
                    }
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> BracketDocument {
        serde_json::from_value(json!({
            "year": 2024,
            "regions": [
                { "name": "East", "position": "TL" },
                { "name": "West", "position": "TR" },
                { "name": "South", "position": "BL" },
                { "name": "Midwest", "position": "BR" }
            ],
            "games": [
                {
                    "round": 1,
                    "region": "TL",
                    "isComplete": true,
                    "home": { "code": "unc", "name": "North Carolina", "seed": 1, "winner": true },
                    "away": { "code": "wagner", "name": "Wagner", "seed": 16 }
                },
                {
                    "round": 2,
                    "region": "TL",
                    "isComplete": false,
                    "home": { "code": "unc", "name": "North Carolina", "seed": 1 },
                    "away": { "code": "msu", "name": "Michigan State", "seed": 9 }
                },
                {
                    "round": 6,
                    "region": "",
                    "isComplete": false,
                    "home": { "code": "unc", "name": "North Carolina", "seed": 1 },
                    "away": { "code": "", "name": "", "seed": 0 }
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn parses_camel_case_fields() {
        let doc = sample_document();
        assert_eq!(doc.year, 2024);
        assert!(doc.games[0].is_complete);
        assert_eq!(doc.games[0].region, Some(Quadrant::TL));
        assert_eq!(doc.games[2].region, None);
    }

    #[test]
    fn num_rounds_is_one_plus_max_round() {
        let doc = sample_document();
        assert_eq!(doc.num_rounds(), 7);
        assert_eq!(doc.num_entries(), 64);
    }

    #[test]
    fn empty_document_has_single_slot() {
        let doc = BracketDocument::default();
        assert_eq!(doc.num_rounds(), 1);
        assert_eq!(doc.num_entries(), 1);
    }

    #[test]
    fn play_in_games_are_not_renderable() {
        let mut doc = sample_document();
        doc.games.push(Game {
            round: 0,
            ..Game::default()
        });
        assert_eq!(doc.renderable_games().count(), 3);
    }

    #[test]
    fn find_team_region_uses_earliest_round() {
        let doc = sample_document();
        // unc's championship record has no region; the round-1 game does.
        assert_eq!(doc.find_team_region("unc"), Some(Quadrant::TL));
        assert_eq!(doc.find_team_region("nobody"), None);
        assert_eq!(doc.find_team_region(""), None);
    }

    #[test]
    fn championship_game_matches_last_played_round() {
        let doc = sample_document();
        let champ = doc.championship_game().unwrap();
        assert_eq!(champ.round, 6);
    }

    #[test]
    fn game_for_resolves_round_and_code() {
        let doc = sample_document();
        let game = doc.game_for(2, "msu").unwrap();
        assert_eq!(game.home.code, "unc");
        assert!(doc.game_for(2, "wagner").is_none());
    }

    #[test]
    fn all_regions_named_is_all_or_nothing() {
        let mut doc = sample_document();
        assert!(doc.all_regions_named());
        doc.regions[2].name.clear();
        assert!(!doc.all_regions_named());
    }

    #[test]
    fn malformed_region_code_parses_as_none() {
        let doc: BracketDocument = serde_json::from_value(json!({
            "year": 1999,
            "games": [{
                "round": 1,
                "region": "northwest",
                "home": { "code": "a", "seed": 1 },
                "away": { "code": "b", "seed": 16 }
            }]
        }))
        .unwrap();
        assert_eq!(doc.games[0].region, None);
    }

    #[test]
    fn winner_prefers_flag_over_score() {
        let game = Game {
            home: Contestant {
                code: "a".into(),
                score: Some(50),
                ..Contestant::default()
            },
            away: Contestant {
                code: "b".into(),
                score: Some(70),
                winner: true,
                ..Contestant::default()
            },
            round: 1,
            ..Game::default()
        };
        assert_eq!(game.winner().unwrap().code, "b");
    }

    #[test]
    fn vacated_game_has_no_winner() {
        let game = Game {
            home: Contestant {
                code: "a".into(),
                ..Contestant::default()
            },
            away: Contestant {
                code: "b".into(),
                ..Contestant::default()
            },
            round: 6,
            is_complete: true,
            ..Game::default()
        };
        assert!(game.winner().is_none());
    }

    #[test]
    fn validate_flags_bad_seed_and_duplicates() {
        let mut doc = sample_document();
        doc.games[0].home.seed = 20;
        doc.games.push(doc.games[1].clone());
        let issues = doc.validate();
        assert!(issues.iter().any(|i| i.contains("seed 20")));
        assert!(issues.iter().any(|i| i.contains("more than one game")));
    }
}
