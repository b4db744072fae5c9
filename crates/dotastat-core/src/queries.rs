//! Catalogue of upstream query operations.
//!
//! Each [`Query`] names one OpenDota resource and knows the relative endpoint
//! path and parameters it is fetched with.
//!
//! | Query | Endpoint |
//! |-------|----------|
//! | `Player` | `players/{id}` |
//! | `PlayerWinLoss` | `players/{id}/wl` |
//! | `PlayerRecentMatches` | `players/{id}/recentMatches` |
//! | `PlayerHeroes` | `players/{id}/heroes` |
//! | `PlayerPeers` | `players/{id}/peers` |
//! | `PlayerTotals` | `players/{id}/totals` |
//! | `PlayerRankings` | `players/{id}/rankings` |
//! | `PlayerWordcloud` | `players/{id}/wordcloud` |
//! | `Match` | `matches/{id}` |
//! | `Heroes` | `heroes` |
//! | `HeroStats` | `heroStats` |
//! | `Search` | `search?q=...` |
//! | `ProPlayers` | `proPlayers` |
//! | `ProMatches` | `proMatches` |
//! | `PublicMatches` | `publicMatches` |
//! | `Team` | `teams/{id}` |
//! | `TeamPlayers` | `teams/{id}/players` |
//! | `Health` | `health` |

use std::fmt::{Display, Formatter};

use crate::dispatcher::QueryParams;
use crate::error::QueryError;

/// Steam32 account identifier.
pub type AccountId = u64;
pub type MatchId = u64;
pub type TeamId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Player(AccountId),
    PlayerWinLoss(AccountId),
    PlayerRecentMatches(AccountId),
    PlayerHeroes(AccountId),
    PlayerPeers(AccountId),
    PlayerTotals(AccountId),
    PlayerRankings(AccountId),
    PlayerWordcloud(AccountId),
    Match(MatchId),
    Heroes,
    HeroStats,
    Search(String),
    ProPlayers,
    ProMatches,
    PublicMatches,
    Team(TeamId),
    TeamPlayers(TeamId),
    Health,
}

impl Query {
    /// Player search by persona name. Blank queries are rejected.
    pub fn search(query: impl AsRef<str>) -> Result<Self, QueryError> {
        let query = query.as_ref().trim();
        if query.is_empty() {
            return Err(QueryError::EmptySearch);
        }
        Ok(Self::Search(query.to_owned()))
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Player(_) => "player",
            Self::PlayerWinLoss(_) => "player_win_loss",
            Self::PlayerRecentMatches(_) => "player_recent_matches",
            Self::PlayerHeroes(_) => "player_heroes",
            Self::PlayerPeers(_) => "player_peers",
            Self::PlayerTotals(_) => "player_totals",
            Self::PlayerRankings(_) => "player_rankings",
            Self::PlayerWordcloud(_) => "player_wordcloud",
            Self::Match(_) => "match",
            Self::Heroes => "heroes",
            Self::HeroStats => "hero_stats",
            Self::Search(_) => "search",
            Self::ProPlayers => "pro_players",
            Self::ProMatches => "pro_matches",
            Self::PublicMatches => "public_matches",
            Self::Team(_) => "team",
            Self::TeamPlayers(_) => "team_players",
            Self::Health => "health",
        }
    }

    /// Relative endpoint path under the API base URL.
    pub fn path(&self) -> String {
        match self {
            Self::Player(id) => format!("players/{id}"),
            Self::PlayerWinLoss(id) => format!("players/{id}/wl"),
            Self::PlayerRecentMatches(id) => format!("players/{id}/recentMatches"),
            Self::PlayerHeroes(id) => format!("players/{id}/heroes"),
            Self::PlayerPeers(id) => format!("players/{id}/peers"),
            Self::PlayerTotals(id) => format!("players/{id}/totals"),
            Self::PlayerRankings(id) => format!("players/{id}/rankings"),
            Self::PlayerWordcloud(id) => format!("players/{id}/wordcloud"),
            Self::Match(id) => format!("matches/{id}"),
            Self::Heroes => String::from("heroes"),
            Self::HeroStats => String::from("heroStats"),
            Self::Search(_) => String::from("search"),
            Self::ProPlayers => String::from("proPlayers"),
            Self::ProMatches => String::from("proMatches"),
            Self::PublicMatches => String::from("publicMatches"),
            Self::Team(id) => format!("teams/{id}"),
            Self::TeamPlayers(id) => format!("teams/{id}/players"),
            Self::Health => String::from("health"),
        }
    }

    /// Query parameters, excluding the process-wide credential.
    pub fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Self::Search(query) = self {
            params.insert(String::from("q"), query.clone());
        }
        params
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
