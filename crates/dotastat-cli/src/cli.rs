//! CLI argument definitions for dotastat.
//!
//! # Commands
//!
//! | Command | Upstream endpoint |
//! |---------|-------------------|
//! | `player` | `players/{id}` |
//! | `win-loss` | `players/{id}/wl` |
//! | `recent-matches` | `players/{id}/recentMatches` |
//! | `player-heroes` | `players/{id}/heroes` |
//! | `peers` | `players/{id}/peers` |
//! | `totals` | `players/{id}/totals` |
//! | `rankings` | `players/{id}/rankings` |
//! | `wordcloud` | `players/{id}/wordcloud` |
//! | `match` | `matches/{id}` |
//! | `heroes` | `heroes` |
//! | `hero-stats` | `heroStats` |
//! | `search` | `search?q=` |
//! | `pro-players` | `proPlayers` |
//! | `pro-matches` | `proMatches` |
//! | `public-matches` | `publicMatches` |
//! | `team` | `teams/{id}` |
//! | `team-players` | `teams/{id}/players` |
//! | `health` | `health` |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--log-level` | `$LOG_LEVEL` or `info` | Log verbosity (stderr) |
//! | `--json` | `false` | Print errors as JSON on stdout |
//! | `--no-health-check` | `false` | Skip the startup `health` probe |
//! | `--cache` | `use` | `use`, `refresh` (skip lookup, store result) or `bypass` |

use clap::{Args, Parser, Subcommand, ValueEnum};
use dotastat_core::queries::{AccountId, MatchId, TeamId};
use dotastat_core::{CacheMode, Query, QueryError};

/// Query Dota 2 statistics from the OpenDota API.
///
/// Responses are cached for five minutes and outbound calls are limited to
/// sixty per minute. Set OPENDOTA_API_KEY to raise upstream limits.
#[derive(Debug, Parser)]
#[command(name = "dotastat", author, version, about = "OpenDota statistics CLI")]
pub struct Cli {
    /// Log verbosity: trace, debug, info, warn, error.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Print classified errors as JSON on stdout.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Skip the startup connectivity probe.
    #[arg(long, global = true, default_value_t = false)]
    pub no_health_check: bool,

    /// How the command's query uses the response cache.
    #[arg(long, global = true, value_enum, default_value_t = CachePolicy::Use)]
    pub cache: CachePolicy,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CachePolicy {
    Use,
    Refresh,
    Bypass,
}

impl From<CachePolicy> for CacheMode {
    fn from(policy: CachePolicy) -> Self {
        match policy {
            CachePolicy::Use => Self::Use,
            CachePolicy::Refresh => Self::Refresh,
            CachePolicy::Bypass => Self::Bypass,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Player profile.
    Player(AccountArgs),
    /// Player win/loss record.
    WinLoss(AccountArgs),
    /// Player's most recent matches.
    RecentMatches(LimitedAccountArgs),
    /// Heroes a player has played most.
    PlayerHeroes(LimitedAccountArgs),
    /// Players a player has played with most.
    Peers(LimitedAccountArgs),
    /// Lifetime stat totals for a player.
    Totals(AccountArgs),
    /// Player hero rankings.
    Rankings(AccountArgs),
    /// Words a player has written and read in chat.
    Wordcloud(AccountArgs),
    /// Full match details.
    Match(MatchArgs),
    /// Hero list.
    Heroes,
    /// Hero pick and win statistics.
    HeroStats,
    /// Search players by persona name.
    Search(SearchArgs),
    /// Professional players.
    ProPlayers(LimitArgs),
    /// Recent professional matches.
    ProMatches(LimitArgs),
    /// Recent public matches.
    PublicMatches(LimitArgs),
    /// Team details.
    Team(TeamArgs),
    /// Players on a team.
    TeamPlayers(TeamArgs),
    /// Upstream health.
    Health,
}

#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Steam32 account id.
    pub account_id: AccountId,
}

#[derive(Debug, Args)]
pub struct LimitedAccountArgs {
    /// Steam32 account id.
    pub account_id: AccountId,

    /// Maximum number of entries to print.
    #[arg(long, default_value_t = 5)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct MatchArgs {
    pub match_id: MatchId,
}

#[derive(Debug, Args)]
pub struct TeamArgs {
    pub team_id: TeamId,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Persona name to look for.
    pub query: String,
}

#[derive(Debug, Args)]
pub struct LimitArgs {
    /// Maximum number of entries to print.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

impl Command {
    pub fn to_query(&self) -> Result<Query, QueryError> {
        let query = match self {
            Self::Player(args) => Query::Player(args.account_id),
            Self::WinLoss(args) => Query::PlayerWinLoss(args.account_id),
            Self::RecentMatches(args) => Query::PlayerRecentMatches(args.account_id),
            Self::PlayerHeroes(args) => Query::PlayerHeroes(args.account_id),
            Self::Peers(args) => Query::PlayerPeers(args.account_id),
            Self::Totals(args) => Query::PlayerTotals(args.account_id),
            Self::Rankings(args) => Query::PlayerRankings(args.account_id),
            Self::Wordcloud(args) => Query::PlayerWordcloud(args.account_id),
            Self::Match(args) => Query::Match(args.match_id),
            Self::Heroes => Query::Heroes,
            Self::HeroStats => Query::HeroStats,
            Self::Search(args) => Query::search(&args.query)?,
            Self::ProPlayers(_) => Query::ProPlayers,
            Self::ProMatches(_) => Query::ProMatches,
            Self::PublicMatches(_) => Query::PublicMatches,
            Self::Team(args) => Query::Team(args.team_id),
            Self::TeamPlayers(args) => Query::TeamPlayers(args.team_id),
            Self::Health => Query::Health,
        };
        Ok(query)
    }

    /// Client-side cap on array payloads, for commands that take `--limit`.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::RecentMatches(args) | Self::PlayerHeroes(args) | Self::Peers(args) => {
                Some(args.limit)
            }
            Self::ProPlayers(args) | Self::ProMatches(args) | Self::PublicMatches(args) => {
                Some(args.limit)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn recent_matches_parses_id_and_limit() {
        let cli = Cli::try_parse_from(["dotastat", "recent-matches", "329977411", "--limit", "3"])
            .expect("valid args");

        assert_eq!(
            cli.command.to_query(),
            Ok(Query::PlayerRecentMatches(329977411))
        );
        assert_eq!(cli.command.limit(), Some(3));
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["dotastat", "heroes", "--json", "--log-level", "debug"])
            .expect("valid args");

        assert!(cli.json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.command.limit(), None);
        assert_eq!(cli.cache, CachePolicy::Use);
    }

    #[test]
    fn cache_policy_maps_to_core_mode() {
        let cli = Cli::try_parse_from(["dotastat", "hero-stats", "--cache", "refresh"])
            .expect("valid args");

        assert_eq!(CacheMode::from(cli.cache), CacheMode::Refresh);
        assert_eq!(CacheMode::from(CachePolicy::Bypass), CacheMode::Bypass);
        assert!(Cli::try_parse_from(["dotastat", "heroes", "--cache", "never"]).is_err());
    }

    #[test]
    fn blank_search_is_rejected_before_dispatch() {
        let cli = Cli::try_parse_from(["dotastat", "search", " "]).expect("valid args");

        assert_eq!(cli.command.to_query(), Err(QueryError::EmptySearch));
    }

    #[test]
    fn non_numeric_account_id_is_a_parse_error() {
        assert!(Cli::try_parse_from(["dotastat", "player", "dendi"]).is_err());
    }
}
