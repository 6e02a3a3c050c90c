pub mod schemas;
pub mod traits;

pub use traits::ToolDefinition;

use crate::types::DEFAULT_COMPONENT_TYPE;

/// Tool name to UI component tag. Anything not listed renders as
/// [`DEFAULT_COMPONENT_TYPE`].
const COMPONENT_TYPES: &[(&str, &str)] = &[
    ("present_h2h_comparison", "h2h_comparison_table"),
    ("display_standings_table", "standings_table"),
    ("show_match_schedule", "match_schedule_table"),
    ("get_player_profile", "player_profile_card"),
    ("get_team_news", "news_article_list"),
    ("display_team_stats", "team_stats"),
    ("show_match_results", "results_list"),
    ("display_live_match_feed", "live_match_feed"),
];

/// Look up the UI component tag for a tool name.
pub fn component_type_for(tool_name: &str) -> &'static str {
    COMPONENT_TYPES
        .iter()
        .find(|(name, _)| *name == tool_name)
        .map(|(_, tag)| *tag)
        .unwrap_or(DEFAULT_COMPONENT_TYPE)
}

// ---------------------------------------------------------------------------
// Tool definitions for the inference API
// ---------------------------------------------------------------------------

/// Build the structured-output tool catalog exposed to the inference model.
pub fn tool_catalog() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "present_h2h_comparison",
            "Presents a head-to-head comparison between two teams. Use this when the user asks for historical match-ups, rivalry statistics, or past results between two specific teams.",
            schemas::h2h(),
        ),
        ToolDefinition::new(
            "display_standings_table",
            "Displays a league standings table. Use this when the user asks for league tables, positions, or current rankings in a competition.",
            schemas::standings_table(),
        ),
        ToolDefinition::new(
            "show_match_schedule",
            "Shows a schedule of upcoming matches for a specific day or period. Use this when the user asks for 'what matches are on today', 'upcoming games', or a schedule for a team/league.",
            schemas::match_schedule_table(),
        ),
        ToolDefinition::new(
            "get_player_profile",
            "Retrieves detailed information about a sports player. Use this when the user asks for a player's bio, stats, team, nationality, or career details.",
            schemas::player_profile(),
        ),
        ToolDefinition::new(
            "get_team_news",
            "Fetches latest news articles for a specific sports team. Use this when the user asks for recent news, updates, or headlines about a team.",
            schemas::team_news(),
        ),
        ToolDefinition::new(
            "display_team_stats",
            "Displays comprehensive statistics for a specific sports team. Use this when the user asks for team performance, attacking/defensive stats, or general statistics for a club.",
            schemas::team_stats(),
        ),
        ToolDefinition::new(
            "show_match_results",
            "Shows a list of past match results. Use this when the user asks for recent scores, results of completed games, or a specific match outcome.",
            schemas::results_list(),
        ),
        ToolDefinition::new(
            "display_live_match_feed",
            "Provides real-time updates and key events for a live sports match. Use this when the user asks for live scores, current match status, or real-time commentary.",
            schemas::live_match_feed(),
        ),
    ]
}
