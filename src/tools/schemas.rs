//! JSON-Schema parameter descriptors for each structured-output kind.
//!
//! Client UIs bind directly to these field names, so names, `required` sets
//! and nullability must not drift.

use serde_json::{json, Value};

/// Head-to-head comparison between two teams.
pub fn h2h() -> Value {
    let team = json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "wins": {"type": ["integer", "null"]},
            "draws": {"type": ["integer", "null"]},
            "losses": {"type": ["integer", "null"]},
            "goals_for": {"type": ["integer", "null"]},
            "goals_against": {"type": ["integer", "null"]}
        },
        "required": ["name"]
    });

    json!({
        "type": "object",
        "title": "H2HData",
        "description": "Data for head-to-head comparisons.",
        "properties": {
            "h2h_summary": {
                "type": "object",
                "properties": {
                    "team1": team.clone(),
                    "team2": team,
                    "total_matches": {"type": ["integer", "null"]}
                },
                "required": ["team1", "team2"]
            },
            "recent_meetings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "date": {"type": "string", "format": "date"},
                        "score": {"type": "string"},
                        "competition": {"type": "string"}
                    },
                    "required": ["date", "score"]
                }
            }
        },
        "required": ["h2h_summary"]
    })
}

/// Table of upcoming matches.
pub fn match_schedule_table() -> Value {
    json!({
        "type": "object",
        "title": "MatchScheduleTableData",
        "description": "Data for a table of upcoming matches.",
        "properties": {
            "title": {"type": "string"},
            "headers": {"type": "array", "items": {"type": "string"}},
            "rows": {"type": "array", "items": {"type": "array", "items": {"type": "string"}}},
            "sort_info": {"type": ["string", "null"]}
        },
        "required": ["headers", "rows"]
    })
}

/// League standings table.
pub fn standings_table() -> Value {
    json!({
        "type": "object",
        "title": "StandingsTableData",
        "description": "Data for a league standings table.",
        "properties": {
            "league_name": {"type": "string"},
            "season": {"type": ["string", "null"]},
            "standings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "rank": {"type": ["integer", "string"]},
                        "team_name": {"type": "string"},
                        "logo_url": {"type": ["string", "null"], "format": "uri"},
                        "played": {"type": "integer"},
                        "wins": {"type": "integer"},
                        "draws": {"type": "integer"},
                        "losses": {"type": "integer"},
                        "goals_for": {"type": "integer"},
                        "goals_against": {"type": "integer"},
                        "goal_difference": {"type": "integer"},
                        "points": {"type": "integer"},
                        "form": {"type": ["string", "null"]}
                    },
                    "required": ["rank", "team_name", "played", "points"]
                }
            }
        },
        "required": ["league_name", "standings"]
    })
}

/// Player biography and career summary.
pub fn player_profile() -> Value {
    json!({
        "type": "object",
        "title": "PlayerProfileData",
        "description": "Detailed profile information for a specific player.",
        "properties": {
            "full_name": {"type": "string"},
            "common_name": {"type": ["string", "null"]},
            "nationality": {"type": "string"},
            "date_of_birth": {"type": "string", "format": "date"},
            "age": {"type": "integer"},
            "primary_position": {"type": "string"},
            "secondary_positions": {"type": "array", "items": {"type": "string"}},
            "current_club_name": {"type": ["string", "null"]},
            "jersey_number": {"type": ["integer", "string", "null"]},
            "height_cm": {"type": ["integer", "null"]},
            "weight_kg": {"type": ["integer", "null"]},
            "preferred_foot": {"type": ["string", "null"], "enum": [null, "Right", "Left", "Both"]},
            "career_summary_stats": {
                "type": "object",
                "properties": {
                    "appearances": {"type": ["integer", "null"]},
                    "goals": {"type": ["integer", "null"]},
                    "assists": {"type": ["integer", "null"]}
                }
            },
            "market_value": {"type": ["string", "null"]}
        },
        "required": ["full_name", "nationality", "date_of_birth", "primary_position"]
    })
}

/// Latest news for a team.
pub fn team_news() -> Value {
    json!({
        "type": "object",
        "title": "TeamNewsData",
        "description": "Latest news articles or summaries for a specific team.",
        "properties": {
            "team_name": {"type": "string"},
            "news_articles": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {"type": "string"},
                        "source_name": {"type": ["string", "null"]},
                        "published_date": {"type": ["string", "null"], "format": "date-time"},
                        "url": {"type": ["string", "null"], "format": "uri"},
                        "summary": {"type": "string"}
                    },
                    "required": ["title", "summary"]
                }
            }
        },
        "required": ["team_name", "news_articles"]
    })
}

/// Sectioned team statistics.
pub fn team_stats() -> Value {
    json!({
        "type": "object",
        "title": "TeamStatsData",
        "description": "Comprehensive statistics for a specific sports team, possibly broken into sections (e.g., offense, defense).",
        "properties": {
            "title": {
                "type": "string",
                "description": "A descriptive title for the statistics, e.g., 'Manchester United 2023-2024 Season Stats'."
            },
            "stats_type": {
                "type": "string",
                "description": "The type of statistics, e.g., 'overall', 'home', 'away', 'attack', 'defense'."
            },
            "narrative_summary": {
                "type": ["string", "null"],
                "description": "A brief narrative summary or overview of the team's performance based on the stats."
            },
            "sections": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "section_title": {
                            "type": "string",
                            "description": "Title of the statistical section (e.g., 'General Stats', 'Attacking', 'Defensive')."
                        },
                        "key_value_pairs": {
                            "type": "object",
                            "description": "Key-value pairs of statistics (e.g., {'Matches Played': 38, 'Goals Scored': 75}).",
                            "additionalProperties": {"type": ["string", "number", "boolean", "null"]}
                        }
                    },
                    "required": ["section_title", "key_value_pairs"]
                }
            },
            "disclaimer": {
                "type": ["string", "null"],
                "description": "Any relevant disclaimers about the data accuracy or source."
            }
        },
        "required": ["title", "stats_type"]
    })
}

/// Completed match results.
pub fn results_list() -> Value {
    let score_pair = json!({
        "home": {"type": "integer"},
        "away": {"type": "integer"}
    });

    json!({
        "type": "object",
        "title": "MatchResultsList",
        "description": "A list of past match results.",
        "properties": {
            "title": {
                "type": "string",
                "description": "A title for the results list, e.g., 'Recent Premier League Results'."
            },
            "matches": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "date": {"type": "string", "format": "date", "description": "Date of the match."},
                        "time": {"type": ["string", "null"], "description": "Time of the match (e.g., '15:00')."},
                        "home_team_name": {"type": "string"},
                        "away_team_name": {"type": "string"},
                        "score": {
                            "type": "object",
                            "properties": {
                                "fulltime": {"type": "object", "properties": score_pair.clone()},
                                "halftime": {"type": ["object", "null"], "properties": score_pair}
                            },
                            "description": "Scores at fulltime and optionally halftime."
                        },
                        "competition": {"type": ["string", "null"], "description": "The league or competition."},
                        "round": {"type": ["string", "null"], "description": "The match round (e.g., 'Matchday 1')."},
                        "status": {"type": "string", "description": "Match status (e.g., 'Finished')."}
                    },
                    "required": ["date", "home_team_name", "away_team_name", "score", "status"]
                }
            }
        },
        "required": ["matches"]
    })
}

/// Real-time feed for a live match.
pub fn live_match_feed() -> Value {
    json!({
        "type": "object",
        "title": "LiveMatchFeedData",
        "description": "Real-time updates for a live sports match.",
        "properties": {
            "match_id": {"type": "string", "description": "Unique identifier for the match."},
            "home_team_name": {"type": "string"},
            "away_team_name": {"type": "string"},
            "home_team_score": {"type": "integer"},
            "away_team_score": {"type": "integer"},
            "current_minute": {"type": ["integer", "null"], "description": "Current minute of the match."},
            "status_description": {"type": "string", "description": "e.g., 'Half Time', 'Live', 'Full Time'."},
            "competition": {"type": ["string", "null"]},
            "venue": {"type": ["string", "null"]},
            "key_events": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "minute": {"type": "integer"},
                        "type": {"type": "string", "enum": ["goal", "yellow card", "red card", "substitution", "penalty"]},
                        "player_name": {"type": "string"},
                        "team_name": {"type": "string"},
                        "detail": {"type": ["string", "null"], "description": "e.g., 'Penalty Goal', 'Own Goal'."}
                    },
                    "required": ["minute", "type", "player_name", "team_name"]
                },
                "description": "Chronological list of key events."
            },
            "live_stats": {
                "type": "object",
                "description": "Key live statistics (e.g., 'Possession', 'Shots on Target').",
                "additionalProperties": {"type": ["string", "number", "null"]}
            },
            "narrative_updates": {
                "type": "array",
                "items": {"type": "string"},
                "description": "Short textual updates about the match flow."
            }
        },
        "required": [
            "match_id",
            "home_team_name",
            "away_team_name",
            "home_team_score",
            "away_team_score",
            "status_description"
        ]
    })
}
