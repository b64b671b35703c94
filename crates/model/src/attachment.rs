//! Structured payloads that a response can attach to a bubble.
//!
//! The shapes mirror what the backend produces: charts and timelines are
//! LLM-generated structured data, scoreboards are normalized TheSportsDB
//! events. Fields the backend may omit are optional rather than rejected,
//! since a malformed or partial payload must never break hydration.

use serde::{Deserialize, Serialize};

/// A reference card for one underlying news article.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCard {
    /// Headline of the article.
    pub headline: String,
    /// Publisher display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    /// Link to the article.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Topic tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Chart data generated for a visualization request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Chart title.
    pub title: String,
    /// One of `line`, `bar`, `pie`, `area`. Kept as a string so unknown
    /// future kinds survive a round trip. The backend sends this under
    /// the key `type`; the `chart_type` alias keeps older persisted
    /// sessions readable.
    #[serde(
        rename = "type",
        alias = "chart_type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub chart_type: Option<String>,
    /// X-axis label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis_label: Option<String>,
    /// Y-axis label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_label: Option<String>,
    /// Short description of what the chart shows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The plotted points, in order.
    #[serde(default)]
    pub data_points: Vec<ChartPoint>,
}

/// One plotted point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Category or series label.
    pub label: String,
    /// Numeric value.
    pub value: f64,
    /// ISO date for time-series charts, absent for categorical ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Timeline data generated for a visualization request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineData {
    /// Timeline title.
    pub title: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Events in chronological order.
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

/// One event on a timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// When the event happened (display string, usually an ISO date).
    pub date: String,
    /// Event title.
    pub title: String,
    /// Optional detail text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A set of games to render as a scoreboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Optional heading (league or day description).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The games, in the order the backend returned them.
    #[serde(default)]
    pub games: Vec<SportsGame>,
}

/// One normalized game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportsGame {
    /// Backend event id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Sport name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    /// League display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_name: Option<String>,
    /// Event date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `past`, `live`, or `upcoming`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Venue display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    /// Home side.
    pub home_team: GameTeam,
    /// Away side.
    pub away_team: GameTeam,
    /// Home score, absent for upcoming games.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<i64>,
    /// Away score, absent for upcoming games.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<i64>,
}

/// One side of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTeam {
    /// Team display name.
    pub name: String,
    /// Abbreviated name for narrow layouts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// Badge image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_round_trips_unknown_type() {
        let json = r#"{"title":"EV adoption","type":"scatter","data_points":[{"label":"2020","value":4.2}]}"#;
        let chart: ChartData = serde_json::from_str(json).unwrap();
        assert_eq!(chart.chart_type.as_deref(), Some("scatter"));
        let back = serde_json::to_string(&chart).unwrap();
        assert!(back.contains(r#""type":"scatter""#));
        let again: ChartData = serde_json::from_str(&back).unwrap();
        assert_eq!(chart, again);
    }

    #[test]
    fn test_chart_type_accepts_legacy_key() {
        let json = r#"{"title":"EV adoption","chart_type":"bar"}"#;
        let chart: ChartData = serde_json::from_str(json).unwrap();
        assert_eq!(chart.chart_type.as_deref(), Some("bar"));
    }

    #[test]
    fn test_game_uses_camel_case() {
        let json = r#"{"homeTeam":{"name":"Hawks"},"awayTeam":{"name":"Owls"},"homeScore":3,"awayScore":1,"status":"past"}"#;
        let game: SportsGame = serde_json::from_str(json).unwrap();
        assert_eq!(game.home_team.name, "Hawks");
        assert_eq!(game.away_score, Some(1));
    }
}
