use news_nest_model::{
    ArticleCard, ChartData, ChartPoint, GameTeam, HistoryTurn, Message, MessageKind, Role,
    Scoreboard, SportsGame, TimelineData, TimelineEvent,
};

use super::{decode_history, encode_history};

fn sample_chart() -> ChartData {
    ChartData {
        title: "EV adoption".to_owned(),
        chart_type: Some("line".to_owned()),
        x_axis_label: Some("Year".to_owned()),
        y_axis_label: Some("Percentage".to_owned()),
        description: Some("Share of new cars that are electric".to_owned()),
        data_points: vec![
            ChartPoint {
                label: "2020".to_owned(),
                value: 4.2,
                timestamp: Some("2020-01-01".to_owned()),
            },
            ChartPoint {
                label: "2021".to_owned(),
                value: 8.6,
                timestamp: Some("2021-01-01".to_owned()),
            },
        ],
    }
}

#[test]
fn test_agent_turn_gets_name_suffix() {
    let msg = Message::agent("Scores are in.", Some("Flynn the Falcon".to_owned()));
    let turns = encode_history(&[msg]);
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, Role::Model);
    assert_eq!(turns[0].parts, vec!["Scores are in. [Agent: Flynn the Falcon]"]);
}

#[test]
fn test_welcome_routing_and_system_skipped() {
    let messages = vec![
        Message::welcome("Good morning!", Some("Polly the Parrot".to_owned())),
        Message::user("hi"),
        {
            let mut msg = Message::agent("Routing you over.", Some("Polly the Parrot".to_owned()));
            msg.is_routing = true;
            msg
        },
        Message::agent("Here you go.", Some("Flynn the Falcon".to_owned())),
        Message::system("Something went wrong. Please try again."),
    ];
    let turns = encode_history(&messages);
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0], HistoryTurn::user("hi"));
    assert_eq!(turns[1].parts, vec!["Here you go. [Agent: Flynn the Falcon]"]);
}

#[test]
fn test_consecutive_agent_bubbles_collapse() {
    let name = Some("Pixel the Pigeon".to_owned());
    let messages = vec![
        Message::user("what's new in tech?"),
        Message::agent("Chips got faster.", name.clone()),
        Message::agent("Batteries got better.", name.clone()),
    ];
    let turns = encode_history(&messages);
    assert_eq!(turns.len(), 2);
    assert_eq!(
        turns[1].parts,
        vec!["Chips got faster. Batteries got better. [Agent: Pixel the Pigeon]"]
    );
}

#[test]
fn test_attachments_only_from_first_bubble() {
    let name = Some("Polly the Parrot".to_owned());
    let mut first = Message::agent("Top story today.", name.clone());
    first.chart = Some(sample_chart());
    let messages = vec![
        Message::user("show me a chart"),
        first,
        Message::agent("More detail follows.", name),
    ];
    let turns = encode_history(&messages);
    let text = turns[1].text();
    assert_eq!(text.matches("[CHART]").count(), 1);
    // The chart block follows the joined bubble texts.
    let chart_pos = text.find("[CHART]").unwrap();
    assert!(chart_pos > text.find("More detail").unwrap());
    assert!(text.ends_with("[Agent: Polly the Parrot]"));
}

#[test]
fn test_round_trip_articles_with_multiple_bubbles() {
    let name = Some("Polly the Parrot".to_owned());
    let mut first = Message::agent("Top story today.", name.clone());
    first.article_cards = Some(vec![ArticleCard {
        headline: "Big Win".to_owned(),
        source_name: Some("Daily Times".to_owned()),
        url: Some("https://example.com/a".to_owned()),
        tags: None,
    }]);
    let original = vec![
        Message::user("what's the top story?"),
        first,
        Message::agent("More detail follows.", name),
    ];

    let decoded = decode_history(&encode_history(&original));

    let rejoined = decoded
        .iter()
        .filter(|m| m.kind == MessageKind::Agent)
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(rejoined, "Top story today. More detail follows.");

    let first_agent = decoded
        .iter()
        .find(|m| m.kind == MessageKind::Agent)
        .unwrap();
    let cards = first_agent.article_cards.as_ref().unwrap();
    assert_eq!(cards[0].source_name.as_deref(), Some("Daily Times"));
    assert_eq!(cards[0].url.as_deref(), Some("https://example.com/a"));
}

#[test]
fn test_decode_articles_example() {
    let turn = HistoryTurn::model(
        "Top story today. [ARTICLES]\n1. Big Win — Daily Times (https://example.com/a) [Agent: Polly the Parrot]",
    );
    let messages = decode_history(&[turn]);
    assert!(!messages.is_empty());
    let first = &messages[0];
    assert_eq!(first.kind, MessageKind::Agent);
    assert_eq!(first.agent_name.as_deref(), Some("Polly the Parrot"));
    let cards = first.article_cards.as_ref().unwrap();
    assert_eq!(
        cards[0],
        ArticleCard {
            headline: "Big Win".to_owned(),
            source_name: Some("Daily Times".to_owned()),
            url: Some("https://example.com/a".to_owned()),
            tags: None,
        }
    );
    for msg in &messages {
        assert!(!msg.text.contains("[ARTICLES]"));
        assert!(!msg.text.contains("[Agent:"));
    }
}

#[test]
fn test_round_trip_preserves_chart_and_text() {
    let mut agent = Message::agent(
        "Electric cars keep gaining ground. Adoption doubled in a year.",
        Some("Pixel the Pigeon".to_owned()),
    );
    agent.chart = Some(sample_chart());
    let original = vec![Message::user("chart of EV adoption?"), agent];

    let decoded = decode_history(&encode_history(&original));

    assert_eq!(decoded[0].kind, MessageKind::User);
    assert_eq!(decoded[0].text, "chart of EV adoption?");

    let agent_bubbles: Vec<_> = decoded
        .iter()
        .filter(|m| m.kind == MessageKind::Agent)
        .collect();
    let rejoined = agent_bubbles
        .iter()
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(
        rejoined,
        "Electric cars keep gaining ground. Adoption doubled in a year."
    );
    assert_eq!(agent_bubbles[0].chart.as_ref(), Some(&sample_chart()));
    assert!(agent_bubbles.iter().skip(1).all(|m| m.chart.is_none()));
    assert!(
        agent_bubbles
            .iter()
            .all(|m| m.agent_name.as_deref() == Some("Pixel the Pigeon"))
    );
}

#[test]
fn test_round_trip_all_attachment_kinds() {
    let mut agent = Message::agent(
        "Busy news day. Here is everything at a glance.",
        Some("Flynn the Falcon".to_owned()),
    );
    agent.chart = Some(sample_chart());
    agent.timeline = Some(TimelineData {
        title: "Season recap".to_owned(),
        description: None,
        events: vec![TimelineEvent {
            date: "2026-05-01".to_owned(),
            title: "Playoffs begin".to_owned(),
            description: Some("Sixteen teams enter.".to_owned()),
        }],
    });
    agent.scoreboard = Some(Scoreboard {
        title: Some("Last night".to_owned()),
        games: vec![SportsGame {
            id: Some("901".to_owned()),
            sport: Some("Basketball".to_owned()),
            league_name: Some("NBA".to_owned()),
            date: Some("2026-08-26".to_owned()),
            status: Some("past".to_owned()),
            venue_name: None,
            home_team: GameTeam {
                name: "Hawks".to_owned(),
                short_name: Some("HAW".to_owned()),
                badge_url: None,
            },
            away_team: GameTeam {
                name: "Owls".to_owned(),
                short_name: None,
                badge_url: None,
            },
            home_score: Some(104),
            away_score: Some(99),
        }],
    });
    agent.article_cards = Some(vec![ArticleCard {
        headline: "Hawks clinch".to_owned(),
        source_name: Some("Sports Desk".to_owned()),
        url: Some("https://example.com/hawks".to_owned()),
        tags: Some(vec!["nba".to_owned(), "playoffs".to_owned()]),
    }]);

    let original = vec![Message::user("full rundown please"), agent.clone()];
    let decoded = decode_history(&encode_history(&original));

    let first_agent = decoded
        .iter()
        .find(|m| m.kind == MessageKind::Agent)
        .unwrap();
    assert_eq!(first_agent.chart, agent.chart);
    assert_eq!(first_agent.timeline, agent.timeline);
    assert_eq!(first_agent.scoreboard, agent.scoreboard);
    assert_eq!(first_agent.article_cards, agent.article_cards);
    assert!(first_agent.has_article_reference);
    for msg in &decoded {
        assert!(!msg.text.contains('['), "visible text leaked a tag: {}", msg.text);
    }
}

#[test]
fn test_malformed_chart_dropped_text_preserved() {
    let turn = HistoryTurn::model(
        "The story stands on its own.\n\n[CHART]\n{\"title\": unquoted} trailing words [Agent: Polly the Parrot]",
    );
    let messages = decode_history(&[turn]);
    assert!(messages.iter().all(|m| m.chart.is_none()));
    let rejoined = messages
        .iter()
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    assert!(rejoined.contains("The story stands on its own."));
    assert!(!rejoined.contains("[CHART]"));
}

#[test]
fn test_agent_name_carried_across_turns() {
    let turns = vec![
        HistoryTurn::user("hi"),
        HistoryTurn::model("Hello there! [Agent: Cato the Crane]"),
        HistoryTurn::user("and then?"),
        HistoryTurn::model("More civics news."),
    ];
    let messages = decode_history(&turns);
    let last = messages.last().unwrap();
    assert_eq!(last.agent_name.as_deref(), Some("Cato the Crane"));
}

#[test]
fn test_decode_rechunks_paragraphs() {
    let turn = HistoryTurn::model(
        "Headline one happened. Here's why it matters.\n\nIn other news, headline two happened too. [Agent: Polly the Parrot]",
    );
    let messages = decode_history(&[turn]);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "Headline one happened. Here's why it matters.");
    assert_eq!(messages[1].text, "In other news, headline two happened too.");
}
