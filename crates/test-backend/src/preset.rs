use news_nest_model::{ArticleCard, ChartData, ChatResponse, Scoreboard, TimelineData};

/// A canned reply for one exchange.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PresetReply {
    /// Display name of the answering persona.
    pub agent: String,
    /// The response text.
    pub response: String,
    /// Optional routing notice.
    pub routing_message: Option<String>,
    /// Persona the request was routed away from.
    pub routed_from: Option<String>,
    /// Article-reference flag.
    pub has_article_reference: bool,
    /// Inline article cards.
    pub articles: Option<Vec<ArticleCard>>,
    /// Inline chart.
    pub chart: Option<ChartData>,
    /// Inline timeline.
    pub timeline: Option<TimelineData>,
    /// Inline scoreboard.
    pub scoreboard: Option<Scoreboard>,
}

impl PresetReply {
    /// Creates a text-only reply.
    #[inline]
    pub fn text(agent: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            response: response.into(),
            ..Default::default()
        }
    }

    /// Attaches a routing notice.
    #[inline]
    pub fn with_routing(
        mut self,
        message: impl Into<String>,
        routed_from: impl Into<String>,
    ) -> Self {
        self.routing_message = Some(message.into());
        self.routed_from = Some(routed_from.into());
        self
    }

    /// Attaches article cards.
    #[inline]
    pub fn with_articles(mut self, articles: Vec<ArticleCard>) -> Self {
        self.has_article_reference = true;
        self.articles = Some(articles);
        self
    }

    /// Attaches a chart.
    #[inline]
    pub fn with_chart(mut self, chart: ChartData) -> Self {
        self.chart = Some(chart);
        self
    }

    /// Attaches a timeline.
    #[inline]
    pub fn with_timeline(mut self, timeline: TimelineData) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Attaches a scoreboard.
    #[inline]
    pub fn with_scoreboard(mut self, scoreboard: Scoreboard) -> Self {
        self.scoreboard = Some(scoreboard);
        self
    }
}

impl From<PresetReply> for ChatResponse {
    fn from(reply: PresetReply) -> Self {
        ChatResponse {
            agent: reply.agent,
            response: reply.response,
            routing_message: reply.routing_message,
            routed_from: reply.routed_from,
            has_article_reference: reply.has_article_reference,
            articles: reply.articles,
            chart: reply.chart,
            timeline: reply.timeline,
            scoreboard: reply.scoreboard,
        }
    }
}
