//! Aggregation of per-article sentiment into forecast weights.

use crate::{NewsArticle, SentimentLabel, SentimentWeights};

/// Collapse a set of articles into label proportions and a mean FinBERT score.
///
/// Proportions come from each article's label; the overall score averages
/// `finbert_score`. With no articles the neutral prior is returned so the
/// forecast still receives a well-formed payload.
pub fn calculate_sentiment_weights(articles: &[NewsArticle]) -> SentimentWeights {
    if articles.is_empty() {
        return SentimentWeights::neutral_prior();
    }

    let (mut positive, mut negative, mut neutral) = (0_usize, 0_usize, 0_usize);
    let mut finbert_total = 0.0_f64;
    for article in articles {
        match article.sentiment {
            SentimentLabel::Positive => positive += 1,
            SentimentLabel::Negative => negative += 1,
            SentimentLabel::Neutral => neutral += 1,
        }
        finbert_total += article.finbert_score;
    }

    let total = articles.len() as f64;
    SentimentWeights {
        positive: positive as f64 / total,
        negative: negative as f64 / total,
        neutral: neutral as f64 / total,
        overall_sentiment: finbert_total / total,
    }
}
