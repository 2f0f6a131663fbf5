//! Similarity query metrics.

use metrics::{counter, histogram};

pub struct QueryMetrics;

impl QueryMetrics {
    /// Record one similarity query.
    ///
    /// `kind` is one of `by_id`, `by_id_list`, `by_text`.
    pub fn record_query(kind: &str, success: bool, hits: usize, duration_secs: f64) {
        let outcome = if success { "success" } else { "failure" };

        counter!(
            "similarity_queries_total",
            "kind" => kind.to_string(),
            "outcome" => outcome
        )
        .increment(1);

        histogram!("similarity_query_duration_seconds", "kind" => kind.to_string())
            .record(duration_secs);

        if success {
            histogram!("similarity_query_hits", "kind" => kind.to_string()).record(hits as f64);
        }
    }
}
