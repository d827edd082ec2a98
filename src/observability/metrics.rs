use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub ranking_runs_total: IntCounterVec,
    pub ranking_latency_seconds: HistogramVec,
    pub ranked_requests_total: IntCounter,
    pub unresolved_weights_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let ranking_runs_total = IntCounterVec::new(
            Opts::new("ranking_runs_total", "Ranking runs by weight policy and outcome"),
            &["policy", "outcome"],
        )
        .expect("valid ranking_runs_total metric");

        let ranking_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "ranking_latency_seconds",
                "Time spent scoring and sorting requests in seconds",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
            &["policy"],
        )
        .expect("valid ranking_latency_seconds metric");

        let ranked_requests_total = IntCounter::new(
            "ranked_requests_total",
            "Total requests scored across all ranking runs",
        )
        .expect("valid ranked_requests_total metric");

        let unresolved_weights_total = IntCounterVec::new(
            Opts::new(
                "unresolved_weights_total",
                "Requests scored with weight 0 because their classification did not resolve",
            ),
            &["policy"],
        )
        .expect("valid unresolved_weights_total metric");

        registry
            .register(Box::new(ranking_runs_total.clone()))
            .expect("register ranking_runs_total");
        registry
            .register(Box::new(ranking_latency_seconds.clone()))
            .expect("register ranking_latency_seconds");
        registry
            .register(Box::new(ranked_requests_total.clone()))
            .expect("register ranked_requests_total");
        registry
            .register(Box::new(unresolved_weights_total.clone()))
            .expect("register unresolved_weights_total");

        Self {
            registry,
            ranking_runs_total,
            ranking_latency_seconds,
            ranked_requests_total,
            unresolved_weights_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
