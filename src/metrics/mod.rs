//! Per-client prometheus counters.
//!
//! Each [`ClientMetrics`] owns its own [`Registry`]. Nothing is registered in the
//! process-wide default registry, so independent clients never share counters.
//! A client and the CAS-enabled siblings derived from it share one instance.


use prometheus::core::Collector;
use prometheus::Encoder;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::warn;

const METRICS_PREFIX: &str = "dcache";

pub(crate) const OUTCOME_OK: &str = "ok";

pub struct ClientMetrics {
    enabled: bool,
    registry: Registry,
    operations: IntCounterVec,
    cas_tokens_attached: IntCounter,
    cas_tokens_recorded: IntCounter,
}

impl ClientMetrics {
    pub fn new(enabled: bool) -> Self {
        let registry = Registry::new_custom(Some(METRICS_PREFIX.to_string()), None)
            .expect("metrics registry can be created");

        let operations = IntCounterVec::new(
            Opts::new("operations_total", "Cache operations by kind and outcome"),
            &["op", "outcome"],
        )
        .expect("metric can not be created");
        let cas_tokens_attached = IntCounter::new(
            "cas_tokens_attached_total",
            "Set operations sent with a CAS token",
        )
        .expect("metric can not be created");
        let cas_tokens_recorded = IntCounter::new(
            "cas_tokens_recorded_total",
            "CAS tokens recorded from read responses",
        )
        .expect("metric can not be created");

        registry
            .register(Box::new(operations.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(cas_tokens_attached.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(cas_tokens_recorded.clone()))
            .expect("collector can be registered");

        Self {
            enabled,
            registry,
            operations,
            cas_tokens_attached,
            cas_tokens_recorded,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn observe(
        &self,
        op: &'static str,
        outcome: &'static str,
    ) {
        if self.enabled {
            self.operations.with_label_values(&[op, outcome]).inc();
        }
    }

    pub(crate) fn cas_token_attached(&self) {
        if self.enabled {
            self.cas_tokens_attached.inc();
        }
    }

    pub(crate) fn cas_token_recorded(&self) {
        if self.enabled {
            self.cas_tokens_recorded.inc();
        }
    }

    pub fn operation_count(
        &self,
        op: &str,
        outcome: &str,
    ) -> u64 {
        // Looks up collected samples only, never creates a series
        self.operations
            .collect()
            .iter()
            .flat_map(|family| family.get_metric())
            .find(|metric| {
                let labels = metric.get_label();
                labels.len() == 2
                    && labels.iter().any(|l| l.get_name() == "op" && l.get_value() == op)
                    && labels
                        .iter()
                        .any(|l| l.get_name() == "outcome" && l.get_value() == outcome)
            })
            .map_or(0, |metric| metric.get_counter().get_value() as u64)
    }

    pub fn cas_tokens_attached(&self) -> u64 {
        self.cas_tokens_attached.get()
    }

    pub fn cas_tokens_recorded(&self) -> u64 {
        self.cas_tokens_recorded.get()
    }

    /// Render all counters in the prometheus text exposition format
    pub fn encode_text(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            warn!("could not encode client metrics: {}", e);
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl std::fmt::Debug for ClientMetrics {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ClientMetrics").field("enabled", &self.enabled).finish()
    }
}
