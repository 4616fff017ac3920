use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

// ============================================================================
// Metrics Module - Prometheus metrics for the cart core
// ============================================================================
//
// Provides metrics for:
// - Selection mutations and capacity rejections
// - Saved cart mutations and store failures
// - Orders placed per kind
//
// ============================================================================

pub struct Metrics {
    registry: Registry,

    // Selection Metrics
    pub selection_mutations: IntCounterVec,
    pub capacity_rejections: IntCounter,
    pub selection_quantity: IntGauge,

    // Saved Cart Metrics
    pub saved_cart_mutations: IntCounterVec,
    pub store_failures: IntCounterVec,

    // Order Metrics
    pub orders_placed: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let selection_mutations = IntCounterVec::new(
            Opts::new("cart_selection_mutations_total", "Applied selection mutations"),
            &["operation"],
        )?;
        registry.register(Box::new(selection_mutations.clone()))?;

        let capacity_rejections = IntCounter::new(
            "cart_capacity_rejections_total",
            "Selection mutations rejected by the item cap",
        )?;
        registry.register(Box::new(capacity_rejections.clone()))?;

        let selection_quantity = IntGauge::new(
            "cart_selection_quantity",
            "Summed quantity of the current selection",
        )?;
        registry.register(Box::new(selection_quantity.clone()))?;

        let saved_cart_mutations = IntCounterVec::new(
            Opts::new("cart_saved_mutations_total", "Saved cart mutations"),
            &["operation"],
        )?;
        registry.register(Box::new(saved_cart_mutations.clone()))?;

        let store_failures = IntCounterVec::new(
            Opts::new("cart_store_failures_total", "Failed durable store operations"),
            &["operation"],
        )?;
        registry.register(Box::new(store_failures.clone()))?;

        let orders_placed = IntCounterVec::new(
            Opts::new("cart_orders_placed_total", "Orders submitted from the saved cart"),
            &["kind"],
        )?;
        registry.register(Box::new(orders_placed.clone()))?;

        Ok(Self {
            registry,
            selection_mutations,
            capacity_rejections,
            selection_quantity,
            saved_cart_mutations,
            store_failures,
            orders_placed,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_selection_mutation(&self, operation: &str, total_quantity: u32) {
        self.selection_mutations.with_label_values(&[operation]).inc();
        self.selection_quantity.set(i64::from(total_quantity));
    }

    pub fn record_capacity_rejection(&self) {
        self.capacity_rejections.inc();
    }

    pub fn record_saved_mutation(&self, operation: &str) {
        self.saved_cart_mutations.with_label_values(&[operation]).inc();
    }

    pub fn record_store_failure(&self, operation: &str) {
        self.store_failures.with_label_values(&[operation]).inc();
    }

    pub fn record_order_placed(&self, kind: &str) {
        self.orders_placed.with_label_values(&[kind]).inc();
    }

    /// Text exposition format of every registered metric
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert!(!metrics.registry.gather().is_empty());
    }

    #[test]
    fn test_record_selection_mutation() {
        let metrics = Metrics::new().unwrap();
        metrics.record_selection_mutation("add", 1);
        metrics.record_selection_mutation("increment", 2);

        let gathered = metrics.registry.gather();
        let mutations = gathered.iter().find(|m| m.name() == "cart_selection_mutations_total").unwrap();
        assert_eq!(mutations.metric.len(), 2);

        let quantity = gathered.iter().find(|m| m.name() == "cart_selection_quantity").unwrap();
        assert_eq!(quantity.metric[0].gauge.value, Some(2.0));
    }

    #[test]
    fn test_record_capacity_rejection() {
        let metrics = Metrics::new().unwrap();
        metrics.record_capacity_rejection();
        metrics.record_capacity_rejection();

        let gathered = metrics.registry.gather();
        let rejections = gathered.iter().find(|m| m.name() == "cart_capacity_rejections_total").unwrap();
        assert_eq!(rejections.metric[0].counter.value, Some(2.0));
    }

    #[test]
    fn test_render_contains_metric_names() {
        let metrics = Metrics::new().unwrap();
        metrics.record_order_placed("Instant");
        metrics.record_store_failure("upsert");

        let text = metrics.render().unwrap();
        assert!(text.contains("cart_orders_placed_total"));
        assert!(text.contains("cart_store_failures_total"));
    }
}
