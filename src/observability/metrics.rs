use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub notifications_total: IntCounterVec,
    pub order_status_updates_total: IntCounterVec,
    pub vendor_approval_steps_total: IntCounterVec,
    pub wallet_adjustments_total: IntCounterVec,
    pub ws_clients: IntGauge,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let notifications_total = IntCounterVec::new(
            Opts::new(
                "notifications_total",
                "Notification side effects by channel and outcome",
            ),
            &["channel", "outcome"],
        )
        .expect("valid notifications_total metric");

        let order_status_updates_total = IntCounterVec::new(
            Opts::new(
                "order_status_updates_total",
                "Order status updates by target status",
            ),
            &["status"],
        )
        .expect("valid order_status_updates_total metric");

        let vendor_approval_steps_total = IntCounterVec::new(
            Opts::new(
                "vendor_approval_steps_total",
                "Vendor approval workflow steps by outcome",
            ),
            &["step", "outcome"],
        )
        .expect("valid vendor_approval_steps_total metric");

        let wallet_adjustments_total = IntCounterVec::new(
            Opts::new("wallet_adjustments_total", "Wallet adjustments by direction"),
            &["direction"],
        )
        .expect("valid wallet_adjustments_total metric");

        let ws_clients = IntGauge::new("ws_clients", "Connected notification websocket clients")
            .expect("valid ws_clients metric");

        registry
            .register(Box::new(notifications_total.clone()))
            .expect("register notifications_total");
        registry
            .register(Box::new(order_status_updates_total.clone()))
            .expect("register order_status_updates_total");
        registry
            .register(Box::new(vendor_approval_steps_total.clone()))
            .expect("register vendor_approval_steps_total");
        registry
            .register(Box::new(wallet_adjustments_total.clone()))
            .expect("register wallet_adjustments_total");
        registry
            .register(Box::new(ws_clients.clone()))
            .expect("register ws_clients");

        Self {
            registry,
            notifications_total,
            order_status_updates_total,
            vendor_approval_steps_total,
            wallet_adjustments_total,
            ws_clients,
        }
    }

    pub fn record_notification(&self, channel: &str, outcome: &str) {
        self.notifications_total
            .with_label_values(&[channel, outcome])
            .inc();
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
