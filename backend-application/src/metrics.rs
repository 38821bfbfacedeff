use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    tickets_issued: AtomicU64,
    issuance_rejections: AtomicU64,
    check_ins: AtomicU64,
    check_in_conflicts: AtomicU64,
    webhooks_received: AtomicU64,
    webhooks_applied: AtomicU64,
    webhook_replays: AtomicU64,
    webhook_rejections: AtomicU64,
    withdrawals_initiated: AtomicU64,
    withdrawal_failures: AtomicU64,
}

impl Metrics {
    pub fn record_tickets_issued(&self, count: usize) {
        self.tickets_issued.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_issuance_rejection(&self) {
        self.issuance_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_check_in(&self) {
        self.check_ins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_check_in_conflict(&self) {
        self.check_in_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_webhook_received(&self) {
        self.webhooks_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_webhook_applied(&self) {
        self.webhooks_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_webhook_replay(&self) {
        self.webhook_replays.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_webhook_rejection(&self) {
        self.webhook_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_withdrawal_initiated(&self) {
        self.withdrawals_initiated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_withdrawal_failure(&self) {
        self.withdrawal_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        for (name, value) in [
            ("stagepass_tickets_issued_total", &self.tickets_issued),
            ("stagepass_issuance_rejections_total", &self.issuance_rejections),
            ("stagepass_check_ins_total", &self.check_ins),
            ("stagepass_check_in_conflicts_total", &self.check_in_conflicts),
            ("stagepass_webhooks_received_total", &self.webhooks_received),
            ("stagepass_webhooks_applied_total", &self.webhooks_applied),
            ("stagepass_webhook_replays_total", &self.webhook_replays),
            ("stagepass_webhook_rejections_total", &self.webhook_rejections),
            ("stagepass_withdrawals_initiated_total", &self.withdrawals_initiated),
            ("stagepass_withdrawal_failures_total", &self.withdrawal_failures),
        ] {
            out.push_str(&format!(
                "# TYPE {name} counter\n{name} {}\n",
                value.load(Ordering::Relaxed)
            ));
        }
        out
    }
}
