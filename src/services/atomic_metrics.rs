use std::sync::atomic::{AtomicU64, Ordering};

pub struct AtomicMetrics {
    simulations: AtomicU64,
    rejected: AtomicU64,
    rate_fetch_ok: AtomicU64,
    rate_fetch_failed: AtomicU64,
    fallback_used: AtomicU64,
}

impl AtomicMetrics {
    pub fn new() -> Self {
        Self {
            simulations: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            rate_fetch_ok: AtomicU64::new(0),
            rate_fetch_failed: AtomicU64::new(0),
            fallback_used: AtomicU64::new(0),
        }
    }

    pub fn increment_simulations(&self) {
        self.simulations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rate_fetch_ok(&self) {
        self.rate_fetch_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rate_fetch_failed(&self) {
        self.rate_fetch_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_fallback_used(&self) {
        self.fallback_used.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "simulations": self.simulations.load(Ordering::Relaxed),
            "rejected": self.rejected.load(Ordering::Relaxed),
            "rate_fetch_ok": self.rate_fetch_ok.load(Ordering::Relaxed),
            "rate_fetch_failed": self.rate_fetch_failed.load(Ordering::Relaxed),
            "fallback_used": self.fallback_used.load(Ordering::Relaxed),
        })
    }
}

impl Default for AtomicMetrics {
    fn default() -> Self {
        Self::new()
    }
}
