//! Observer sinks used by `watch`.
//!
//! A [`RefreshSink`] forwards "rig refreshed" events to the watch loop,
//! which renders from the controller's accessors. A [`MetricsSink`] emits
//! one structured record per device and algorithm on the
//! `rigwatch::metrics` target.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, trace};

use rigwatch_core::{Observer, RigController, Snapshot};

/// Forwards the rig id to the watch loop after every refresh.
pub struct RefreshSink {
    rig: String,
    tx: UnboundedSender<String>,
}

impl RefreshSink {
    pub fn new(rig: impl Into<String>, tx: UnboundedSender<String>) -> Self {
        Self { rig: rig.into(), tx }
    }
}

impl Observer for RefreshSink {
    fn notify(&self) {
        if self.tx.send(self.rig.clone()).is_err() {
            trace!(rig = %self.rig, "watch loop gone, dropping refresh event");
        }
    }
}

/// Logs the rig's readings after every refresh.
///
/// Holds a controller handle; `RigController::shutdown` drops it again.
pub struct MetricsSink {
    rig: String,
    controller: RigController,
}

impl MetricsSink {
    pub fn new(rig: impl Into<String>, controller: RigController) -> Self {
        Self {
            rig: rig.into(),
            controller,
        }
    }
}

impl Observer for MetricsSink {
    fn notify(&self) {
        log_metrics(&self.rig, &self.controller.snapshot());
    }
}

/// Log the current readings of every device and algorithm.
pub fn log_metrics(rig: &str, snapshot: &Snapshot) {
    info!(
        target: "rigwatch::metrics",
        rig,
        online = snapshot.online,
        devices = snapshot.devices.len(),
        workers = snapshot.workers.len(),
        "rig"
    );

    for device in snapshot.devices.values() {
        info!(
            target: "rigwatch::metrics",
            rig,
            device = %device.id,
            name = ?device.name.get(),
            gpu_temp = ?device.gpu_temp.get(),
            vram_temp = ?device.vram_temp.get(),
            hotspot_temp = ?device.hotspot_temp.get(),
            gpu_load = ?device.gpu_load.get(),
            fan = ?device.gpu_fan_speed.get(),
            power = ?device.gpu_power_usage.get(),
            too_hot = ?device.too_hot.get(),
            "device"
        );
    }

    for algorithm in snapshot.algorithms.values() {
        info!(
            target: "rigwatch::metrics",
            rig,
            algorithm = %algorithm.id,
            name = ?algorithm.name.get(),
            mhs = ?algorithm.hashrate_mhs().get(),
            "algorithm"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rigwatch_core::RigConfig;
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn refresh_sink_forwards_rig_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = RefreshSink::new("garage", tx);

        sink.notify();
        sink.notify();

        assert_eq!(rx.try_recv().ok().as_deref(), Some("garage"));
        assert_eq!(rx.try_recv().ok().as_deref(), Some("garage"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        RefreshSink::new("garage", tx).notify();
    }

    #[tokio::test]
    async fn metrics_sink_is_released_on_shutdown() {
        let Ok(controller) = RigController::new(RigConfig::new("garage", "127.0.0.1")) else {
            panic!("valid config rejected");
        };
        let sink = Arc::new(MetricsSink::new("garage", controller.clone()));
        controller.register_observer(Arc::clone(&sink) as Arc<dyn Observer>);

        sink.notify();
        assert_eq!(controller.observers().len(), 1);

        controller.shutdown().await;
        assert!(controller.observers().is_empty());
        assert_eq!(Arc::strong_count(&sink), 1);
    }
}
