//! Status command: one refresh, one report.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tabled::Tabled;

use rigwatch_core::{Algorithm, Device, Field, RigController, RigInfo, RigSummary, Snapshot, Worker};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Report ──────────────────────────────────────────────────────────

/// Everything the CLI shows for one rig, in serializable form.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub rig: String,
    pub endpoint: String,
    pub last_refresh: Option<DateTime<Utc>>,
    pub summary: RigSummary,
    pub info: Option<RigInfo>,
    pub devices: Vec<Device>,
    pub algorithms: Vec<Algorithm>,
    pub workers: Vec<Worker>,
}

impl StatusReport {
    pub fn from_controller(controller: &RigController) -> Self {
        let snapshot = controller.snapshot();
        let config = controller.config();
        Self::new(
            &config.name,
            format!("{}:{}", config.host, config.port),
            controller.store().last_refresh(),
            &snapshot,
        )
    }

    pub fn new(
        rig: &str,
        endpoint: String,
        last_refresh: Option<DateTime<Utc>>,
        snapshot: &Snapshot,
    ) -> Self {
        Self {
            rig: rig.into(),
            endpoint,
            last_refresh,
            summary: RigSummary::from_snapshot(snapshot),
            info: snapshot.info.clone(),
            devices: snapshot.devices.values().cloned().collect(),
            algorithms: snapshot.algorithms.values().cloned().collect(),
            workers: snapshot.workers.values().cloned().collect(),
        }
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Temp")]
    temp: String,
    #[tabled(rename = "VRAM")]
    vram: String,
    #[tabled(rename = "Hotspot")]
    hotspot: String,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Fan")]
    fan: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Hot")]
    hot: String,
}

impl DeviceRow {
    fn new(d: &Device, color: bool) -> Self {
        let hot = d.too_hot.unwrap_or(false);
        Self {
            id: output::field(&d.id),
            name: output::field(&d.name),
            temp: output::warn_if(output::field_with_unit(&d.gpu_temp, "°C"), hot, color),
            vram: output::field_with_unit(&d.vram_temp, "°C"),
            hotspot: output::field_with_unit(&d.hotspot_temp, "°C"),
            load: output::field_with_unit(&d.gpu_load, "%"),
            fan: output::field_with_unit(&d.gpu_fan_speed, "%"),
            power: output::field_with_unit(&d.gpu_power_usage, "W"),
            hot: match d.too_hot {
                Field::Available(true) => output::warn_if("yes".into(), true, color),
                Field::Available(false) => "no".into(),
                Field::Unavailable => "-".into(),
            },
        }
    }
}

#[derive(Tabled)]
struct AlgorithmRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MH/s")]
    mhs: String,
}

impl From<&Algorithm> for AlgorithmRow {
    fn from(a: &Algorithm) -> Self {
        Self {
            id: output::field(&a.id),
            name: output::field(&a.name),
            mhs: output::field(&a.hashrate_mhs()),
        }
    }
}

#[derive(Tabled)]
struct WorkerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Algorithms")]
    algorithms: String,
}

impl From<&Worker> for WorkerRow {
    fn from(w: &Worker) -> Self {
        let algorithms = w.algorithms.get().map_or_else(
            || "-".into(),
            |map| {
                map.values()
                    .map(|a| format!("{} ({} MH/s)", output::field(&a.name), output::field(&a.hashrate_mhs())))
                    .collect::<Vec<_>>()
                    .join(", ")
            },
        );
        Self {
            id: output::field(&w.id),
            device: output::field(&w.device_id),
            algorithms,
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────

fn detail(report: &StatusReport, color: bool) -> String {
    let s = &report.summary;
    let mut lines = vec![
        format!("Rig:      {} ({})", report.rig, output::online_badge(s.online, color)),
        format!("Endpoint: {}", report.endpoint),
        format!("Model:    {}", if s.model.is_empty() { "-" } else { &s.model }),
        format!("Version:  {}", output::field(&s.sw_version)),
        format!("Uptime:   {}", output::field_with_unit(&s.uptime_hours, "h")),
    ];
    if let Some(info) = &report.info {
        lines.push(format!(
            "CPU/RAM:  {} / {}",
            output::field_with_unit(&info.cpu_load, "%"),
            output::field_with_unit(&info.ram_load, "%"),
        ));
    }
    if let Some(at) = report.last_refresh {
        lines.push(format!(
            "Updated:  {}",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ));
    }

    if !report.devices.is_empty() {
        let rows: Vec<DeviceRow> = report.devices.iter().map(|d| DeviceRow::new(d, color)).collect();
        lines.push(String::new());
        lines.push(output::render_table(&rows));
    }
    if !report.algorithms.is_empty() {
        let rows: Vec<AlgorithmRow> = report.algorithms.iter().map(AlgorithmRow::from).collect();
        lines.push(String::new());
        lines.push(output::render_table(&rows));
    }
    if !report.workers.is_empty() {
        let rows: Vec<WorkerRow> = report.workers.iter().map(WorkerRow::from).collect();
        lines.push(String::new());
        lines.push(output::render_table(&rows));
    }
    lines.join("\n")
}

/// Render a report in the selected output format.
pub fn render(report: &StatusReport, format: OutputFormat, color: bool) -> Result<String, CliError> {
    output::render_single(
        format,
        report,
        |r| detail(r, color),
        |r| {
            format!(
                "{} {}",
                r.rig,
                if r.summary.online { "online" } else { "offline" }
            )
        },
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let rig = config::resolve_rig(global, cfg)?;
    let name = rig.name.clone();
    let controller = RigController::new(rig).map_err(|e| super::rig_error(e, &name))?;

    controller.refresh().await;
    let report = StatusReport::from_controller(&controller);
    controller.shutdown().await;

    if !report.summary.online {
        return Err(CliError::Offline {
            rig: report.rig,
            endpoint: report.endpoint,
        });
    }

    let rendered = render(&report, global.output, output::should_color(global.color))?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::empty();
        let device = Device {
            id: Field::Available(0),
            name: Field::Available("RTX 3080".into()),
            gpu_temp: Field::Available(65.0),
            too_hot: Field::Available(false),
            ..Device::default()
        };
        snapshot.devices.insert(device.id, device);
        snapshot.online = true;
        snapshot
    }

    #[test]
    fn table_shows_unavailable_fields_as_dash() {
        let report = StatusReport::new("garage", "10.0.0.2:18000".into(), None, &snapshot());
        let text = detail(&report, false);

        assert!(text.contains("Rig:      garage (online)"));
        assert!(text.contains("Model:    1x RTX 3080"));
        assert!(text.contains("65 °C"));
        assert!(text.contains("Version:  -"));
    }

    #[test]
    fn plain_output_is_name_and_state() {
        let report = StatusReport::new("garage", String::new(), None, &Snapshot::empty());
        let text = render(&report, OutputFormat::Plain, false);
        assert_eq!(text.ok().as_deref(), Some("garage offline"));
    }

    #[test]
    fn missing_worker_algorithms_render_as_dash() {
        let worker = Worker {
            id: Field::Available(0),
            ..Worker::default()
        };
        assert_eq!(WorkerRow::from(&worker).algorithms, "-");

        let empty = Worker {
            algorithms: Field::Available(IndexMap::new()),
            ..worker
        };
        assert_eq!(WorkerRow::from(&empty).algorithms, "");
    }
}
