//! Watch command: keep rigs polled and re-render after every refresh.
//!
//! Keys read from stdin (followed by Enter): `f` toggles fast mode, `r`
//! refreshes now, `q` quits. Ctrl-C also quits.

use std::io::IsTerminal;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use rigwatch_core::{ObserverId, RigController, RigRegistry};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;
use crate::sinks::{MetricsSink, RefreshSink};

use super::status::{self, StatusReport};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub async fn handle(args: WatchArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let rigs = if args.all {
        config::resolve_all_rigs(global, cfg)?
    } else {
        vec![config::resolve_rig(global, cfg)?]
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut registry = RigRegistry::new();
    let mut observers: Vec<(String, ObserverId)> = Vec::new();

    for mut rig in rigs {
        if let Some(interval) = args.interval {
            rig.update_interval = interval;
        }
        let name = rig.name.clone();
        let controller = RigController::new(rig).map_err(|e| super::rig_error(e, &name))?;

        let (id, replaced) = registry.insert(controller.clone());
        if let Some(old) = replaced {
            old.shutdown().await;
            observers.retain(|(rig, _)| *rig != id);
        }
        let sink = RefreshSink::new(id.clone(), tx.clone());
        observers.push((id.clone(), controller.register_observer(Arc::new(sink))));
        if args.metrics {
            let sink = MetricsSink::new(id.clone(), controller.clone());
            observers.push((id, controller.register_observer(Arc::new(sink))));
        }
    }
    drop(tx);

    for id in registry.ids() {
        if let Some(controller) = registry.get(&id) {
            controller.start().await;
            if args.fast {
                controller.set_fast_mode(true).await;
            }
        }
    }

    let color = output::should_color(global.color);
    let clear = global.output == OutputFormat::Table && std::io::stdout().is_terminal();
    if !global.quiet && std::io::stdin().is_terminal() {
        eprintln!("watching {} rig(s); keys: f = fast mode, r = refresh, q = quit", registry.len());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),

            Some(id) = rx.recv() => {
                let Some(controller) = registry.get(&id) else { continue };
                let report = StatusReport::from_controller(controller);
                let rendered = match status::render(&report, global.output, color) {
                    Ok(rendered) => rendered,
                    Err(err) => break Err(err),
                };
                if clear && registry.len() == 1 {
                    print!("{CLEAR_SCREEN}");
                }
                output::print_output(&rendered, global.quiet);
            }

            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(key)) => match key.trim() {
                    "q" => break Ok(()),
                    "f" => {
                        for (id, controller) in registry.iter() {
                            let fast = !controller.is_fast_mode();
                            controller.set_fast_mode(fast).await;
                            info!(rig = id, fast, "fast mode toggled");
                        }
                    }
                    "r" => {
                        for (_, controller) in registry.iter() {
                            controller.refresh().await;
                        }
                    }
                    other => debug!(key = other, "ignoring unknown key"),
                },
                Ok(None) | Err(_) => stdin_open = false,
            },
        }
    };

    for (id, observer) in observers {
        if let Some(controller) = registry.get(&id) {
            controller.remove_observer(observer);
        }
    }
    registry.shutdown_all().await;
    result
}
