//! Config subcommand handlers.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, InitArgs, OutputFormat, ValidateArgs};
use crate::config::{self, RigProfile};
use crate::error::CliError;
use crate::output;

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init(init) => handle_init(init, global),

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let rendered = match global.output {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)?,
                other => output::render_single(other, &cfg, |_| String::new(), |_| String::new())?,
            };
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Validate(validate) => handle_validate(validate, global).await,
    }
}

// ── Init ────────────────────────────────────────────────────────────

fn handle_init(args: InitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);
    let mut cfg = config::load_config_from(&path)?;

    if cfg.rigs.contains_key(&args.name) && !args.force {
        return Err(CliError::Validation {
            field: "name".into(),
            reason: format!("rig '{}' already exists (use --force to replace it)", args.name),
        });
    }

    let mut profile = RigProfile::new(args.host);
    profile.port = args.port;
    profile.update_interval = args.update_interval;
    profile.update_interval_fast = args.update_interval_fast;
    profile.debug = args.debug;

    // Reject out-of-range values before anything is written.
    let rig = config::profile_to_rig_config(&profile, &args.name, &cfg.defaults);
    let issues = rig.issues();
    if !issues.is_empty() {
        return Err(CliError::invalid_setup(&args.name, &issues));
    }

    cfg.rigs.insert(args.name.clone(), profile);
    if args.default || cfg.rigs.len() == 1 {
        cfg.default_rig = Some(args.name.clone());
    }

    config::save_config_to(&cfg, &path)?;
    if !global.quiet {
        eprintln!("saved rig '{}' to {}", args.name, path.display());
    }
    Ok(())
}

// ── Validate ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Tabled)]
struct ValidationRow {
    #[tabled(rename = "Rig")]
    rig: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Result")]
    result: String,
}

async fn handle_validate(args: ValidateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let rigs = config::resolve_all_rigs(global, &cfg)?;

    let mut rows = Vec::with_capacity(rigs.len());
    let mut first_error = None;

    for rig in &rigs {
        let outcome = if args.probe {
            rigwatch_core::validate_setup(rig).await
        } else {
            rig.validate()
        };

        let result = match outcome {
            Ok(()) => "ok".to_owned(),
            Err(err) => {
                let err = super::rig_error(err, &rig.name);
                let text = err.to_string();
                if first_error.is_none() {
                    first_error = Some(err);
                }
                text
            }
        };
        rows.push(ValidationRow {
            rig: rig.name.clone(),
            endpoint: format!("{}:{}", rig.host, rig.port),
            result,
        });
    }

    let rendered = output::render_list(
        global.output,
        &rows,
        Clone::clone,
        |r| format!("{} {}", r.rig, r.result),
    )?;
    output::print_output(&rendered, global.quiet);

    first_error.map_or(Ok(()), Err)
}
