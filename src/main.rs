// ==========================================
// 控制工程文档系统 - 命令行主入口
// ==========================================
// 技术栈: clap + tokio + SQLite
// 输出: 命令结果以 JSON 写到 stdout，日志写到 stderr
// ==========================================

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use control_docs::api::{ArtifactKind, IoPointPatch, RuleByTags, RulePatch};
use control_docs::app::{get_default_db_path, AppState, DB_PATH_ENV};
use control_docs::domain::io_point::{DEFAULT_RANGE_MAX, DEFAULT_RANGE_MIN};
use control_docs::domain::{IoType, LogicType, NewIoPoint, NewProject};
use control_docs::logging;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "control-docs")]
#[command(version)]
#[command(about = "Import I/O lists and generate control documentation for automation projects")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = DB_PATH_ENV)]
    db: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema (idempotent)
    Init,

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage I/O points
    #[command(subcommand)]
    Io(IoCommand),

    /// Manage cause-and-effect rules
    #[command(subcommand)]
    Rule(RuleCommand),

    /// Inspect network devices
    #[command(subcommand)]
    Device(DeviceCommand),

    /// Import tabular files (.csv, .txt, .xlsx, .xls)
    #[command(subcommand)]
    Import(ImportCommand),

    /// Generate artifacts into the output directory
    Generate {
        /// Artifact to generate
        #[arg(value_enum)]
        artifact: ArtifactArg,

        /// Project id or name
        project: String,

        /// Output directory (defaults to the artifact.output_dir setting)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Read or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ProjectCommand {
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Controller type shown in artifact headers
        #[arg(long, default_value = "")]
        plc_type: String,
        #[arg(long, default_value = "")]
        hmi_type: String,
        #[arg(long, default_value = "")]
        hmi_details: String,
    },
    List,
    Delete {
        /// Project id or name
        project: String,
    },
}

#[derive(Subcommand)]
enum IoCommand {
    Add {
        /// Project id or name
        project: String,
        tag: String,
        #[arg(long = "type", value_parser = parse_io_type, default_value = "DI")]
        io_type: IoType,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        modbus: String,
        #[arg(long, default_value = "")]
        normal_state: String,
        #[arg(long, default_value = "")]
        units: String,
        #[arg(long, default_value_t = DEFAULT_RANGE_MIN, allow_hyphen_values = true)]
        min: f64,
        #[arg(long, default_value_t = DEFAULT_RANGE_MAX, allow_hyphen_values = true)]
        max: f64,
    },
    /// Change fields of an existing I/O point; omitted flags keep their value
    Update {
        project: String,
        tag: String,
        /// New tag name
        #[arg(long = "rename")]
        new_tag: Option<String>,
        #[arg(long = "type", value_parser = parse_io_type)]
        io_type: Option<IoType>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        modbus: Option<String>,
        #[arg(long)]
        normal_state: Option<String>,
        #[arg(long)]
        units: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        min: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        max: Option<f64>,
    },
    List {
        project: String,
    },
    Delete {
        project: String,
        tag: String,
    },
}

#[derive(Subcommand)]
enum RuleCommand {
    Add {
        project: String,
        /// Cause tag name
        #[arg(long)]
        cause: String,
        /// Effect tag name
        #[arg(long)]
        effect: String,
        /// AND, OR, NOT or DIRECT
        #[arg(long, default_value = "DIRECT")]
        logic: String,
        /// Delay in seconds; > 0 produces a TON timer
        #[arg(long, default_value_t = 0.0)]
        delay: f64,
        #[arg(long, default_value_t = 1)]
        priority: i32,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change fields of an existing rule; omitted flags keep their value
    Update {
        rule_id: String,
        #[arg(long)]
        cause: Option<String>,
        #[arg(long)]
        effect: Option<String>,
        #[arg(long)]
        logic: Option<String>,
        #[arg(long)]
        delay: Option<f64>,
        #[arg(long)]
        priority: Option<i32>,
        #[arg(long)]
        description: Option<String>,
    },
    List {
        project: String,
    },
    Delete {
        rule_id: String,
    },
}

#[derive(Subcommand)]
enum DeviceCommand {
    List { project: String },
}

#[derive(Subcommand)]
enum ImportCommand {
    /// Import an I/O list (columns detected from header keywords)
    Io { project: String, file: PathBuf },
    /// Import network devices (fixed column order)
    Devices { project: String, file: PathBuf },
}

#[derive(Subcommand)]
enum ConfigCommand {
    Get { key: String },
    Set { key: String, value: String },
    List,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ArtifactArg {
    Theory,
    Ladder,
    Export,
    Devices,
    All,
}

impl ArtifactArg {
    fn kinds(self) -> Vec<ArtifactKind> {
        match self {
            ArtifactArg::Theory => vec![ArtifactKind::ControlTheory],
            ArtifactArg::Ladder => vec![ArtifactKind::LadderLogic],
            ArtifactArg::Export => vec![ArtifactKind::ProjectExport],
            ArtifactArg::Devices => vec![ArtifactKind::NetworkTopology],
            ArtifactArg::All => vec![
                ArtifactKind::ControlTheory,
                ArtifactKind::LadderLogic,
                ArtifactKind::ProjectExport,
                ArtifactKind::NetworkTopology,
            ],
        }
    }
}

fn parse_io_type(s: &str) -> Result<IoType, String> {
    IoType::parse(s).ok_or_else(|| format!("unknown I/O type '{}', expected DI, DO, AI or AO", s))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_with_format(cli.log_json);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "命令执行失败");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let db_path = match cli.db {
        Some(path) => path.to_string_lossy().to_string(),
        None => get_default_db_path(),
    };
    tracing::debug!(db_path = %db_path, "使用数据库");

    let state = AppState::new(db_path.clone()).map_err(|e| anyhow!(e))?;

    match cli.command {
        Commands::Init => {
            print_json(&serde_json::json!({
                "db_path": db_path,
                "schema_version": state.schema_version,
            }))?;
        }

        Commands::Project(cmd) => match cmd {
            ProjectCommand::Create {
                name,
                description,
                plc_type,
                hmi_type,
                hmi_details,
            } => {
                let project = state.project_api.create_project(NewProject {
                    name,
                    description,
                    plc_type,
                    hmi_type,
                    hmi_details,
                })?;
                print_json(&project)?;
            }
            ProjectCommand::List => print_json(&state.project_api.list_projects()?)?,
            ProjectCommand::Delete { project } => {
                let project = state.project_api.resolve_project(&project)?;
                state.project_api.delete_project(&project.id)?;
            }
        },

        Commands::Io(cmd) => match cmd {
            IoCommand::Add {
                project,
                tag,
                io_type,
                description,
                address,
                modbus,
                normal_state,
                units,
                min,
                max,
            } => {
                let project = state.project_api.resolve_project(&project)?;
                let point = state.io_point_api.add_io_point(
                    &project.id,
                    NewIoPoint {
                        tag_name: tag,
                        description,
                        io_type,
                        address,
                        modbus_register: modbus,
                        normal_state,
                        engineering_units: units,
                        range_min: min,
                        range_max: max,
                    },
                )?;
                print_json(&point)?;
            }
            IoCommand::Update {
                project,
                tag,
                new_tag,
                io_type,
                description,
                address,
                modbus,
                normal_state,
                units,
                min,
                max,
            } => {
                let project = state.project_api.resolve_project(&project)?;
                let point = state.io_point_api.update_io_point_by_tag(
                    &project.id,
                    &tag,
                    IoPointPatch {
                        tag_name: new_tag,
                        description,
                        io_type,
                        address,
                        modbus_register: modbus,
                        normal_state,
                        engineering_units: units,
                        range_min: min,
                        range_max: max,
                    },
                )?;
                print_json(&point)?;
            }
            IoCommand::List { project } => {
                let project = state.project_api.resolve_project(&project)?;
                print_json(&state.io_point_api.list_io_points(&project.id)?)?;
            }
            IoCommand::Delete { project, tag } => {
                let project = state.project_api.resolve_project(&project)?;
                state.io_point_api.delete_io_point_by_tag(&project.id, &tag)?;
            }
        },

        Commands::Rule(cmd) => match cmd {
            RuleCommand::Add {
                project,
                cause,
                effect,
                logic,
                delay,
                priority,
                description,
            } => {
                let project = state.project_api.resolve_project(&project)?;
                let rule = state.io_point_api.add_rule(
                    &project.id,
                    RuleByTags {
                        cause_tag: cause,
                        effect_tag: effect,
                        logic_type: LogicType::from(logic),
                        time_delay: delay,
                        priority,
                        description,
                    },
                )?;
                print_json(&rule)?;
            }
            RuleCommand::Update {
                rule_id,
                cause,
                effect,
                logic,
                delay,
                priority,
                description,
            } => {
                let rule = state.io_point_api.update_rule(
                    &rule_id,
                    RulePatch {
                        cause_tag: cause,
                        effect_tag: effect,
                        logic_type: logic.map(LogicType::from),
                        time_delay: delay,
                        priority,
                        description,
                    },
                )?;
                print_json(&rule)?;
            }
            RuleCommand::List { project } => {
                let project = state.project_api.resolve_project(&project)?;
                print_json(&state.io_point_api.list_rules(&project.id)?)?;
            }
            RuleCommand::Delete { rule_id } => state.io_point_api.delete_rule(&rule_id)?,
        },

        Commands::Device(DeviceCommand::List { project }) => {
            let project = state.project_api.resolve_project(&project)?;
            print_json(&state.io_point_api.list_devices(&project.id)?)?;
        }

        Commands::Import(cmd) => {
            let outcome = match cmd {
                ImportCommand::Io { project, file } => {
                    let project = state.project_api.resolve_project(&project)?;
                    state.import_api.import_io_points(&project.id, &file).await
                }
                ImportCommand::Devices { project, file } => {
                    let project = state.project_api.resolve_project(&project)?;
                    state.import_api.import_devices(&project.id, &file).await
                }
            };
            print_json(&outcome)?;
            if !outcome.success {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Generate {
            artifact,
            project,
            out,
        } => {
            let project = state.project_api.resolve_project(&project)?;
            let mut written = Vec::new();
            for kind in artifact.kinds() {
                let artifact = state
                    .artifact_api
                    .generate(kind, &project, out.as_deref())
                    .await
                    .with_context(|| format!("生成 {:?} 失败", kind))?;
                written.push(artifact);
            }
            print_json(&written)?;
        }

        Commands::Config(cmd) => match cmd {
            ConfigCommand::Get { key } => print_json(&state.config_api.get_config(&key)?)?,
            ConfigCommand::Set { key, value } => state.config_api.update_config(&key, &value)?,
            ConfigCommand::List => print_json(&state.config_api.list_configs()?)?,
        },
    }

    Ok(ExitCode::SUCCESS)
}
