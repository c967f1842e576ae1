use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;

use emed_core::models::attendance::AttendanceType;
use emed_core::models::patient::ProfessionalRole;
use emed_core::session::SessionProfessional;
use emed_desk::commands::{self, Desk, PrescriptionLine, Vitals};
use emed_desk::config::{self, DeskConfig, TOKEN_ENV};

#[derive(Parser)]
#[command(name = "emed-desk")]
#[command(about = "Clinic front desk for the eMed backend")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
    /// Config directory (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List attendances with their available actions
    List,
    /// Write the attendance list to a spreadsheet
    Export,
    /// Start (or resume) an attendance assigned to you
    Attend { id: u64 },
    /// Mark a confirmed attendance as a no-show
    NotAttended { id: u64 },
    /// Cancel a confirmed attendance
    Cancel {
        id: u64,
        #[arg(long)]
        reason: String,
    },
    /// Move a confirmed attendance to a new slot
    Reschedule {
        id: u64,
        /// Local date and time in the clinic time zone (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        date: String,
    },
    /// Book a new attendance
    Create {
        /// TRIAGE or CONSULTATION
        #[arg(long = "type")]
        kind: AttendanceType,
        #[arg(long)]
        professional: u64,
        #[arg(long)]
        patient: u64,
        /// Local date and time in the clinic time zone (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        date: String,
    },
    /// Save vitals of an attendance, optionally finishing it
    Record {
        id: u64,
        #[arg(long)]
        description: Option<String>,
        /// Kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Meters
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        diastolic: Option<f64>,
        #[arg(long)]
        systolic: Option<f64>,
        /// Degrees Celsius
        #[arg(long)]
        temperature: Option<f64>,
        /// Mark the attendance DONE before saving
        #[arg(long)]
        finalize: bool,
    },
    /// Print a prescription for one exam or medicine line
    Prescription {
        id: u64,
        #[arg(long, conflicts_with = "medicine", required_unless_present = "medicine")]
        exam: Option<usize>,
        #[arg(long)]
        medicine: Option<usize>,
    },
    /// Show or create the desk configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration with secrets redacted
    Show,
    /// Write a new configuration
    Init {
        #[arg(long)]
        api_base_url: String,
        #[arg(long)]
        export_dir: PathBuf,
        #[arg(long, default_value = config::DEFAULT_TIME_ZONE)]
        time_zone: String,
        #[arg(long, requires_all = ["professional_name", "role"])]
        professional_id: Option<u64>,
        #[arg(long)]
        professional_name: Option<String>,
        /// NURSE or DOCTOR
        #[arg(long, value_parser = parse_role)]
        role: Option<ProfessionalRole>,
        #[arg(long)]
        token: Option<String>,
    },
}

fn parse_role(s: &str) -> Result<ProfessionalRole, String> {
    match s.to_ascii_uppercase().as_str() {
        "NURSE" => Ok(ProfessionalRole::Nurse),
        "DOCTOR" => Ok(ProfessionalRole::Doctor),
        other => Err(format!("unknown role: {other}")),
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let dir = match cli.config_dir {
        Some(dir) => dir,
        None => config::default_config_dir()?,
    };

    let command = match cli.command {
        Command::Config { action } => return run_config(&dir, action),
        command => command,
    };

    if !config::has_config(&dir) {
        eyre::bail!(
            "no configuration in {}; run `emed-desk config init` first",
            dir.display()
        );
    }
    let desk = Desk::from_config(&config::load_config(&dir)?)?;

    match command {
        Command::List => commands::list(&desk).await,
        Command::Export => commands::export(&desk).await,
        Command::Attend { id } => commands::attend(&desk, id).await,
        Command::NotAttended { id } => commands::not_attended(&desk, id).await,
        Command::Cancel { id, reason } => commands::cancel(&desk, id, reason).await,
        Command::Reschedule { id, date } => commands::reschedule(&desk, id, &date).await,
        Command::Create {
            kind,
            professional,
            patient,
            date,
        } => commands::create(&desk, kind, professional, patient, &date).await,
        Command::Record {
            id,
            description,
            weight,
            height,
            diastolic,
            systolic,
            temperature,
            finalize,
        } => {
            let vitals = Vitals {
                description,
                weight,
                height,
                diastolic_pressure: diastolic,
                systolic_pressure: systolic,
                temperature,
            };
            commands::record(&desk, id, vitals, finalize).await
        }
        Command::Prescription { id, exam, medicine } => {
            let line = match (exam, medicine) {
                (Some(index), _) => PrescriptionLine::Exam(index),
                (None, Some(index)) => PrescriptionLine::Medicine(index),
                (None, None) => eyre::bail!("pass --exam or --medicine"),
            };
            commands::prescription(&desk, id, line).await
        }
        Command::Config { .. } => Ok(()),
    }
}

fn run_config(dir: &std::path::Path, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = config::load_config(dir)?;
            let info = config::config_info(&config, std::env::var(TOKEN_ENV).ok());
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        ConfigAction::Init {
            api_base_url,
            export_dir,
            time_zone,
            professional_id,
            professional_name,
            role,
            token,
        } => {
            let mut config = DeskConfig::new(api_base_url, export_dir);
            config.time_zone = time_zone;
            config.tz()?;
            config.token = token;
            if let (Some(id), Some(name), Some(role)) = (professional_id, professional_name, role)
            {
                config.session.professional = Some(SessionProfessional { id, name, role });
            }
            config::save_config(dir, &config)?;
            println!("config written to {}", dir.display());
        }
    }
    Ok(())
}
