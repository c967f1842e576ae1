//! One function per subcommand. Each drives a workflow the same way the
//! screens do: load through the entry guard, then act.

use std::sync::Arc;

use jiff::Zoned;
use jiff::tz::TimeZone;

use emed_client::{ClinicApi, HttpClinicApi};
use emed_core::models::attendance::AttendanceType;
use emed_core::routes::Route;
use emed_core::schedule::SystemClock;
use emed_core::session::{AuthToken, SessionContext};
use emed_workflow::attendance::AttendanceDetail;
use emed_workflow::dashboard::{ActionState, Dashboard};
use emed_workflow::entry::{self, PageLoad};
use emed_workflow::modal::SelectedAppointment;
use emed_workflow::services::Services;

use crate::config::{DeskConfig, TOKEN_ENV};
use crate::console::{ConsoleNavigator, ConsoleNotifier, FileOutbox};

/// Vitals given on the command line; `None` leaves a field as loaded.
#[derive(Debug, Clone, Default)]
pub struct Vitals {
    pub description: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub diastolic_pressure: Option<f64>,
    pub systolic_pressure: Option<f64>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub enum PrescriptionLine {
    Exam(usize),
    Medicine(usize),
}

pub struct Desk {
    api: Option<Arc<HttpClinicApi>>,
    token: Option<AuthToken>,
    session: SessionContext,
    services: Services,
    navigator: Arc<ConsoleNavigator>,
    tz: TimeZone,
}

impl Desk {
    pub fn from_config(config: &DeskConfig) -> eyre::Result<Self> {
        let tz = config.tz()?;
        let token = config.resolve_token();
        let api = match &token {
            Some(token) => Some(Arc::new(HttpClinicApi::new(
                &config.api_base_url,
                token.clone(),
            )?)),
            None => None,
        };

        let navigator = Arc::new(ConsoleNavigator::default());
        let outbox = Arc::new(FileOutbox::new(&config.export_dir));
        let services = Services {
            notifier: Arc::new(ConsoleNotifier),
            navigator: navigator.clone(),
            printer: outbox.clone(),
            downloads: outbox,
            clock: Arc::new(SystemClock::new(tz.clone())),
        };

        Ok(Self {
            api,
            token,
            session: config.session.context(),
            services,
            navigator,
            tz,
        })
    }

    fn api(&self) -> Option<Arc<dyn ClinicApi>> {
        self.api.clone().map(|api| api as Arc<dyn ClinicApi>)
    }

    async fn dashboard(&self) -> eyre::Result<Option<Dashboard>> {
        let Some(api) = self.api() else {
            return Ok(signed_out(Route::Login));
        };
        match entry::load_dashboard(api.as_ref(), self.token.as_ref()).await? {
            PageLoad::Render(attendances) => Ok(Some(Dashboard::new(
                api,
                self.session.clone(),
                self.services.clone(),
                attendances,
            ))),
            PageLoad::Redirect(route) => Ok(signed_out(route)),
        }
    }

    async fn detail(&self, id: u64) -> eyre::Result<Option<AttendanceDetail>> {
        let Some(api) = self.api() else {
            return Ok(signed_out(Route::Login));
        };
        match entry::load_attendance(api.as_ref(), self.token.as_ref(), id).await? {
            PageLoad::Render(attendance) => Ok(Some(AttendanceDetail::open(
                api,
                self.session.clone(),
                self.services.clone(),
                id,
                attendance,
            )?)),
            PageLoad::Redirect(route) => Ok(signed_out(route)),
        }
    }

    fn parse_slot(&self, input: &str) -> eyre::Result<Zoned> {
        let datetime: jiff::civil::DateTime = input
            .parse()
            .map_err(|e| eyre::eyre!("invalid date {input:?} (expected YYYY-MM-DDTHH:MM): {e}"))?;
        Ok(datetime.to_zoned(self.tz.clone())?)
    }

    fn report_navigation(&self) {
        if let Some(route) = self.navigator.last() {
            println!("-> {route}");
        }
    }
}

fn signed_out<T>(route: Route) -> Option<T> {
    eprintln!("not signed in (would redirect to {route}); set {TOKEN_ENV} or the config token");
    None
}

fn action_label(name: &str, state: ActionState) -> Option<String> {
    match state {
        ActionState::Hidden => None,
        ActionState::Disabled => Some(format!("({name})")),
        ActionState::Enabled => Some(name.to_string()),
    }
}

pub async fn list(desk: &Desk) -> eyre::Result<()> {
    let Some(board) = desk.dashboard().await? else {
        return Ok(());
    };
    let rows = board.rows();
    if rows.is_empty() {
        println!("No attendances.");
        return Ok(());
    }

    for row in rows {
        let a = row.attendance;
        let actions: Vec<String> = [
            ("attend", row.actions.attend),
            ("not-attended", row.actions.not_attended),
            ("reschedule", row.actions.reschedule),
            ("cancel", row.actions.cancel),
            ("records", row.actions.medical_records),
        ]
        .into_iter()
        .filter_map(|(name, state)| action_label(name, state))
        .collect();

        println!(
            "#{:<5} {:<12} {:<11} [{}] {} | {} | {}",
            a.id,
            a.kind.as_str(),
            a.status.as_str(),
            row.status_color.scheme(),
            a.patient_name().unwrap_or("-"),
            row.date_label,
            actions.join(" "),
        );
    }
    Ok(())
}

pub async fn export(desk: &Desk) -> eyre::Result<()> {
    let Some(board) = desk.dashboard().await? else {
        return Ok(());
    };
    let file = board.export()?;
    tracing::debug!(file = %file.file_name, "export finished");
    Ok(())
}

pub async fn attend(desk: &Desk, id: u64) -> eyre::Result<()> {
    let Some(mut board) = desk.dashboard().await? else {
        return Ok(());
    };
    board.attend(id).await?;
    desk.report_navigation();
    Ok(())
}

pub async fn not_attended(desk: &Desk, id: u64) -> eyre::Result<()> {
    let Some(mut board) = desk.dashboard().await? else {
        return Ok(());
    };
    board.not_attended(id).await?;
    Ok(())
}

pub async fn cancel(desk: &Desk, id: u64, reason: String) -> eyre::Result<()> {
    let Some(mut board) = desk.dashboard().await? else {
        return Ok(());
    };
    board.open_cancel(id)?;
    if let SelectedAppointment::Cancel(form) = board.form_mut() {
        form.reason = reason;
    }
    board.submit_modal().await?;
    Ok(())
}

pub async fn reschedule(desk: &Desk, id: u64, date: &str) -> eyre::Result<()> {
    let date = desk.parse_slot(date)?;
    let Some(mut board) = desk.dashboard().await? else {
        return Ok(());
    };
    board.open_reschedule(id)?;
    if let SelectedAppointment::Reschedule(form) = board.form_mut() {
        form.date = Some(date);
    }
    board.submit_modal().await?;
    Ok(())
}

pub async fn create(
    desk: &Desk,
    kind: AttendanceType,
    professional_id: u64,
    patient_id: u64,
    date: &str,
) -> eyre::Result<()> {
    let date = desk.parse_slot(date)?;
    let Some(mut board) = desk.dashboard().await? else {
        return Ok(());
    };
    board.open_create().await?;
    board.set_create_kind(kind);
    if !board
        .professional_options()
        .iter()
        .any(|o| o.value == professional_id)
    {
        let names: Vec<String> = board
            .professional_options()
            .into_iter()
            .map(|o| format!("{} ({})", o.label, o.value))
            .collect();
        eyre::bail!(
            "professional {professional_id} cannot take a {kind} attendance; choose one of: {}",
            names.join(", ")
        );
    }
    if let SelectedAppointment::Create(form) = board.form_mut() {
        form.professional_id = Some(professional_id);
        form.patient_id = Some(patient_id);
        form.date = Some(date);
    }
    board.submit_modal().await?;
    Ok(())
}

pub async fn record(desk: &Desk, id: u64, vitals: Vitals, finalize: bool) -> eyre::Result<()> {
    let Some(mut detail) = desk.detail(id).await? else {
        return Ok(());
    };
    println!("{}", detail.heading());

    if let Some(description) = vitals.description {
        detail.set_description(Some(description));
    }
    if vitals.weight.is_some() {
        detail.set_weight(vitals.weight);
    }
    if vitals.height.is_some() {
        detail.set_height(vitals.height);
    }
    if vitals.diastolic_pressure.is_some() {
        detail.set_diastolic_pressure(vitals.diastolic_pressure);
    }
    if vitals.systolic_pressure.is_some() {
        detail.set_systolic_pressure(vitals.systolic_pressure);
    }
    if vitals.temperature.is_some() {
        detail.set_temperature(vitals.temperature);
    }
    if let Some(bmi) = detail.bmi() {
        println!("BMI {} ({})", bmi.display(), bmi.category.label());
    }

    if finalize {
        detail.finalize().await?;
    } else {
        detail.save().await?;
    }
    desk.report_navigation();
    Ok(())
}

pub async fn prescription(desk: &Desk, id: u64, line: PrescriptionLine) -> eyre::Result<()> {
    let Some(detail) = desk.detail(id).await? else {
        return Ok(());
    };
    match line {
        PrescriptionLine::Exam(index) => detail.print_exam(index)?,
        PrescriptionLine::Medicine(index) => detail.print_medicine(index)?,
    }
    Ok(())
}
