use std::path::{Path, PathBuf};

use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

use emed_core::session::{AuthToken, Capabilities, SessionContext, SessionProfessional};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the stored token.
pub const TOKEN_ENV: &str = "EMED_TOKEN";

pub const DEFAULT_TIME_ZONE: &str = "UTC";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub api_base_url: String,
    /// IANA name of the clinic's time zone. Added in v1; slot rules are
    /// evaluated in it.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Where exported spreadsheets and printed prescriptions are written.
    pub export_dir: PathBuf,
    #[serde(default)]
    pub session: SessionConfig,
    pub created_at: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

/// Who is signed in at this desk. Capabilities default from the role when
/// not given explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional: Option<SessionProfessional>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,
}

impl SessionConfig {
    pub fn context(&self) -> SessionContext {
        let capabilities = match (&self.capabilities, &self.professional) {
            (Some(explicit), _) => *explicit,
            (None, Some(professional)) => Capabilities::for_role(professional.role),
            (None, None) => Capabilities::front_desk(),
        };
        SessionContext::new(self.professional.clone(), capabilities)
    }
}

impl DeskConfig {
    pub fn new(api_base_url: impl Into<String>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base_url: api_base_url.into(),
            time_zone: default_time_zone(),
            export_dir: export_dir.into(),
            session: SessionConfig::default(),
            created_at: jiff::Timestamp::now(),
            token: None,
        }
    }

    pub fn tz(&self) -> eyre::Result<TimeZone> {
        TimeZone::get(&self.time_zone)
            .map_err(|e| eyre::eyre!("unknown time zone {:?}: {e}", self.time_zone))
    }

    /// `EMED_TOKEN` wins over the stored token.
    pub fn resolve_token(&self) -> Option<AuthToken> {
        self.resolve_token_with(std::env::var(TOKEN_ENV).ok())
    }

    pub fn resolve_token_with(&self, env_token: Option<String>) -> Option<AuthToken> {
        env_token
            .and_then(AuthToken::new)
            .or_else(|| self.token.clone().and_then(AuthToken::new))
    }
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub api_base_url: String,
    pub time_zone: String,
    pub export_dir: String,
    pub created_at: String,
    pub professional: Option<String>,
    pub capabilities: Vec<String>,
    pub token_source: String,
    pub token_hint: Option<String>,
}

pub fn default_config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.emed.desk"))
}

pub fn has_config(dir: &Path) -> bool {
    dir.join(CONFIG_FILE).exists()
}

pub fn load_config(dir: &Path) -> eyre::Result<DeskConfig> {
    let path = dir.join(CONFIG_FILE);
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = match json.get("config_version").and_then(|v| v.as_u64()) {
        None => 0,
        Some(raw) => u32::try_from(raw).map_err(|_| {
            eyre::eyre!(
                "config_version {raw} is newer than this build supports ({CURRENT_VERSION}). \
                 Please update emed-desk."
            )
        })?,
    };

    let migrated = migrate(json, on_disk_version)?;
    let config: DeskConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update emed-desk."
        ));
    }

    // v0 → v1: add time_zone
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("time_zone")
            .or_insert(serde_json::Value::String(default_time_zone()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added time_zone)");
    }

    Ok(json)
}

pub fn save_config(dir: &Path, config: &DeskConfig) -> eyre::Result<()> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // The file may hold a bearer token.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn config_info(config: &DeskConfig, env_token: Option<String>) -> ConfigInfo {
    let from_env = env_token.as_deref().is_some_and(|t| !t.trim().is_empty());
    let token = config.resolve_token_with(env_token);
    let token_source = match (&token, from_env) {
        (None, _) => "none",
        (Some(_), true) => "env",
        (Some(_), false) => "config",
    };

    let context = config.session.context();
    let capabilities = [
        (context.capabilities.manage_appointments, "manage_appointments"),
        (context.capabilities.manage_attendances, "manage_attendances"),
        (context.capabilities.manage_prescriptions, "manage_prescriptions"),
    ]
    .into_iter()
    .filter(|(granted, _)| *granted)
    .map(|(_, name)| name.to_string())
    .collect();

    ConfigInfo {
        api_base_url: config.api_base_url.clone(),
        time_zone: config.time_zone.clone(),
        export_dir: config.export_dir.display().to_string(),
        created_at: config.created_at.to_string(),
        professional: context
            .professional
            .as_ref()
            .map(|p| format!("{} ({}, #{})", p.name, p.role, p.id)),
        capabilities,
        token_source: token_source.to_string(),
        token_hint: token.map(|t| t.hint()),
    }
}
