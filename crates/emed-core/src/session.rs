//! Session identity and capabilities.
//!
//! Workflows receive a [`SessionContext`] explicitly instead of reading
//! ambient auth state, so they can be exercised without a live login.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::attendance::Attendance;
use crate::models::patient::ProfessionalRole;

/// Bearer token for the REST backend. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Empty or whitespace-only tokens are treated as absent.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `abcd...wxyz` style hint safe for logs and config listings.
    pub fn hint(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "****".to_string();
        }
        let prefix: String = chars[..4].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{prefix}...{suffix}")
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({})", self.hint())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Capability {
    ManageAppointments,
    ManageAttendances,
    ManagePrescriptions,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::ManageAppointments => "manage appointments",
            Capability::ManageAttendances => "manage attendances",
            Capability::ManagePrescriptions => "manage prescriptions",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Capabilities {
    #[serde(default)]
    pub manage_appointments: bool,
    #[serde(default)]
    pub manage_attendances: bool,
    #[serde(default)]
    pub manage_prescriptions: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            manage_appointments: true,
            manage_attendances: true,
            manage_prescriptions: true,
        }
    }

    /// Reception staff: scheduling only.
    pub fn front_desk() -> Self {
        Self {
            manage_appointments: true,
            ..Self::default()
        }
    }

    /// Defaults for a clinical professional. Nurses run triage attendances;
    /// doctors additionally issue prescriptions.
    pub fn for_role(role: ProfessionalRole) -> Self {
        match role {
            ProfessionalRole::Nurse => Self {
                manage_attendances: true,
                ..Self::default()
            },
            ProfessionalRole::Doctor => Self {
                manage_attendances: true,
                manage_prescriptions: true,
                ..Self::default()
            },
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageAppointments => self.manage_appointments,
            Capability::ManageAttendances => self.manage_attendances,
            Capability::ManagePrescriptions => self.manage_prescriptions,
        }
    }
}

/// The logged-in professional, if the session belongs to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionProfessional {
    pub id: u64,
    pub name: String,
    pub role: ProfessionalRole,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub professional: Option<SessionProfessional>,
    pub capabilities: Capabilities,
}

impl SessionContext {
    pub fn new(professional: Option<SessionProfessional>, capabilities: Capabilities) -> Self {
        Self {
            professional,
            capabilities,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.has(capability)
    }

    /// True when the attendance is assigned to the session's professional.
    pub fn is_assigned(&self, attendance: &Attendance) -> bool {
        self.professional
            .as_ref()
            .is_some_and(|p| p.id == attendance.professional_id)
    }
}
