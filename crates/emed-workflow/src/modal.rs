//! The shared confirmation modal of the dashboard.
//!
//! The modal renders exactly one body, selected by [`SelectedAppointment`].
//! The variant is also the submit binding: submitting dispatches on it, so
//! a body and its handler cannot disagree.

use crate::form::{CancelForm, CreateForm, RescheduleForm};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectedAppointment {
    #[default]
    None,
    Create(CreateForm),
    Reschedule(RescheduleForm),
    Cancel(CancelForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalSize {
    Lg,
    FourXl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationModal {
    visible: bool,
    header: &'static str,
    size: ModalSize,
    confirmation: bool,
    selected: SelectedAppointment,
}

impl Default for ConfirmationModal {
    fn default() -> Self {
        Self::closed()
    }
}

impl ConfirmationModal {
    pub fn closed() -> Self {
        Self {
            visible: false,
            header: "",
            size: ModalSize::Lg,
            confirmation: false,
            selected: SelectedAppointment::None,
        }
    }

    pub fn open(selected: SelectedAppointment) -> Self {
        let (header, size, confirmation) = match &selected {
            SelectedAppointment::None => return Self::closed(),
            SelectedAppointment::Create(_) => ("Create appointment", ModalSize::FourXl, false),
            SelectedAppointment::Reschedule(_) => {
                ("Reschedule an appointment", ModalSize::Lg, true)
            }
            SelectedAppointment::Cancel(_) => ("Cancel an appointment", ModalSize::Lg, true),
        };
        Self {
            visible: true,
            header,
            size,
            confirmation,
            selected,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn header(&self) -> &'static str {
        self.header
    }

    pub fn size(&self) -> ModalSize {
        self.size
    }

    /// Confirmation modals ask "are you sure" before submitting.
    pub fn is_confirmation(&self) -> bool {
        self.confirmation
    }

    pub fn selected(&self) -> &SelectedAppointment {
        &self.selected
    }

    pub fn selected_mut(&mut self) -> &mut SelectedAppointment {
        &mut self.selected
    }

    /// Hides the modal and drops the selection with it.
    pub fn close(&mut self) {
        *self = Self::closed();
    }
}
