//! Droplet actions and the composite retire workflow, as data.

use std::fmt;

/// A mutating droplet call that answers with an event id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropletAction {
    Destroy,
    PowerOff,
    PowerOn,
    Reboot,
    Shutdown,
}

impl DropletAction {
    /// Path segment of the action endpoint.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Destroy => "destroy",
            Self::PowerOff => "power_off",
            Self::PowerOn => "power_on",
            Self::Reboot => "reboot",
            Self::Shutdown => "shutdown",
        }
    }

    /// Present-participle label, e.g. "powering off".
    #[must_use]
    pub fn progressive(self) -> &'static str {
        match self {
            Self::Destroy => "destroying",
            Self::PowerOff => "powering off",
            Self::PowerOn => "powering on",
            Self::Reboot => "rebooting",
            Self::Shutdown => "shutting down",
        }
    }
}

/// One step of a composite workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    PowerOff,
    Snapshot,
    WaitUnlocked,
    Destroy,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PowerOff => "power off",
            Self::Snapshot => "take snapshot",
            Self::WaitUnlocked => "wait until unlocked",
            Self::Destroy => "destroy",
        })
    }
}

/// Snapshot a droplet and destroy it.
///
/// The lock flag can stay set briefly after a job reports `done`, and the
/// API rejects calls on a locked droplet, so unlock is re-confirmed before
/// the second power-off and before destroy.
pub const RETIRE_WORKFLOW: &[WorkflowStep] = &[
    WorkflowStep::PowerOff,
    WorkflowStep::Snapshot,
    WorkflowStep::WaitUnlocked,
    WorkflowStep::PowerOff,
    WorkflowStep::WaitUnlocked,
    WorkflowStep::Destroy,
];
