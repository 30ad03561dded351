//! Console implementation of the workflow's `Operator`.
//!
//! Uses dialoguer when stdin is a terminal and plain line reads otherwise,
//! so the tool can also be driven from a pipe.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Input;

use sitebuild_core::{CoreError, Device, Operator, Step};

use crate::output::{self, Printer};

const SITE_NAME_PROMPT: &str = "Enter new site name";
const DEVICES_PROMPT: &str = "Enter device MACs to assign (comma separated)";

pub struct ConsoleOperator {
    site_name: Option<String>,
    printer: Printer,
    interactive: bool,
}

impl ConsoleOperator {
    /// `site_name` skips the name prompt when set.
    pub fn new(site_name: Option<String>, printer: Printer) -> Self {
        Self {
            site_name,
            printer,
            interactive: io::stdin().is_terminal(),
        }
    }

    fn ask(&self, prompt: &str) -> Result<String, CoreError> {
        if self.interactive {
            return Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err);
        }

        {
            let mut stderr = io::stderr().lock();
            let _ = write!(stderr, "{prompt}: ");
            let _ = stderr.flush();
        }

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line).map_err(prompt_err)?;
        if read == 0 {
            return Err(CoreError::Operator {
                message: "stdin closed before an answer was given".into(),
            });
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }
}

/// Map a dialoguer / stdin failure into `CoreError`.
fn prompt_err(e: impl std::fmt::Display) -> CoreError {
    CoreError::Operator {
        message: format!("prompt failed: {e}"),
    }
}

impl Operator for ConsoleOperator {
    fn site_name(&mut self) -> Result<String, CoreError> {
        match self.site_name.take() {
            Some(name) => Ok(name),
            None => self.ask(SITE_NAME_PROMPT),
        }
    }

    fn choose_devices(&mut self, unassigned: &[Device]) -> Result<String, CoreError> {
        output::print_output("Unassigned devices:");
        output::print_output(&output::device_table(unassigned));
        self.ask(DEVICES_PROMPT)
    }

    fn step(&mut self, step: Step<'_>) {
        self.printer.progress(&describe(step));
    }
}

/// Progress line for a workflow step.
fn describe(step: Step<'_>) -> String {
    match step {
        Step::CheckingSiteName { name } => format!("Checking that site '{name}' is new..."),
        Step::CreatingSite { name } => format!("Creating site '{name}'..."),
        Step::SiteCreated { site } => format!("Site '{}' created (id {})", site.name, site.id),
        Step::AttachingWlanTemplate { template_id } => {
            format!("Adding site to WLAN template {template_id}...")
        }
        Step::ApplyingVariables { count } => format!("Applying {count} site variable(s)..."),
        Step::FetchingInventory => "Fetching unassigned inventory...".into(),
        Step::ReadingDevicesFile { path } => {
            format!("Reading device MACs from {}", path.display())
        }
        Step::Assigning { site, count } => {
            format!("Assigning {count} device(s) to site '{}'...", site.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use sitebuild_core::Site;

    use super::*;

    #[test]
    fn preset_site_name_is_used_once() {
        let mut op = ConsoleOperator {
            site_name: Some("Branch 7".into()),
            printer: Printer::new(false, true),
            interactive: false,
        };
        assert_eq!(op.site_name().ok().as_deref(), Some("Branch 7"));
        assert!(op.site_name.is_none());
    }

    #[test]
    fn step_descriptions() {
        let site = Site {
            id: "s-1".into(),
            name: "Branch 7".into(),
        };
        assert_eq!(
            describe(Step::Assigning {
                site: &site,
                count: 3
            }),
            "Assigning 3 device(s) to site 'Branch 7'..."
        );
        assert_eq!(
            describe(Step::ReadingDevicesFile {
                path: Path::new("devices.txt")
            }),
            "Reading device MACs from devices.txt"
        );
        assert_eq!(
            describe(Step::AttachingWlanTemplate {
                template_id: "wlan-1"
            }),
            "Adding site to WLAN template wlan-1..."
        );
    }
}
