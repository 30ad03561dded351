//! Terminal output: inventory table, progress lines, final summary.
//!
//! The summary text is built by [`summary_lines`] so it can be tested
//! without a terminal; [`Printer`] only decides where it goes and how it
//! is colored.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use sitebuild_core::{Device, ProvisionOutcome};

use crate::cli::ColorMode;

// ── Color ────────────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Inventory table ──────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "SKU")]
    sku: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            mac: d.mac.clone(),
            serial: or_dash(d.serial.as_deref()),
            device_type: or_dash(d.device_type.as_deref()),
            sku: or_dash(d.sku.as_deref()),
        }
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

/// Render the unassigned inventory as a table.
pub fn device_table(devices: &[Device]) -> String {
    let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Summary ──────────────────────────────────────────────────────────

/// Tone of a summary line, used for coloring only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
}

/// Final report lines for a run that did not fail.
pub fn summary_lines(outcome: &ProvisionOutcome) -> Vec<(Tone, String)> {
    match outcome {
        ProvisionOutcome::NoUnassignedDevices { .. } => vec![(
            Tone::Warning,
            "No unassigned devices in inventory, exiting.".into(),
        )],
        ProvisionOutcome::NothingToAssign { site, .. } => vec![(
            Tone::Warning,
            format!("No devices listed, nothing assigned to site '{}'.", site.name),
        )],
        ProvisionOutcome::DeviceNotInInventory { mac, .. } => vec![(
            Tone::Error,
            format!("Device '{mac}' does not exist in unassigned inventory. Exiting."),
        )],
        ProvisionOutcome::Assigned { site, report, .. } => {
            let mut lines = vec![(
                Tone::Success,
                format!(
                    "Devices added to site '{}': {}",
                    site.name,
                    report.assigned_count()
                ),
            )];
            if report.has_failures() {
                lines.push((
                    Tone::Warning,
                    "The following devices encountered errors:".into(),
                ));
                lines.extend(report.failed.iter().map(|f| {
                    (
                        Tone::Error,
                        format!("Device: '{}' Error: {}", f.mac, f.reason),
                    )
                }));
            }
            lines.push((Tone::Success, "Automated site build complete!".into()));
            lines
        }
    }
}

/// Print pre-rendered output to stdout.
pub fn print_output(output: &str) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Printer ──────────────────────────────────────────────────────────

/// Writes progress to stderr and results to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
    quiet: bool,
}

impl Printer {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    /// One progress line on stderr; suppressed by `--quiet`.
    pub fn progress(&self, message: &str) {
        if self.quiet {
            return;
        }
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{}", message.dimmed());
        } else {
            let _ = writeln!(stderr, "{message}");
        }
    }

    pub fn summary(&self, outcome: &ProvisionOutcome) {
        let mut stdout = io::stdout().lock();
        for (tone, line) in summary_lines(outcome) {
            let _ = match (self.color, tone) {
                (true, Tone::Success) => writeln!(stdout, "{}", line.green()),
                (true, Tone::Warning) => writeln!(stdout, "{}", line.yellow()),
                (true, Tone::Error) => writeln!(stdout, "{}", line.red()),
                (false, _) => writeln!(stdout, "{line}"),
            };
        }
    }
}
