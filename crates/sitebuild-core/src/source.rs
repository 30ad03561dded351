// ── Device list source ──
//
// A devices file in the working directory wins; otherwise the operator is
// shown the unassigned inventory and asked for a comma-separated list.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CoreError;
use crate::mac::split_operator_input;
use crate::model::Device;
use crate::provision::{Operator, Step};

/// Devices file looked up in the working directory.
pub const DEFAULT_DEVICES_FILE: &str = "devices.txt";

/// Where the raw MAC list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSource {
    File(PathBuf),
    Prompt,
}

/// Produce the raw (unvalidated) MAC list for this run.
///
/// If `path` can be read, each line is one entry; a final line terminator
/// does not produce an extra empty entry. Any read failure (missing file,
/// permissions, invalid UTF-8) falls through to the operator prompt.
pub fn resolve_device_list<O: Operator + ?Sized>(
    path: &Path,
    unassigned: &[Device],
    operator: &mut O,
) -> Result<(DeviceSource, Vec<String>), CoreError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            operator.step(Step::ReadingDevicesFile { path });
            let lines = contents.lines().map(str::to_owned).collect();
            Ok((DeviceSource::File(path.to_path_buf()), lines))
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "devices file unavailable, prompting");
            let input = operator.choose_devices(unassigned)?;
            Ok((DeviceSource::Prompt, split_operator_input(&input)))
        }
    }
}
