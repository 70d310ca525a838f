use log::{debug, warn};

use crate::types::{Effect, MAX_COMMAND_LEN};

/// Matches host input against the single read-trigger token
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    token: &'static [u8],
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new("READ_RFID")
    }
}

impl CommandDispatcher {
    pub fn new(token: &'static str) -> Self {
        Self {
            token: token.as_bytes(),
        }
    }

    /// Classify the bytes the transport delivered.
    ///
    /// Only `bytes` is compared, never anything past it. Trailing line
    /// terminators and NUL padding are ignored; what remains must equal the
    /// token exactly and case-sensitively.
    pub fn handle_host_command(&self, bytes: &[u8]) -> Effect {
        if bytes.len() > MAX_COMMAND_LEN {
            warn!("Host command of {} bytes exceeds {} byte limit", bytes.len(), MAX_COMMAND_LEN);
            return Effect::ReportUnknown;
        }

        let command = trim_terminators(bytes);
        if !command.is_empty() && command == self.token {
            debug!("Host requested a read");
            Effect::PerformRead
        } else {
            debug!("No match for host command {:02X?}", bytes);
            Effect::ReportUnknown
        }
    }
}

fn trim_terminators(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| !matches!(b, b'\r' | b'\n' | 0))
        .map_or(0, |i| i + 1);
    &bytes[..end]
}
