//! Host-facing report lines and the fire-and-forget writer that delivers them

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, error, warn};

use crate::transport::HostTransport;
use crate::types::{BridgeError, ReadOutcome, TAG_ID_LEN};

pub const TAG_LABEL: &str = "RFID Tag ID: ";
pub const LINE_END: &str = "\r\n";
pub const READ_FAILED: &str = "Error reading RFID data";
pub const COMMAND_FAILED: &str = "Error sending command to RFID";
pub const UNKNOWN_COMMAND: &str = "Unknown command received";

/// Label, three characters per identifier byte, terminator
pub const REPORT_CAPACITY: usize = TAG_LABEL.len() + 3 * TAG_ID_LEN + LINE_END.len();

/// One line of text for the host
pub type Report = heapless::String<REPORT_CAPACITY>;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Render a read outcome as the line the host expects
pub fn format_outcome(outcome: &ReadOutcome) -> Report {
    let mut report = Report::new();
    match outcome {
        ReadOutcome::Success(tag) => {
            push_truncating(&mut report, TAG_LABEL);
            for &byte in tag.as_bytes() {
                push_truncating(&mut report, hex_group(byte).as_str());
            }
        }
        ReadOutcome::ReadFailed => push_truncating(&mut report, READ_FAILED),
        ReadOutcome::CommandFailed => push_truncating(&mut report, COMMAND_FAILED),
    }
    push_truncating(&mut report, LINE_END);
    report
}

pub fn unknown_command() -> Report {
    let mut report = Report::new();
    push_truncating(&mut report, UNKNOWN_COMMAND);
    push_truncating(&mut report, LINE_END);
    report
}

fn hex_group(byte: u8) -> heapless::String<3> {
    let mut group = heapless::String::new();
    for ch in [
        HEX_DIGITS[(byte >> 4) as usize] as char,
        HEX_DIGITS[(byte & 0x0F) as usize] as char,
        ' ',
    ] {
        let _ = group.push(ch);
    }
    group
}

/// Append `text`, stopping at the capacity boundary
fn push_truncating<const N: usize>(report: &mut heapless::String<N>, text: &str) {
    for ch in text.chars() {
        if report.push(ch).is_err() {
            warn!("Report truncated at {} bytes", N);
            return;
        }
    }
}

/// Queue of report lines drained by a dedicated writer thread.
///
/// Submitting never blocks: when the host stops draining and the queue is
/// full, new reports are dropped and the failure is returned to the caller.
pub struct Reporter {
    tx: Option<Sender<Report>>,
    worker: Option<JoinHandle<()>>,
}

impl Reporter {
    /// Start the writer thread that owns `host`
    pub fn spawn<H>(host: H, queue_depth: usize) -> Result<Self, BridgeError>
    where
        H: HostTransport + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(queue_depth.max(1));
        let worker = thread::Builder::new()
            .name("host-writer".into())
            .spawn(move || Self::drain(host, rx))
            .map_err(|e| BridgeError::Init(format!("host writer: {:?}", e)))?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Hand a report to the writer thread
    pub fn submit(&self, report: Report) -> Result<(), BridgeError> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| BridgeError::ReportDelivery("reporter stopped".into()))?;
        tx.try_send(report).map_err(|e| match e {
            TrySendError::Full(_) => BridgeError::ReportDelivery("report queue full".into()),
            TrySendError::Disconnected(_) => {
                BridgeError::ReportDelivery("host writer stopped".into())
            }
        })
    }

    /// Flush queued reports and stop the writer thread
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Host writer thread panicked");
            }
        }
    }

    fn drain<H: HostTransport>(mut host: H, rx: Receiver<Report>) {
        for report in rx.iter() {
            if let Err(e) = deliver(&mut host, report.as_bytes()) {
                warn!("Dropping report {:?}: {}", report.as_str().trim_end(), e);
            }
        }
        debug!("Report queue closed");
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.stop();
    }
}

fn deliver<H: HostTransport>(host: &mut H, mut data: &[u8]) -> Result<(), BridgeError> {
    while !data.is_empty() {
        let written = host
            .write(data)
            .map_err(|e| BridgeError::ReportDelivery(format!("{:?}", e)))?;
        if written == 0 {
            return Err(BridgeError::ReportDelivery("host accepted no bytes".into()));
        }
        data = &data[written.min(data.len())..];
    }
    Ok(())
}
