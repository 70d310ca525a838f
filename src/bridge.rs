use std::sync::{Mutex, PoisonError, TryLockError};

use log::{info, warn};

use crate::config::BridgeConfig;
use crate::dispatcher::CommandDispatcher;
use crate::reader::TagReader;
use crate::report::{self, Report, Reporter};
use crate::transport::{BusTransport, HostTransport};
use crate::types::{BridgeError, Effect, ReadOutcome};

/// Ties the tag reader, the command dispatcher and the host reporter together.
///
/// The reader sits behind a single lock, so reads requested from different
/// threads (polling tick, host command) never interleave on the bus.
pub struct RfidBridge<B: BusTransport> {
    reader: Mutex<TagReader<B>>,
    dispatcher: CommandDispatcher,
    reporter: Reporter,
}

impl<B: BusTransport> RfidBridge<B> {
    /// Build a bridge and start the host writer thread
    pub fn new<H>(bus: B, host: H, config: &BridgeConfig) -> Result<Self, BridgeError>
    where
        H: HostTransport + Send + 'static,
    {
        let reporter = Reporter::spawn(host, config.report_queue_depth)?;
        info!(
            "Bridge ready: sensor 0x{:02X}, command {:?}",
            config.address, config.command_token
        );
        Ok(Self::from_parts(
            TagReader::with_config(bus, config),
            CommandDispatcher::new(config.command_token),
            reporter,
        ))
    }

    pub fn from_parts(reader: TagReader<B>, dispatcher: CommandDispatcher, reporter: Reporter) -> Self {
        Self {
            reader: Mutex::new(reader),
            dispatcher,
            reporter,
        }
    }

    /// Read a tag and report the outcome, waiting for any read in flight
    pub fn perform_read(&self) -> ReadOutcome {
        let mut reader = self.reader.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_and_report(&mut reader)
    }

    /// Like [`perform_read`](Self::perform_read) but rejects with
    /// [`BridgeError::Busy`] instead of waiting. Nothing is reported then.
    pub fn try_perform_read(&self) -> Result<ReadOutcome, BridgeError> {
        let mut reader = match self.reader.try_lock() {
            Ok(reader) => reader,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(BridgeError::Busy),
        };
        Ok(self.read_and_report(&mut reader))
    }

    /// Dispatch a host command and carry out its effect
    pub fn handle_host_command(&self, bytes: &[u8]) -> Effect {
        let effect = self.dispatcher.handle_host_command(bytes);
        match effect {
            Effect::PerformRead => {
                self.perform_read();
            }
            Effect::ReportUnknown => {
                warn!("{}: {:?}", BridgeError::UnknownHostCommand, String::from_utf8_lossy(bytes));
                self.report_unknown();
            }
        }
        effect
    }

    /// Send the unknown-command line to the host
    pub fn report_unknown(&self) {
        self.send(report::unknown_command());
    }

    /// Stop the host writer after flushing queued reports, returning the bus
    pub fn shutdown(self) -> B {
        self.reporter.shutdown();
        self.reader
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .release()
    }

    fn read_and_report(&self, reader: &mut TagReader<B>) -> ReadOutcome {
        let outcome = reader.attempt_read();
        self.send(report::format_outcome(&outcome));
        outcome
    }

    fn send(&self, report: Report) {
        if let Err(e) = self.reporter.submit(report) {
            warn!("Report not delivered: {}", e);
        }
    }
}
