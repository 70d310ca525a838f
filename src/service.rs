//! Polling service: the periodic trigger and inbound host commands feed one
//! worker thread, which performs their reads one at a time.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError, select};
use log::{debug, info, warn};

use crate::bridge::RfidBridge;
use crate::transport::{BusTransport, HostTransport};
use crate::types::{BridgeError, HostCommand, MAX_COMMAND_LEN, ReadOutcome};

/// Depth of the inbound command queue
const REQUEST_QUEUE_DEPTH: usize = 8;

/// Timeout of a single host read while pumping commands
const HOST_READ_TIMEOUT_MS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Reading,
}

/// Periodic trigger: `Idle -> Reading -> Idle` once per tick.
///
/// Every outcome returns the machine to `Idle`, so polling never stops on
/// a failed read.
#[derive(Debug)]
pub struct Poller {
    state: PollState,
    cycles: u64,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new()
    }
}

impl Poller {
    pub fn new() -> Self {
        Self {
            state: PollState::Idle,
            cycles: 0,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Completed read cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn on_tick<B: BusTransport>(&mut self, bridge: &RfidBridge<B>) -> ReadOutcome {
        self.state = PollState::Reading;
        let outcome = bridge.perform_read();
        self.state = PollState::Idle;
        self.cycles += 1;
        debug!("Poll cycle {} finished: {:?}", self.cycles, outcome);
        outcome
    }
}

#[derive(Debug)]
enum Request {
    Command(HostCommand),
    Oversized(usize),
    Shutdown,
}

/// Cloneable handle for submitting host commands to a running [`Service`]
#[derive(Clone)]
pub struct CommandHandle {
    tx: Sender<Request>,
    alive: Receiver<()>,
}

impl CommandHandle {
    /// Queue one host command. Blocks only while the request queue is full.
    pub fn submit(&self, bytes: &[u8]) -> Result<(), BridgeError> {
        let request = match HostCommand::new(bytes) {
            Ok(command) => Request::Command(command),
            Err(BridgeError::CommandTooLong(len)) => Request::Oversized(len),
            Err(e) => return Err(e),
        };
        self.tx
            .send(request)
            .map_err(|_| BridgeError::Stopped)
    }

    /// Read commands from `host` until the service stops or the host fails.
    ///
    /// A command ends at a line terminator, or when the host goes quiet for
    /// one read timeout with bytes pending (packet-style transports).
    pub fn pump<H: HostTransport>(&self, host: &mut H) -> Result<(), BridgeError> {
        let mut pending: heapless::Vec<u8, MAX_COMMAND_LEN> = heapless::Vec::new();
        let mut overflow = 0usize;
        let mut buf = [0u8; MAX_COMMAND_LEN];

        loop {
            if let Err(TryRecvError::Disconnected) = self.alive.try_recv() {
                debug!("Service stopped, no longer reading host commands");
                return Ok(());
            }

            let read = host
                .read(&mut buf, HOST_READ_TIMEOUT_MS)
                .map_err(|e| BridgeError::ReportDelivery(format!("host read: {:?}", e)))?;

            if read == 0 {
                if !pending.is_empty() || overflow > 0 {
                    self.flush(&mut pending, &mut overflow)?;
                }
                continue;
            }

            for &byte in &buf[..read.min(buf.len())] {
                if matches!(byte, b'\r' | b'\n') {
                    if !pending.is_empty() || overflow > 0 {
                        self.flush(&mut pending, &mut overflow)?;
                    }
                } else if overflow > 0 || pending.push(byte).is_err() {
                    overflow += 1;
                }
            }
        }
    }

    fn flush(
        &self,
        pending: &mut heapless::Vec<u8, MAX_COMMAND_LEN>,
        overflow: &mut usize,
    ) -> Result<(), BridgeError> {
        let request = if *overflow > 0 {
            Request::Oversized(pending.len() + *overflow)
        } else {
            match HostCommand::new(pending.as_slice()) {
                Ok(command) => Request::Command(command),
                Err(_) => Request::Oversized(pending.len()),
            }
        };
        pending.clear();
        *overflow = 0;
        self.tx
            .send(request)
            .map_err(|_| BridgeError::Stopped)
    }
}

/// Worker thread running the poll loop for one bridge
pub struct Service<B: BusTransport> {
    tx: Sender<Request>,
    alive: Receiver<()>,
    worker: Option<JoinHandle<RfidBridge<B>>>,
}

impl<B> Service<B>
where
    B: BusTransport + Send + 'static,
{
    /// Start polling every `interval` and accepting host commands
    pub fn spawn(bridge: RfidBridge<B>, interval: Duration) -> Result<Self, BridgeError> {
        let (tx, rx) = crossbeam_channel::bounded(REQUEST_QUEUE_DEPTH);
        // Dropped when the worker exits, which disconnects every handle's `alive`.
        let (alive_tx, alive) = crossbeam_channel::bounded::<()>(0);
        let worker = thread::Builder::new()
            .name("rfid-poll".into())
            .spawn(move || {
                let _alive = alive_tx;
                Self::run(bridge, interval, rx)
            })
            .map_err(|e| BridgeError::Init(format!("poll worker: {:?}", e)))?;

        info!("Polling every {:?}", interval);
        Ok(Self {
            tx,
            alive,
            worker: Some(worker),
        })
    }

    pub fn commands(&self) -> CommandHandle {
        CommandHandle {
            tx: self.tx.clone(),
            alive: self.alive.clone(),
        }
    }

    /// Stop the worker after the request in progress and hand the bridge back
    pub fn shutdown(mut self) -> Result<RfidBridge<B>, BridgeError> {
        let _ = self.tx.send(Request::Shutdown);
        let worker = self
            .worker
            .take()
            .ok_or(BridgeError::Stopped)?;
        worker
            .join()
            .map_err(|_| BridgeError::Stopped)
    }

    fn run(bridge: RfidBridge<B>, interval: Duration, requests: Receiver<Request>) -> RfidBridge<B> {
        let ticks = crossbeam_channel::tick(interval);
        let mut poller = Poller::new();

        loop {
            select! {
                recv(ticks) -> _ => {
                    poller.on_tick(&bridge);
                }
                recv(requests) -> request => match request {
                    Ok(Request::Command(command)) => {
                        bridge.handle_host_command(command.as_bytes());
                    }
                    Ok(Request::Oversized(len)) => {
                        warn!("{}", BridgeError::CommandTooLong(len));
                        bridge.report_unknown();
                    }
                    Ok(Request::Shutdown) | Err(_) => break,
                },
            }
        }

        info!("Poll worker stopped after {} cycles", poller.cycles());
        bridge
    }
}

impl<B: BusTransport> Drop for Service<B> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.tx.send(Request::Shutdown);
            let _ = worker.join();
        }
    }
}
