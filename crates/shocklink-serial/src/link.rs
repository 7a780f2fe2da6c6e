use std::io::{ErrorKind, Read, Write};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use tracing::{debug, info, warn};

use shocklink_proto::{
    command_payload, decode_frame, encode_frame, DeviceIndex, Frame, ReceiverKind, WireAction,
};

use crate::error::{Result, SerialError};
use crate::registry::DeviceRegistry;

const INITIAL_BUFFER_CAPACITY: usize = 256;
const READ_CHUNK_SIZE: usize = 256;

/// The stream type produced by [`ArduinoLink::open`].
pub type SerialStream = Box<dyn serialport::SerialPort>;

/// Configuration for the serial link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Baud rate of the firmware's serial console.
    pub baud_rate: u32,
    /// How long to wait for the acknowledgement of a single request.
    pub ack_timeout: Duration,
    /// How long to wait for the BOOTED frame after sending BOOT.
    pub boot_timeout: Duration,
    /// Settling time after opening the port. Opening the port resets the
    /// board, so nothing useful happens on the wire until this has passed.
    pub boot_grace: Duration,
    /// I/O-level timeout of a single blocking read on the port.
    pub read_timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            ack_timeout: Duration::from_secs(5),
            boot_timeout: Duration::from_secs(10),
            boot_grace: Duration::from_secs(1),
            read_timeout: Duration::from_millis(100),
        }
    }
}

/// Exclusive link to the companion firmware.
///
/// All access to the underlying stream is serialized through one lock held
/// for the full write-then-drain cycle; frames reach the firmware in exactly
/// the order callers acquire the lock. The boot handshake runs at
/// construction time, so every `ArduinoLink` in existence is usable.
#[derive(Debug)]
pub struct ArduinoLink<T> {
    inner: Mutex<LinkInner<T>>,
    config: LinkConfig,
}

#[derive(Debug)]
struct LinkInner<T> {
    stream: T,
    buf: BytesMut,
    out: BytesMut,
    registry: DeviceRegistry,
}

impl ArduinoLink<SerialStream> {
    /// Open the firmware's serial port and perform the boot handshake.
    pub fn open(port: &str, config: LinkConfig) -> Result<Self> {
        let stream = serialport::new(port, config.baud_rate)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| SerialError::Open {
                port: port.to_string(),
                source,
            })?;
        debug!(port, baud = config.baud_rate, "serial port opened");

        // The board resets when the host opens the port. Wait it out, then
        // discard whatever the bootloader printed before our handshake.
        thread::sleep(config.boot_grace);
        stream.clear(serialport::ClearBuffer::Input)?;

        Self::over_stream(stream, config)
    }
}

impl<T: Read + Write> ArduinoLink<T> {
    /// Wrap an already-connected byte stream and perform the boot handshake.
    ///
    /// The stream must behave like a serial port: reads return whatever is
    /// buffered and time out (`TimedOut`/`WouldBlock`) rather than blocking
    /// forever when nothing is. This is the seam the protocol tests use.
    pub fn over_stream(stream: T, config: LinkConfig) -> Result<Self> {
        let link = Self {
            inner: Mutex::new(LinkInner {
                stream,
                buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
                out: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
                registry: DeviceRegistry::new(),
            }),
            config,
        };

        {
            let mut inner = link.lock()?;
            inner.write_frame(WireAction::Boot.code(), &[])?;
            inner.drain_until(WireAction::Booted, link.config.boot_timeout)?;
            // The firmware acks its own boot report; leaving that frame
            // buffered would desynchronize the first real request.
            inner.drain_until(WireAction::Acknowledge, link.config.ack_timeout)?;
        }
        info!("firmware boot handshake complete");

        Ok(link)
    }

    /// Send a stimulation command to a registered receiver.
    pub fn command(
        &self,
        action: WireAction,
        index: DeviceIndex,
        power: u8,
        duration_ms: u16,
    ) -> Result<()> {
        debug!(%action, %index, power, duration_ms, "sending command");
        self.request(action, &command_payload(index, power, duration_ms))
    }

    /// Describe a receiver to the firmware and allocate its index.
    ///
    /// The firmware does not return an index; assignment is purely local and
    /// relies on the ADD frames reaching it in allocation order, which is why
    /// both happen under one lock acquisition.
    pub fn register_receiver(
        &self,
        kind: ReceiverKind,
        arg1: u8,
        arg2: u8,
        arg3: u8,
    ) -> Result<DeviceIndex> {
        let mut inner = self.lock()?;
        inner.write_frame(WireAction::Add.code(), &[kind.code(), arg1, arg2, arg3])?;
        inner.drain_until(WireAction::Acknowledge, self.config.ack_timeout)?;
        let index = inner.registry.allocate()?;
        info!(%index, ?kind, "receiver registered");
        Ok(index)
    }

    /// Liveness probe: send PING and wait for the firmware's PONG.
    pub fn ping(&self) -> Result<()> {
        let mut inner = self.lock()?;
        inner.write_frame(WireAction::Ping.code(), &[])?;
        inner.drain_until(WireAction::Pong, self.config.ack_timeout)
    }

    /// Write one frame and wait for its acknowledgement.
    pub fn request(&self, action: WireAction, payload: &[u8]) -> Result<()> {
        let mut inner = self.lock()?;
        inner.write_frame(action.code(), payload)?;
        inner.drain_until(WireAction::Acknowledge, self.config.ack_timeout)
    }

    /// Number of receivers registered on this link.
    pub fn registered_receivers(&self) -> Result<u16> {
        Ok(self.lock()?.registry.count())
    }

    /// The link's configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Consume the link and return the underlying stream.
    pub fn into_stream(self) -> Result<T> {
        self.inner
            .into_inner()
            .map(|inner| inner.stream)
            .map_err(|_| SerialError::Poisoned)
    }

    fn lock(&self) -> Result<MutexGuard<'_, LinkInner<T>>> {
        self.inner.lock().map_err(|_| SerialError::Poisoned)
    }
}

impl<T: Read + Write> LinkInner<T> {
    fn write_frame(&mut self, code: u8, payload: &[u8]) -> Result<()> {
        self.out.clear();
        encode_frame(code, payload, &mut self.out)?;

        let mut offset = 0usize;
        while offset < self.out.len() {
            match self.stream.write(&self.out[offset..]) {
                Ok(0) => return Err(SerialError::Disconnected),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(SerialError::Io(err)),
            }
        }
        loop {
            match self.stream.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(SerialError::Io(err)),
            }
        }
    }

    /// Drain incoming frames until one carrying `stop` arrives.
    ///
    /// Anything else received in the meantime is a diagnostic: logged and
    /// discarded. This drain is the protocol's flow control — every write is
    /// followed by exactly one matching stop-code event.
    fn drain_until(&mut self, stop: WireAction, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        let deadline = start + timeout;

        loop {
            while let Some(frame) = decode_frame(&mut self.buf) {
                if frame.code == stop.code() {
                    return Ok(());
                }
                log_diagnostic(&frame);
            }

            if Instant::now() >= deadline {
                return Err(SerialError::AckTimeout {
                    waiting_for: stop,
                    elapsed: start.elapsed(),
                });
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(SerialError::Disconnected),
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::TimedOut => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(SerialError::Io(err)),
            }
        }
    }
}

fn log_diagnostic(frame: &Frame) {
    let text = String::from_utf8_lossy(&frame.payload);
    match frame.action() {
        Some(WireAction::Debug) => debug!(%text, "firmware debug"),
        Some(WireAction::Error) => warn!(%text, "firmware reported an error"),
        Some(WireAction::Crash) => warn!(%text, "firmware reported a crash"),
        Some(action) => debug!(%action, %text, "unexpected frame while draining"),
        None => debug!(code = frame.code, %text, "unknown frame while draining"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// What a scripted port does once its input script runs dry.
    #[derive(Clone, Copy, PartialEq, Debug)]
    enum OnEmpty {
        WouldBlock,
        Eof,
    }

    /// In-memory stand-in for the serial port: reads from a pre-loaded
    /// script, captures everything written.
    #[derive(Debug)]
    struct ScriptedPort {
        input: VecDeque<u8>,
        written: Vec<u8>,
        on_empty: OnEmpty,
    }

    impl ScriptedPort {
        fn new(script: &[u8], on_empty: OnEmpty) -> Self {
            Self {
                input: script.iter().copied().collect(),
                written: Vec::new(),
                on_empty,
            }
        }
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let Some(byte) = self.input.pop_front() else {
                return match self.on_empty {
                    OnEmpty::WouldBlock => Err(std::io::Error::from(ErrorKind::WouldBlock)),
                    OnEmpty::Eof => Ok(0),
                };
            };
            // One byte at a time, to exercise partial-read handling.
            buf[0] = byte;
            Ok(1)
        }
    }

    impl Write for ScriptedPort {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn frame(code: u8, payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![code, payload.len() as u8];
        bytes.extend_from_slice(payload);
        bytes
    }

    fn boot_script() -> Vec<u8> {
        let mut script = frame(WireAction::Debug.code(), b"arshock 1.2");
        script.extend(frame(WireAction::Booted.code(), &[]));
        script.extend(frame(WireAction::Acknowledge.code(), &[]));
        script
    }

    fn test_config() -> LinkConfig {
        LinkConfig {
            ack_timeout: Duration::from_millis(50),
            boot_timeout: Duration::from_millis(50),
            ..LinkConfig::default()
        }
    }

    #[test]
    fn boot_handshake_sends_boot_and_drains_booted() {
        let port = ScriptedPort::new(&boot_script(), OnEmpty::WouldBlock);
        let link = ArduinoLink::over_stream(port, test_config()).unwrap();

        let port = link.into_stream().unwrap();
        assert_eq!(port.written, [WireAction::Boot.code(), 0]);
    }

    #[test]
    fn boot_times_out_without_booted_frame() {
        let port = ScriptedPort::new(&[], OnEmpty::WouldBlock);
        let err = ArduinoLink::over_stream(port, test_config()).unwrap_err();
        assert!(matches!(
            err,
            SerialError::AckTimeout {
                waiting_for: WireAction::Booted,
                ..
            }
        ));
    }

    #[test]
    fn boot_surfaces_eof_as_disconnected() {
        let port = ScriptedPort::new(&[], OnEmpty::Eof);
        let err = ArduinoLink::over_stream(port, test_config()).unwrap_err();
        assert!(matches!(err, SerialError::Disconnected));
    }

    #[test]
    fn command_writes_exact_frame_and_waits_for_ack() {
        let mut script = boot_script();
        script.extend(frame(WireAction::Acknowledge.code(), &[]));

        let port = ScriptedPort::new(&script, OnEmpty::WouldBlock);
        let link = ArduinoLink::over_stream(port, test_config()).unwrap();

        link.command(WireAction::Vibrate, DeviceIndex::new(1), 55, 300)
            .unwrap();

        let port = link.into_stream().unwrap();
        assert_eq!(port.written[2..], [12, 4, 1, 55, 1, 44]);
    }

    #[test]
    fn error_frames_before_ack_are_tolerated() {
        let mut script = boot_script();
        script.extend(frame(WireAction::Error.code(), b"pin conflict"));
        script.extend(frame(WireAction::Debug.code(), b"retrying"));
        script.extend(frame(WireAction::Acknowledge.code(), &[]));

        let port = ScriptedPort::new(&script, OnEmpty::WouldBlock);
        let link = ArduinoLink::over_stream(port, test_config()).unwrap();

        link.command(WireAction::Beep, DeviceIndex::new(0), 0, 0)
            .unwrap();
    }

    #[test]
    fn missing_ack_times_out() {
        let port = ScriptedPort::new(&boot_script(), OnEmpty::WouldBlock);
        let link = ArduinoLink::over_stream(port, test_config()).unwrap();

        let err = link
            .command(WireAction::Shock, DeviceIndex::new(0), 10, 500)
            .unwrap_err();
        assert!(matches!(
            err,
            SerialError::AckTimeout {
                waiting_for: WireAction::Acknowledge,
                ..
            }
        ));
    }

    #[test]
    fn registration_allocates_in_order_and_frames_add() {
        let mut script = boot_script();
        script.extend(frame(WireAction::Acknowledge.code(), &[]));
        script.extend(frame(WireAction::Acknowledge.code(), &[]));

        let port = ScriptedPort::new(&script, OnEmpty::WouldBlock);
        let link = ArduinoLink::over_stream(port, test_config()).unwrap();

        let first = link
            .register_receiver(ReceiverKind::Petainer, 0xAB, 0xCD, 1)
            .unwrap();
        let second = link
            .register_receiver(ReceiverKind::Optocoupler, 2, 3, 4)
            .unwrap();
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(link.registered_receivers().unwrap(), 2);

        let port = link.into_stream().unwrap();
        let after_boot = &port.written[2..];
        assert_eq!(after_boot[..6], [102, 4, 0, 0xAB, 0xCD, 1]);
        assert_eq!(after_boot[6..], [102, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn ping_waits_for_pong() {
        let mut script = boot_script();
        script.extend(frame(WireAction::Debug.code(), b"uptime 42s"));
        script.extend(frame(WireAction::Pong.code(), &[]));

        let port = ScriptedPort::new(&script, OnEmpty::WouldBlock);
        let link = ArduinoLink::over_stream(port, test_config()).unwrap();
        link.ping().unwrap();

        let port = link.into_stream().unwrap();
        assert_eq!(port.written[2..], [WireAction::Ping.code(), 0]);
    }
}
