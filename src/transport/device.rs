//! # Printer Device Transport
//!
//! Writes to a printer character device such as `/dev/usb/lp0` (the
//! usblp-class device the kernel exposes for the Microline's USB port).
//!
//! ## Timeout Behavior
//!
//! A deselected printer (SEL light off) stops accepting data, and a plain
//! `write()` would block indefinitely. Each write is therefore preceded by
//! a `poll()` for writability with a timeout; an expired poll surfaces as
//! [`TransportError::Timeout`], which the session layer reports with
//! operator guidance rather than treating as fatal.
//!
//! ## Device Setup (Linux)
//!
//! ```bash
//! # The usblp module creates the device when the printer is plugged in
//! $ ls -l /dev/usb/lp0
//! # Write access usually requires the lp group
//! $ sudo usermod -a -G lp $USER
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::time::Duration;

use super::{Sink, TransportError};

/// Default printer device path
pub const DEFAULT_DEVICE: &str = "/dev/usb/lp0";

/// How long to wait for the device to accept data before reporting a
/// timeout (milliseconds)
const WRITE_TIMEOUT_MS: u64 = 5000;

/// A connection to a physical printer device.
pub struct DeviceTransport {
    file: File,
    write_timeout: Duration,
}

impl DeviceTransport {
    /// Open a printer device for writing.
    ///
    /// ## Errors
    ///
    /// Returns an error if the device does not exist or the process lacks
    /// write permission (usually the `lp` group).
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self, TransportError> {
        let path = device.as_ref();
        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            TransportError::Io(format!("failed to open {}: {}", path.display(), e))
        })?;

        Ok(Self {
            file,
            write_timeout: Duration::from_millis(WRITE_TIMEOUT_MS),
        })
    }

    /// Open with the default device path (/dev/usb/lp0)
    pub fn open_default() -> Result<Self, TransportError> {
        Self::open(DEFAULT_DEVICE)
    }

    /// Set how long a write waits for the device before timing out.
    pub fn set_write_timeout(&mut self, timeout: Duration) {
        self.write_timeout = timeout;
    }
}

impl Sink for DeviceTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        wait_writable(&self.file, self.write_timeout)?;

        self.file
            .write_all(bytes)
            .map_err(|e| TransportError::Io(format!("write failed: {}", e)))?;
        self.file
            .flush()
            .map_err(|e| TransportError::Io(format!("flush failed: {}", e)))?;

        Ok(())
    }
}

/// Poll the device for writability, with a timeout.
#[cfg(unix)]
fn wait_writable(file: &File, timeout: Duration) -> Result<(), TransportError> {
    let mut pollfd = libc::pollfd {
        fd: file.as_raw_fd(),
        events: libc::POLLOUT,
        revents: 0,
    };

    let rc = unsafe { libc::poll(&mut pollfd, 1, timeout.as_millis() as i32) };
    if rc < 0 {
        return Err(TransportError::Io(format!(
            "poll failed: {}",
            io::Error::last_os_error()
        )));
    }
    if rc == 0 {
        return Err(TransportError::Timeout);
    }
    if pollfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
        return Err(TransportError::Io(format!(
            "device reported error state (revents {:#x})",
            pollfd.revents
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn wait_writable(_file: &File, _timeout: Duration) -> Result<(), TransportError> {
    // No poll() on this platform; rely on the blocking write
    Ok(())
}
