use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::net::UnixStream;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::fd::FdSource;

/// Serial device access.
///
/// Line settings (baud rate, parity) are expected to be configured outside
/// this crate, e.g. with `stty`. The device is only opened for reading.
pub struct SerialDevice;

impl SerialDevice {
    /// Open a UART character device (or any readable file) without blocking.
    ///
    /// `O_NOCTTY` keeps a tty from becoming the controlling terminal.
    pub fn open(path: impl AsRef<Path>) -> Result<FdSource<File>> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK | libc::O_NOCTTY)
            .open(path)
            .map_err(|e| TransportError::Open {
                path: path.to_path_buf(),
                source: e,
            })?;
        info!(?path, "opened serial device");
        Ok(FdSource::new(file))
    }
}

/// Maximum socket path length.
/// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on macOS.
#[cfg(target_os = "linux")]
const MAX_SOCKET_PATH_LEN: usize = 108;
#[cfg(not(target_os = "linux"))]
const MAX_SOCKET_PATH_LEN: usize = 104;

/// Connect to a serial-to-socket bridge (e.g. `socat`) on a Unix domain socket.
pub fn connect_bridge(path: impl AsRef<Path>) -> Result<FdSource<UnixStream>> {
    let path = path.as_ref();

    let len = path.as_os_str().len();
    if len >= MAX_SOCKET_PATH_LEN {
        return Err(TransportError::PathTooLong {
            path: path.to_path_buf(),
            len,
            max: MAX_SOCKET_PATH_LEN,
        });
    }

    let stream = UnixStream::connect(path).map_err(|e| TransportError::Connect {
        path: path.to_path_buf(),
        source: e,
    })?;
    stream.set_nonblocking(true)?;
    debug!(?path, "connected to serial bridge socket");
    Ok(FdSource::new(stream))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::os::unix::net::UnixListener;

    use super::*;
    use crate::traits::ByteSource;

    fn unique_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("bender-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn open_missing_device_fails() {
        let err = SerialDevice::open("/nonexistent/ttyBENDER0").unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
    }

    #[test]
    fn open_regular_file_as_device() {
        let dir = unique_dir("device-open");
        let path = dir.join("tty.log");
        std::fs::write(&path, b"B").unwrap();

        let mut source = SerialDevice::open(&path).unwrap();
        assert_eq!(source.read_byte().unwrap(), Some(b'B'));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_overlong_socket_path() {
        let long = format!("/tmp/{}", "x".repeat(200));
        let err = connect_bridge(long).unwrap_err();
        assert!(matches!(err, TransportError::PathTooLong { .. }));
    }

    #[test]
    fn bridge_delivers_bytes() {
        let dir = unique_dir("bridge");
        let sock_path = dir.join("bridge.sock");
        let _ = std::fs::remove_file(&sock_path);
        let listener = UnixListener::bind(&sock_path).unwrap();

        let mut source = connect_bridge(&sock_path).unwrap();
        let (mut server, _addr) = listener.accept().unwrap();
        server.write_all(b"AIN").unwrap();
        drop(server);

        let mut out = Vec::new();
        while !source.is_closed() {
            if let Some(byte) = source.read_byte().unwrap() {
                out.push(byte);
            }
        }
        assert_eq!(out, b"AIN");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
