//! Classification of "connection refused" errors.

use std::{error::Error, io};

/// `WSAECONNREFUSED`, the Winsock refusal code.
#[cfg(windows)]
const WSAECONNREFUSED: i32 = 10061;

/// Whether `err`, or anything in its source chain, is a refused connection.
///
/// A refused connection means nothing was listening, which callers stopping
/// a service treat as success.
pub fn is_connection_refused(err: &(dyn Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if is_refused_io(io_err) {
                return true;
            }
            // io::Error::source skips a wrapped custom error, so look inside.
            if let Some(inner) = io_err.get_ref() {
                if is_connection_refused(inner) {
                    return true;
                }
            }
        }
        current = e.source();
    }
    false
}

fn is_refused_io(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::ConnectionRefused {
        return true;
    }
    #[cfg(windows)]
    if err.raw_os_error() == Some(WSAECONNREFUSED) {
        return true;
    }
    false
}
