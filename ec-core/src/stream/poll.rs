use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use std::os::fd::AsFd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// A read will not block: data, end of stream, or a pending error.
    Ready,
    /// Nothing happened within the timeout (or poll was interrupted).
    Idle,
}

/// Wait up to `timeout_ms` for `fd` to become readable.
///
/// A timeout of zero checks once and returns immediately.
pub fn wait_readable<F: AsFd>(fd: &F, timeout_ms: u16) -> nix::Result<Readiness> {
    let mut fds = [PollFd::new(fd.as_fd(), PollFlags::POLLIN)];

    match poll(&mut fds, PollTimeout::from(timeout_ms)) {
        Ok(0) => Ok(Readiness::Idle),
        Ok(_) => {
            let revents = fds[0].revents().unwrap_or(PollFlags::empty());
            if revents.contains(PollFlags::POLLNVAL) {
                return Err(Errno::EBADF);
            }
            if revents.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR) {
                Ok(Readiness::Ready)
            } else {
                Ok(Readiness::Idle)
            }
        }
        // A signal landed mid-poll; let the caller check for shutdown.
        Err(Errno::EINTR) => Ok(Readiness::Idle),
        Err(e) => Err(e),
    }
}
