//! Hands in-memory content to a child process as a readable path.
//!
//! On Unix-like systems the content is pushed through an anonymous pipe by a
//! writer thread, and the child opens the read end as `/dev/fd/<n>`. Nothing
//! touches the disk. Other platforms fall back to a temporary file that is
//! removed when the pipe is dropped.
//!
//! ```rust,no_run
//! use std::process::Command;
//! use vacuum::lint::StaticContentPipe;
//!
//! # fn main() -> std::io::Result<()> {
//! let pipe = StaticContentPipe::new("my content")?;
//! let mut cmd = Command::new("cat");
//! cmd.arg(pipe.path());
//! pipe.attach(&mut cmd);
//! let output = cmd.output()?;
//! pipe.finish()?;
//! assert_eq!(output.stdout, b"my content");
//! # Ok(())
//! # }
//! ```

#[cfg(unix)]
pub use self::unix::StaticContentPipe;

#[cfg(not(unix))]
pub use self::fallback::StaticContentPipe;

#[cfg(unix)]
mod unix {
    use log::{debug, warn};
    use nix::fcntl::{FcntlArg, FdFlag, fcntl};
    use std::io::{self, PipeReader, Write};
    use std::os::fd::{AsRawFd, RawFd};
    use std::path::{Path, PathBuf};
    use std::thread::{self, JoinHandle};

    pub struct StaticContentPipe {
        reader: Option<PipeReader>,
        fd: RawFd,
        path: PathBuf,
        writer: Option<JoinHandle<io::Result<()>>>,
    }

    impl StaticContentPipe {
        /// Open a pipe and start streaming `content` into its write end.
        pub fn new(content: impl Into<Vec<u8>>) -> io::Result<Self> {
            let content = content.into();
            let (reader, mut writer) = io::pipe()?;
            let fd = reader.as_raw_fd();
            let path = PathBuf::from(format!("/dev/fd/{}", fd));

            let handle = thread::Builder::new()
                .name(format!("StaticContentPipe({})", path.display()))
                .spawn(move || {
                    writer.write_all(&content)?;
                    writer.flush()
                    // writer dropped here, child sees EOF
                })?;

            debug!("Opened static content pipe at {}", path.display());

            Ok(Self {
                reader: Some(reader),
                fd,
                path,
                writer: Some(handle),
            })
        }

        /// Path the child should open to read the content.
        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Read-side descriptor the child inherits.
        pub fn raw_fd(&self) -> RawFd {
            self.fd
        }

        /// Keep the read end open across `exec` in a child spawned from `cmd`.
        pub fn attach(&self, cmd: &mut std::process::Command) {
            use std::os::unix::process::CommandExt;

            let fd = self.fd;
            // SAFETY: the hook only calls fcntl, which is async-signal-safe.
            unsafe {
                cmd.pre_exec(move || keep_open_on_exec(fd));
            }
        }

        /// Same as [`attach`](Self::attach) for a tokio command.
        pub fn attach_async(&self, cmd: &mut tokio::process::Command) {
            let fd = self.fd;
            // SAFETY: the hook only calls fcntl, which is async-signal-safe.
            unsafe {
                cmd.pre_exec(move || keep_open_on_exec(fd));
            }
        }

        /// Close the parent's copy of the read end once the child has it.
        pub fn release_reader(&mut self) {
            self.reader.take();
        }

        /// Wait for the writer thread.
        ///
        /// A child that exits before reading everything leaves a broken pipe
        /// behind; that is not an error here.
        pub fn finish(mut self) -> io::Result<()> {
            self.release_reader();
            let Some(handle) = self.writer.take() else {
                return Ok(());
            };
            let result = handle
                .join()
                .map_err(|_| io::Error::other("static content pipe writer panicked"))?;
            match result {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    warn!("Reader of {} exited before consuming all content", self.path.display());
                    Ok(())
                }
                other => other,
            }
        }
    }

    impl Drop for StaticContentPipe {
        fn drop(&mut self) {
            // Without a reader the writer thread unblocks with EPIPE on its own.
            self.reader.take();
        }
    }

    fn keep_open_on_exec(fd: RawFd) -> io::Result<()> {
        fcntl(fd, FcntlArg::F_SETFD(FdFlag::empty()))
            .map(drop)
            .map_err(io::Error::from)
    }
}

#[cfg(not(unix))]
mod fallback {
    use std::io::{self, Write};
    use std::path::Path;
    use tempfile::NamedTempFile;

    pub struct StaticContentPipe {
        file: NamedTempFile,
    }

    impl StaticContentPipe {
        pub fn new(content: impl Into<Vec<u8>>) -> io::Result<Self> {
            let mut file = NamedTempFile::new()?;
            file.write_all(&content.into())?;
            file.flush()?;
            Ok(Self { file })
        }

        pub fn path(&self) -> &Path {
            self.file.path()
        }

        pub fn attach(&self, _cmd: &mut std::process::Command) {}

        pub fn attach_async(&self, _cmd: &mut tokio::process::Command) {}

        pub fn release_reader(&mut self) {}

        pub fn finish(self) -> io::Result<()> {
            Ok(())
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    fn cat(pipe: &mut StaticContentPipe) -> Vec<u8> {
        let mut cmd = Command::new("cat");
        cmd.arg(pipe.path()).stdout(Stdio::piped());
        pipe.attach(&mut cmd);
        let child = cmd.spawn().unwrap();
        pipe.release_reader();
        let output = child.wait_with_output().unwrap();
        assert!(output.status.success());
        output.stdout
    }

    #[test]
    fn test_child_reads_content_through_dev_fd() {
        let mut pipe = StaticContentPipe::new("my content").unwrap();
        assert!(pipe.path().starts_with("/dev/fd/"));
        assert_eq!(cat(&mut pipe), b"my content");
        pipe.finish().unwrap();
    }

    #[test]
    fn test_content_larger_than_pipe_buffer() {
        let content: Vec<u8> = (0..1_000_000u32).map(|i| b'a' + (i % 26) as u8).collect();
        let mut pipe = StaticContentPipe::new(content.clone()).unwrap();
        assert_eq!(cat(&mut pipe), content);
        pipe.finish().unwrap();
    }

    #[test]
    fn test_child_that_never_reads_is_not_an_error() {
        let content = vec![b'x'; 512 * 1024];
        let mut pipe = StaticContentPipe::new(content).unwrap();
        let mut cmd = Command::new("true");
        pipe.attach(&mut cmd);
        let status = cmd.status().unwrap();
        assert!(status.success());
        pipe.release_reader();
        pipe.finish().unwrap();
    }

    #[test]
    fn test_unattached_child_cannot_open_descriptor() {
        let mut pipe = StaticContentPipe::new("secret").unwrap();
        let output = Command::new("cat")
            .arg(pipe.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .unwrap();
        assert!(!output.status.success());
        pipe.release_reader();
        pipe.finish().unwrap();
    }
}
