use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
const EXDEV: i32 = 18;
#[cfg(windows)]
const EXDEV: i32 = 17; // ERROR_NOT_SAME_DEVICE

/// How a sorted file gets to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateMode {
    Move,
    Copy,
    HardLink,
    SymLink,
}

impl RelocateMode {
    pub fn name(self) -> &'static str {
        match self {
            RelocateMode::Move => "move",
            RelocateMode::Copy => "copy",
            RelocateMode::HardLink => "hard link",
            RelocateMode::SymLink => "symlink",
        }
    }

    /// Present participle for log lines.
    pub fn verb(self) -> &'static str {
        match self {
            RelocateMode::Move => "Moving",
            RelocateMode::Copy => "Copying",
            RelocateMode::HardLink | RelocateMode::SymLink => "Linking",
        }
    }
}

/// Puts a file at its destination. The destination's parent exists. An
/// existing destination is only ever passed with `Move`, which replaces it.
pub trait Relocator: Send + Sync {
    fn relocate(&self, mode: RelocateMode, src: &Path, dst: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRelocator;

impl Relocator for FsRelocator {
    fn relocate(&self, mode: RelocateMode, src: &Path, dst: &Path) -> io::Result<()> {
        match mode {
            RelocateMode::Move => match fs::rename(src, dst) {
                Err(e) if crosses_devices(&e) => {
                    log::debug!("rename across devices, copying '{}'", src.display());
                    let staged = staging_path(dst);
                    if let Err(e) = fs::copy(src, &staged).and_then(|_| fs::rename(&staged, dst)) {
                        let _ = fs::remove_file(&staged);
                        return Err(e);
                    }
                    fs::remove_file(src)
                }
                other => other,
            },
            RelocateMode::Copy => fs::copy(src, dst).map(|_| ()),
            RelocateMode::HardLink => fs::hard_link(src, dst),
            RelocateMode::SymLink => symlink(&src.canonicalize()?, dst),
        }
    }
}

/// `Foo S01E02.mp4` -> `Foo S01E02.mp4.mediasort-tmp`, next to the original.
pub fn staging_path(dst: &Path) -> PathBuf {
    let mut name = dst.file_name().unwrap_or_default().to_os_string();
    name.push(".mediasort-tmp");
    dst.with_file_name(name)
}

fn crosses_devices(e: &io::Error) -> bool {
    e.raw_os_error() == Some(EXDEV)
}

#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Whether two existing paths are the same file (hard links included).
#[cfg(unix)]
pub fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;
    let (a, b) = (fs::metadata(a)?, fs::metadata(b)?);
    Ok(a.dev() == b.dev() && a.ino() == b.ino())
}

#[cfg(not(unix))]
pub fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(a.canonicalize()? == b.canonicalize()?)
}
