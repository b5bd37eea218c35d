//! [`Vfs`] implementation over an SD card with `embedded-sdmmc`.
//!
//! The shell works in absolute `/`-separated paths while the FAT library
//! opens directories one name at a time, so every lookup walks the path
//! segment by segment from the root, closing each parent as it goes.

use core::fmt::Write;

use embedded_sdmmc::{
    BlockDevice, Error as SdError, Mode, RawDirectory, RawFile, RawVolume, TimeSource, Timestamp,
    VolumeIdx, VolumeManager,
};
use sd_shell::fs::{Attributes, DirEntry, ErrorCode, FatDate, FatTime, Vfs};

/// The card slot has no RTC behind it, so new timestamps pin to the FAT
/// epoch. The shell only reads the card, so these never land on disk.
pub struct NullTime;

impl TimeSource for NullTime {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 10,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// Open directory handle with a listing cursor.
pub struct SdDir {
    raw: RawDirectory,
    pos: usize,
}

/// Open file handle.
pub struct SdFile {
    raw: RawFile,
}

/// Mounted first volume of an SD card.
pub struct SdVfs<D>
where
    D: BlockDevice,
{
    mgr: VolumeManager<D, NullTime>,
    volume: RawVolume,
}

impl<D> SdVfs<D>
where
    D: BlockDevice,
{
    /// Take ownership of the block device and mount the first partition.
    pub fn mount(device: D) -> Result<Self, ErrorCode> {
        let mut mgr = VolumeManager::new(device, NullTime);
        let volume = mgr.open_raw_volume(VolumeIdx(0)).map_err(map_err)?;
        Ok(SdVfs { mgr, volume })
    }

    /// Open the directory named by an absolute path, one segment at a time.
    fn walk(&mut self, path: &str) -> Result<RawDirectory, ErrorCode> {
        let mut dir = self.mgr.open_root_dir(self.volume).map_err(map_err)?;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let child = match self.mgr.open_dir(dir, segment) {
                Ok(child) => child,
                Err(e) => {
                    let _ = self.mgr.close_dir(dir);
                    return Err(map_err(e));
                }
            };
            let _ = self.mgr.close_dir(dir);
            dir = child;
        }
        Ok(dir)
    }
}

impl<D> Vfs for SdVfs<D>
where
    D: BlockDevice,
{
    type Dir = SdDir;
    type File = SdFile;

    fn open_dir(&mut self, path: &str) -> Result<SdDir, ErrorCode> {
        let raw = self.walk(path)?;
        Ok(SdDir { raw, pos: 0 })
    }

    fn read_entry(&mut self, dir: &mut SdDir) -> Result<Option<DirEntry>, ErrorCode> {
        // The library only offers a callback iterator, so each pull rescans
        // the directory up to the cursor. Listings are short enough that the
        // rescan cost does not show at serial speeds.
        let wanted = dir.pos;
        let mut seen = 0;
        let mut found = None;
        self.mgr
            .iterate_dir(dir.raw, |entry| {
                if entry.attributes.is_volume() || entry.attributes.is_lfn() {
                    return;
                }
                if seen == wanted && found.is_none() {
                    found = Some(convert_entry(entry));
                }
                seen += 1;
            })
            .map_err(map_err)?;
        if found.is_some() {
            dir.pos += 1;
        }
        Ok(found)
    }

    fn close_dir(&mut self, dir: SdDir) {
        let _ = self.mgr.close_dir(dir.raw);
    }

    fn open_file(&mut self, path: &str) -> Result<SdFile, ErrorCode> {
        let split = path.rfind('/').unwrap_or(0);
        let (parent, name) = (&path[..split.max(1)], &path[split + 1..]);
        let dir = self.walk(parent)?;
        let opened = self.mgr.open_file_in_dir(dir, name, Mode::ReadOnly);
        let _ = self.mgr.close_dir(dir);
        match opened {
            Ok(raw) => Ok(SdFile { raw }),
            // A missing leaf is a missing file, not a missing path
            Err(SdError::NotFound) => Err(ErrorCode::NoFile),
            Err(e) => Err(map_err(e)),
        }
    }

    fn read(&mut self, file: &mut SdFile, buf: &mut [u8]) -> Result<usize, ErrorCode> {
        match self.mgr.read(file.raw, buf) {
            Ok(n) => Ok(n),
            Err(SdError::EndOfFile) => Ok(0),
            Err(e) => Err(map_err(e)),
        }
    }

    fn close_file(&mut self, file: SdFile) {
        let _ = self.mgr.close_file(file.raw);
    }

    fn free_space_kib(&mut self) -> Result<u32, ErrorCode> {
        // TODO: report a real free-cluster count once the library exposes
        // one. Until then this is the card capacity.
        let blocks = self
            .mgr
            .device()
            .num_blocks()
            .map_err(|_| ErrorCode::DiskErr)?;
        Ok(blocks.0 / 2)
    }
}

fn convert_entry(entry: &embedded_sdmmc::DirEntry) -> DirEntry {
    let mut name = heapless::String::new();
    let _ = write!(name, "{}", entry.name);

    let mut attr = Attributes::empty();
    if entry.attributes.is_read_only() {
        attr |= Attributes::READ_ONLY;
    }
    if entry.attributes.is_hidden() {
        attr |= Attributes::HIDDEN;
    }
    if entry.attributes.is_system() {
        attr |= Attributes::SYSTEM;
    }
    if entry.attributes.is_directory() {
        attr |= Attributes::DIRECTORY;
    }
    if entry.attributes.is_archive() {
        attr |= Attributes::ARCHIVE;
    }

    let m = &entry.mtime;
    DirEntry {
        name,
        size: entry.size,
        attr,
        date: FatDate::from_parts(
            1970 + m.year_since_1970 as u16,
            m.zero_indexed_month + 1,
            m.zero_indexed_day + 1,
        ),
        time: FatTime::from_parts(m.hours, m.minutes),
    }
}

fn map_err<E>(e: SdError<E>) -> ErrorCode {
    match e {
        SdError::DeviceError(_) => ErrorCode::DiskErr,
        SdError::FormatError(_) => ErrorCode::NoFilesystem,
        SdError::NoSuchVolume => ErrorCode::InvalidDrive,
        SdError::FilenameError(_) => ErrorCode::InvalidName,
        SdError::NotFound => ErrorCode::NoPath,
        SdError::TooManyOpenDirs | SdError::TooManyOpenFiles => ErrorCode::TooManyOpenFiles,
        SdError::OpenedFileAsDir => ErrorCode::NoPath,
        SdError::ReadOnly => ErrorCode::WriteProtected,
        _ => ErrorCode::IntErr,
    }
}
