//! Filesystem facade.
//!
//! The shell never calls the FAT library directly. Everything goes through the
//! [`Vfs`] trait, which mirrors the opendir/readdir/open/read shape of a FAT
//! driver: directories and files are handles, directory listing is a pull-based
//! entry reader, and file reads fill a caller-supplied buffer. The firmware
//! implements this over `embedded-sdmmc`; host tests implement it with an
//! in-memory mock.
//!
//! Errors are the discrete [`ErrorCode`] result codes, resolved to display
//! names with [`ErrorCode::name`].

use bitflags::bitflags;

/// Maximum directory entry name length (8.3 short name plus the dot).
pub const MAX_NAME: usize = 12;

bitflags! {
    /// FAT attribute bits as packed in a directory entry.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct Attributes: u8 {
        /// Entry may not be written to.
        const READ_ONLY = 0x01;
        /// Entry is hidden from normal listings.
        const HIDDEN = 0x02;
        /// Entry belongs to the operating system.
        const SYSTEM = 0x04;
        /// Entry is a directory.
        const DIRECTORY = 0x10;
        /// Entry has been modified since the last archive.
        const ARCHIVE = 0x20;
    }
}

/// FAT-packed date word.
///
/// Bits 15..9 hold the year offset from 1980, bits 8..5 the month, bits 4..0
/// the day of month.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FatDate(pub u16);

impl FatDate {
    /// Pack a calendar date. Years before 1980 saturate to 1980.
    pub const fn from_parts(year: u16, month: u8, day: u8) -> Self {
        let offset = year.saturating_sub(1980);
        FatDate((offset << 9) | ((month as u16 & 15) << 5) | (day as u16 & 31))
    }

    /// Calendar year.
    pub const fn year(self) -> u16 {
        (self.0 >> 9) + 1980
    }

    /// Month of year, 1-based.
    pub const fn month(self) -> u8 {
        ((self.0 >> 5) & 15) as u8
    }

    /// Day of month, 1-based.
    pub const fn day(self) -> u8 {
        (self.0 & 31) as u8
    }
}

/// FAT-packed time word.
///
/// Bits 15..11 hold the hour, bits 10..5 the minute. The two-second field in
/// bits 4..0 is not displayed by the shell and is kept verbatim.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FatTime(pub u16);

impl FatTime {
    /// Pack an hour/minute pair.
    pub const fn from_parts(hour: u8, minute: u8) -> Self {
        FatTime(((hour as u16 & 31) << 11) | ((minute as u16 & 63) << 5))
    }

    /// Hour of day.
    pub const fn hour(self) -> u8 {
        (self.0 >> 11) as u8
    }

    /// Minute of hour.
    pub const fn minute(self) -> u8 {
        ((self.0 >> 5) & 63) as u8
    }
}

/// One directory entry as produced by [`Vfs::read_entry`].
#[derive(Clone, Debug, Default)]
pub struct DirEntry {
    /// Entry name, without any path.
    pub name: heapless::String<MAX_NAME>,
    /// File size in bytes. Zero for directories.
    pub size: u32,
    /// Attribute bits.
    pub attr: Attributes,
    /// Last-modified date, FAT-packed.
    pub date: FatDate,
    /// Last-modified time, FAT-packed.
    pub time: FatTime,
}

impl DirEntry {
    /// Whether the attribute bits mark this entry as a directory.
    pub fn is_dir(&self) -> bool {
        self.attr.contains(Attributes::DIRECTORY)
    }
}

/// Result codes returned by filesystem operations.
///
/// These mirror the result-code domain of a FAT driver, one code per failure
/// class, so command handlers can propagate them unchanged up to the main
/// loop for display. Success is expressed as `Ok(())`, so there is no
/// `FR_OK` variant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// Low-level device error.
    DiskErr,
    /// Internal driver error.
    IntErr,
    /// Device is not ready to work.
    NotReady,
    /// File not found.
    NoFile,
    /// Path not found.
    NoPath,
    /// Name is badly formed.
    InvalidName,
    /// Access denied.
    Denied,
    /// Object already exists.
    Exist,
    /// Handle is invalid.
    InvalidObject,
    /// Medium is write protected.
    WriteProtected,
    /// Drive number is invalid.
    InvalidDrive,
    /// Volume has no work area.
    NotEnabled,
    /// No valid FAT volume found.
    NoFilesystem,
    /// Operation timed out.
    Timeout,
    /// Object is locked by another open.
    Locked,
    /// Working buffer could not be obtained.
    NotEnoughCore,
    /// Too many open handles.
    TooManyOpenFiles,
    /// A parameter is invalid or missing.
    InvalidParameter,
    /// A code outside the modeled set.
    Unknown,
}

impl ErrorCode {
    /// Human-readable name of the result code, for console display.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::DiskErr => "FR_DISK_ERR",
            ErrorCode::IntErr => "FR_INT_ERR",
            ErrorCode::NotReady => "FR_NOT_READY",
            ErrorCode::NoFile => "FR_NO_FILE",
            ErrorCode::NoPath => "FR_NO_PATH",
            ErrorCode::InvalidName => "FR_INVALID_NAME",
            ErrorCode::Denied => "FR_DENIED",
            ErrorCode::Exist => "FR_EXIST",
            ErrorCode::InvalidObject => "FR_INVALID_OBJECT",
            ErrorCode::WriteProtected => "FR_WRITE_PROTECTED",
            ErrorCode::InvalidDrive => "FR_INVALID_DRIVE",
            ErrorCode::NotEnabled => "FR_NOT_ENABLED",
            ErrorCode::NoFilesystem => "FR_NO_FILESYSTEM",
            ErrorCode::Timeout => "FR_TIMEOUT",
            ErrorCode::Locked => "FR_LOCKED",
            ErrorCode::NotEnoughCore => "FR_NOT_ENOUGH_CORE",
            ErrorCode::TooManyOpenFiles => "FR_TOO_MANY_OPEN_FILES",
            ErrorCode::InvalidParameter => "FR_INVALID_PARAMETER",
            ErrorCode::Unknown => "UNKNOWN ERROR CODE",
        }
    }
}

/// Handle-based view of the mounted filesystem.
///
/// Paths are absolute, `/`-separated strings as maintained by the shell's
/// path resolver. Implementations are expected to run each call to
/// completion; there are no partial or suspended operations.
pub trait Vfs {
    /// Open directory handle.
    type Dir;
    /// Open file handle.
    type File;

    /// Open the directory at an absolute path.
    fn open_dir(&mut self, path: &str) -> Result<Self::Dir, ErrorCode>;

    /// Read the next entry from an open directory. `Ok(None)` signals the end
    /// of the listing.
    fn read_entry(&mut self, dir: &mut Self::Dir) -> Result<Option<DirEntry>, ErrorCode>;

    /// Release a directory handle.
    fn close_dir(&mut self, dir: Self::Dir);

    /// Open the file at an absolute path for reading.
    fn open_file(&mut self, path: &str) -> Result<Self::File, ErrorCode>;

    /// Read up to `buf.len()` bytes from an open file, returning the number
    /// of bytes read. A short read signals end-of-file; a read at end-of-file
    /// returns `Ok(0)`.
    fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, ErrorCode>;

    /// Release a file handle.
    fn close_file(&mut self, file: Self::File);

    /// KiB free on the volume.
    fn free_space_kib(&mut self) -> Result<u32, ErrorCode>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_bit_decode() {
        // 2015-05-27: offset 35 years from 1980
        let d = FatDate((35 << 9) | (5 << 5) | 27);
        assert_eq!(d.year(), 2015);
        assert_eq!(d.month(), 5);
        assert_eq!(d.day(), 27);
    }

    #[test]
    fn date_pack_round_trip() {
        let d = FatDate::from_parts(1999, 12, 31);
        assert_eq!((d.year(), d.month(), d.day()), (1999, 12, 31));
        // Pre-FAT-epoch years clamp to 1980
        assert_eq!(FatDate::from_parts(1970, 1, 1).year(), 1980);
    }

    #[test]
    fn time_bit_decode() {
        let t = FatTime((23 << 11) | (59 << 5));
        assert_eq!(t.hour(), 23);
        assert_eq!(t.minute(), 59);
        let t = FatTime::from_parts(7, 5);
        assert_eq!((t.hour(), t.minute()), (7, 5));
    }

    #[test]
    fn unknown_code_has_fixed_name() {
        assert_eq!(ErrorCode::Unknown.name(), "UNKNOWN ERROR CODE");
        assert_eq!(ErrorCode::NoPath.name(), "FR_NO_PATH");
    }
}
