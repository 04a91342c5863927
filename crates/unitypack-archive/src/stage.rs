use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

/// Container formats a `.unitypackage` shows up as in the wild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageFormat {
    Tar,
    TarGz,
}

pub fn detect_format(header: &[u8]) -> Option<PackageFormat> {
    match header {
        [0x1F, 0x8B, ..] => Some(PackageFormat::TarGz),
        _ if is_tar_header(header) => Some(PackageFormat::Tar),
        _ => None,
    }
}

fn is_tar_header(data: &[u8]) -> bool {
    // "ustar" covers both the POSIX ("ustar\0") and GNU ("ustar ") magics.
    data.len() >= 262 && data[257..262] == *b"ustar"
}

fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> Result<PackageFormat> {
    let mut header = [0u8; 512];
    let mut filled = 0;
    loop {
        let n = reader
            .read(&mut header[filled..])
            .map_err(|source| Error::Stage { source })?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    reader.rewind().map_err(|source| Error::Stage { source })?;
    detect_format(&header[..filled]).ok_or(Error::UnsupportedFormat)
}

/// Unpack the raw archive into `staging`.
///
/// The `tar` crate's `unpack` refuses entries whose paths would land outside
/// the destination, so the staging area itself cannot be escaped; the
/// relocator only ever sees artifacts that were written inside it.
pub fn stage_archive(archive: &Path, staging: &Path) -> Result<PackageFormat> {
    let file = File::open(archive).map_err(|source| Error::Stage { source })?;
    let mut reader = BufReader::new(file);
    let format = detect_from_reader(&mut reader)?;
    match format {
        PackageFormat::TarGz => tar::Archive::new(GzDecoder::new(reader)).unpack(staging),
        PackageFormat::Tar => tar::Archive::new(reader).unpack(staging),
    }
    .map_err(|source| Error::Stage { source })?;
    Ok(format)
}
