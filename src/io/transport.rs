//! Transport selection: plain files or compressed streams chosen by suffix

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Compression wrapped around the text encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Zstd,
}

impl Compression {
    /// Detect compression from the file name suffix (case-insensitive)
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let name = path
            .as_ref()
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if name.ends_with(".gz") {
            Compression::Gzip
        } else if name.ends_with(".zst") || name.ends_with(".zstd") {
            Compression::Zstd
        } else {
            Compression::None
        }
    }

    /// Conventional suffix for this compression, without the dot
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Gzip => Some("gz"),
            Compression::Zstd => Some("zst"),
        }
    }

    /// Parse a compression name as used in configs and on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "none" | "plain" => Some(Compression::None),
            "gzip" | "gz" => Some(Compression::Gzip),
            "zstd" | "zst" => Some(Compression::Zstd),
            _ => None,
        }
    }
}

impl std::str::FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Compression::from_name(s).ok_or_else(|| {
            format!("Unknown compression: {s}. Valid compressions: none, gzip, zstd")
        })
    }
}

/// A byte sink that must be finalized before it is released
///
/// Compressed sinks write their trailer in [`finish`](Sink::finish); dropping
/// them instead would swallow trailer errors.
pub trait Sink: Write {
    fn finish(self) -> io::Result<()>;
}

impl<W: Write + ?Sized> Sink for &mut W {
    fn finish(self) -> io::Result<()> {
        self.flush()
    }
}

/// File destination, optionally behind a compressing filter
pub enum FileSink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Zstd(zstd::stream::write::Encoder<'static, BufWriter<File>>),
}

impl FileSink {
    /// Create (truncate) `path` and wrap it per `compression`
    ///
    /// `level` is the codec's own compression level; `None` picks its default.
    /// A gzip level outside `0..=9` is rejected with
    /// [`io::ErrorKind::InvalidInput`] before the file is touched.
    pub fn create(
        path: impl AsRef<Path>,
        compression: Compression,
        level: Option<i32>,
    ) -> io::Result<Self> {
        let gzip_level = match (compression, level) {
            (Compression::Gzip, Some(l)) => match u32::try_from(l) {
                Ok(l) if l <= 9 => flate2::Compression::new(l),
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("gzip level {l} is outside 0..=9"),
                    ))
                }
            },
            _ => flate2::Compression::default(),
        };

        let file = BufWriter::new(File::create(path)?);
        Ok(match compression {
            Compression::None => FileSink::Plain(file),
            Compression::Gzip => FileSink::Gzip(GzEncoder::new(file, gzip_level)),
            Compression::Zstd => FileSink::Zstd(zstd::stream::write::Encoder::new(
                file,
                level.unwrap_or(zstd::DEFAULT_COMPRESSION_LEVEL),
            )?),
        })
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileSink::Plain(w) => w.write(buf),
            FileSink::Gzip(w) => w.write(buf),
            FileSink::Zstd(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileSink::Plain(w) => w.flush(),
            FileSink::Gzip(w) => w.flush(),
            FileSink::Zstd(w) => w.flush(),
        }
    }
}

impl Sink for FileSink {
    fn finish(self) -> io::Result<()> {
        let mut file = match self {
            FileSink::Plain(w) => w,
            FileSink::Gzip(w) => w.finish()?,
            FileSink::Zstd(w) => w.finish()?,
        };
        file.flush()
    }
}

/// Open `path` for reading, decompressing per `compression`
pub fn open_source(
    path: impl AsRef<Path>,
    compression: Compression,
) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    Ok(match compression {
        Compression::None => Box::new(BufReader::new(file)),
        Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        Compression::Zstd => Box::new(BufReader::new(zstd::stream::read::Decoder::new(file)?)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_compression_from_path() {
        assert_eq!(Compression::from_path("model.txt"), Compression::None);
        assert_eq!(Compression::from_path("model"), Compression::None);
        assert_eq!(Compression::from_path("model.bin.gz"), Compression::Gzip);
        assert_eq!(Compression::from_path("MODEL.TXT.GZ"), Compression::Gzip);
        assert_eq!(Compression::from_path("dir/model.zst"), Compression::Zstd);
        assert_eq!(Compression::from_path("model.zstd"), Compression::Zstd);
        assert_eq!(Compression::from_path("model.gzip.txt"), Compression::None);
    }

    #[test]
    fn test_compression_names() {
        assert_eq!(Compression::from_name("GZIP"), Some(Compression::Gzip));
        assert_eq!(Compression::from_name("plain"), Some(Compression::None));
        assert_eq!(Compression::from_name("zst"), Some(Compression::Zstd));
        assert_eq!(Compression::from_name("lzma"), None);
        assert_eq!(Compression::Gzip.extension(), Some("gz"));
        assert_eq!(Compression::None.extension(), None);
        assert_eq!("gz".parse::<Compression>(), Ok(Compression::Gzip));
        assert!("rar".parse::<Compression>().is_err());
    }

    #[test]
    fn test_compression_serde() {
        let json = serde_json::to_string(&Compression::Zstd).unwrap();
        assert_eq!(json, "\"zstd\"");
        let back: Compression = serde_json::from_str("\"gzip\"").unwrap();
        assert_eq!(back, Compression::Gzip);
    }

    fn round_trip(compression: Compression, level: Option<i32>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload");

        let mut sink = FileSink::create(&path, compression, level).unwrap();
        sink.write_all(b"line one\nline two\n").unwrap();
        sink.finish().unwrap();

        let mut text = String::new();
        open_source(&path, compression)
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "line one\nline two\n");
    }

    #[test]
    fn test_plain_sink_and_source() {
        round_trip(Compression::None, None);
    }

    #[test]
    fn test_gzip_sink_and_source() {
        round_trip(Compression::Gzip, None);
        round_trip(Compression::Gzip, Some(9));
        round_trip(Compression::Gzip, Some(0));
    }

    #[test]
    fn test_gzip_level_out_of_range_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for level in [42, 10, -1] {
            let path = dir.path().join(format!("level{level}.gz"));
            let err = FileSink::create(&path, Compression::Gzip, Some(level))
                .err()
                .unwrap();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_zstd_sink_and_source() {
        round_trip(Compression::Zstd, None);
        round_trip(Compression::Zstd, Some(19));
    }

    #[test]
    fn test_gzip_output_is_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.gz");

        let mut sink = FileSink::create(&path, Compression::Gzip, None).unwrap();
        sink.write_all(b"hello\n").unwrap();
        sink.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_open_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_source(dir.path().join("missing"), Compression::None);
        assert_eq!(result.err().map(|e| e.kind()), Some(io::ErrorKind::NotFound));
    }

    #[test]
    fn test_borrowed_sink_finish_flushes() {
        let mut buf = Vec::new();
        {
            let sink = &mut buf;
            sink.write_all(b"abc").unwrap();
            Sink::finish(sink).unwrap();
        }
        assert_eq!(buf, b"abc");
    }
}
