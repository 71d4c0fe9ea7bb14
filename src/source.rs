//! Line sources
//!
//! A line source opens a file and yields its lines lazily, in order. Input is
//! transcoded to UTF-8 using a BOM check and `chardetng` detection on a
//! sample from the start of the file.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Size of the sample used for encoding detection
const SAMPLE_SIZE: usize = 64 * 1024;

/// Lazy, finite, non-restartable sequence of lines
pub type Lines = Box<dyn Iterator<Item = io::Result<String>> + Send>;

/// Produces the lines of a file
pub trait LineSource: Send + Sync {
    /// Open `path` for reading
    ///
    /// Fails with [`io::ErrorKind::NotFound`] when the file does not exist.
    fn read_lines(&self, path: &Path) -> io::Result<Lines>;
}

/// Result of encoding detection
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    pub name: &'static str,
    /// Rough confidence (0.0 - 1.0)
    pub confidence: f32,
    pub encoding: &'static Encoding,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            name: "UTF-8",
            confidence: 1.0,
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Detect the encoding of a file by sampling its content
pub fn detect_encoding(path: &Path) -> io::Result<EncodingInfo> {
    let file = File::open(path)?;

    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    file.take(SAMPLE_SIZE as u64).read_to_end(&mut sample)?;

    Ok(detect_encoding_from_sample(&sample))
}

fn detect_encoding_from_sample(sample: &[u8]) -> EncodingInfo {
    if sample.is_empty() {
        return EncodingInfo::default();
    }

    if let Some((encoding, _)) = Encoding::for_bom(sample) {
        return EncodingInfo {
            name: encoding.name(),
            confidence: 1.0,
            encoding,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    let encoding = detector.guess(None, true);

    let confidence = if encoding == encoding_rs::UTF_8 {
        if std::str::from_utf8(sample).is_ok() {
            1.0
        } else {
            0.5
        }
    } else {
        0.8
    };

    EncodingInfo {
        name: encoding.name(),
        confidence,
        encoding,
    }
}

/// Length of the byte order mark at the start of `content`, if any
fn bom_length(content: &[u8]) -> usize {
    Encoding::for_bom(content).map(|(_, len)| len).unwrap_or(0)
}

fn strip_line_ending(mut line: &[u8]) -> &[u8] {
    if let Some(rest) = line.strip_suffix(b"\n") {
        line = rest;
    }
    if let Some(rest) = line.strip_suffix(b"\r") {
        line = rest;
    }
    line
}

fn decode_line(encoding: &'static Encoding, bytes: &[u8]) -> String {
    if encoding == encoding_rs::UTF_8 {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => {
                log::warn!("Invalid UTF-8 in line, using lossy conversion");
                String::from_utf8_lossy(bytes).into_owned()
            }
        }
    } else {
        let (decoded, had_errors) = encoding.decode_without_bom_handling(bytes);
        if had_errors {
            log::warn!("Encoding errors in line ({}), using lossy conversion", encoding.name());
        }
        decoded.into_owned()
    }
}

/// Buffered line source with encoding detection
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLineSource;

impl LineSource for FileLineSource {
    fn read_lines(&self, path: &Path) -> io::Result<Lines> {
        Ok(Box::new(EncodedLineIterator::new(path)?))
    }
}

/// Line iterator over a transcoding reader
///
/// The file is decoded to UTF-8 before it is split, so multi-byte
/// encodings such as UTF-16 split on the right boundaries.
pub struct EncodedLineIterator {
    reader: BufReader<DecodeReaderBytes<File, Vec<u8>>>,
    encoding: &'static Encoding,
    line_buffer: Vec<u8>,
    at_start: bool,
}

impl EncodedLineIterator {
    /// Open a file with automatic encoding detection
    pub fn new(path: &Path) -> io::Result<Self> {
        let encoding = detect_encoding(path)?.encoding;
        Self::with_encoding(path, encoding)
    }

    /// Open a file with a known encoding
    pub fn with_encoding(path: &Path, encoding: &'static Encoding) -> io::Result<Self> {
        let file = File::open(path)?;
        let decoder = DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding))
            .bom_override(true)
            .build(file);

        Ok(Self {
            reader: BufReader::with_capacity(SAMPLE_SIZE, decoder),
            encoding,
            line_buffer: Vec::with_capacity(4096),
            at_start: true,
        })
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Iterator for EncodedLineIterator {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line_buffer.clear();

        match self.reader.read_until(b'\n', &mut self.line_buffer) {
            Ok(0) => None,
            Ok(_) => {
                let mut bytes = strip_line_ending(&self.line_buffer);
                if self.at_start {
                    self.at_start = false;
                    bytes = &bytes[bom_length(bytes)..];
                }
                Some(Ok(decode_line(encoding_rs::UTF_8, bytes)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Memory-mapped line source for large files
#[derive(Debug, Clone, Copy, Default)]
pub struct MmapLineSource;

impl LineSource for MmapLineSource {
    fn read_lines(&self, path: &Path) -> io::Result<Lines> {
        let iter = MmapLineIterator::new(path)?;

        // Splitting raw bytes on '\n' only works for ASCII-compatible encodings
        if !iter.encoding().is_ascii_compatible() {
            log::debug!(
                "{} is not ASCII-compatible, falling back to buffered reading",
                iter.encoding().name()
            );
            return Ok(Box::new(EncodedLineIterator::with_encoding(path, iter.encoding())?));
        }

        Ok(Box::new(iter))
    }
}

/// Line iterator over a memory-mapped file
pub struct MmapLineIterator {
    mmap: Option<memmap2::Mmap>,
    encoding: &'static Encoding,
    position: usize,
}

impl MmapLineIterator {
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;

        // Zero-length files cannot be mapped on every platform
        if file.metadata()?.len() == 0 {
            return Ok(Self {
                mmap: None,
                encoding: encoding_rs::UTF_8,
                position: 0,
            });
        }

        // SAFETY: the map is read-only and dropped with the iterator
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        let sample = &mmap[..mmap.len().min(SAMPLE_SIZE)];
        let encoding = detect_encoding_from_sample(sample).encoding;
        let position = bom_length(&mmap);

        Ok(Self {
            mmap: Some(mmap),
            encoding,
            position,
        })
    }

    /// Total size of the mapped file
    pub fn size(&self) -> usize {
        self.mmap.as_ref().map_or(0, |m| m.len())
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Iterator for MmapLineIterator {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mmap = self.mmap.as_ref()?;
        if self.position >= mmap.len() {
            return None;
        }

        let remaining = &mmap[self.position..];
        let line_end = memchr::memchr(b'\n', remaining)
            .map(|i| i + 1)
            .unwrap_or(remaining.len());
        self.position += line_end;

        let line = strip_line_ending(&remaining[..line_end]);
        Some(Ok(decode_line(self.encoding, line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    fn collect(lines: Lines) -> Vec<String> {
        lines.map(|l| l.unwrap()).collect()
    }

    #[test]
    fn test_utf8_detection() {
        let file = write_file("Hello, World!\nПривет мир!\n".as_bytes());

        let info = detect_encoding(file.path()).unwrap();
        assert_eq!(info.name, "UTF-8");
    }

    #[test]
    fn test_file_source_lines() {
        let file = write_file(b"line1\r\nline2\nline3");

        let lines = collect(FileLineSource.read_lines(file.path()).unwrap());
        assert_eq!(lines, vec!["line1", "line2", "line3"]);
    }

    #[test]
    fn test_file_source_strips_bom() {
        let file = write_file(b"\xEF\xBB\xBFHello world\n");

        let lines = collect(FileLineSource.read_lines(file.path()).unwrap());
        assert_eq!(lines, vec!["Hello world"]);
    }

    #[test]
    fn test_file_source_utf16() {
        let mut content = vec![0xFF, 0xFE];
        for unit in "first line\nsecond".encode_utf16() {
            content.extend_from_slice(&unit.to_le_bytes());
        }
        let file = write_file(&content);

        let lines = collect(FileLineSource.read_lines(file.path()).unwrap());
        assert_eq!(lines, vec!["first line", "second"]);

        let mapped = collect(MmapLineSource.read_lines(file.path()).unwrap());
        assert_eq!(mapped, lines);
    }

    #[test]
    fn test_file_source_missing_file() {
        let err = match FileLineSource.read_lines(Path::new("/definitely/not/here.txt")) {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mmap_source_lines() {
        let file = write_file(b"\xEF\xBB\xBFalpha beta\r\n\ngamma\n");

        let lines = collect(MmapLineSource.read_lines(file.path()).unwrap());
        assert_eq!(lines, vec!["alpha beta", "", "gamma"]);
    }

    #[test]
    fn test_mmap_source_empty_file() {
        let file = write_file(b"");

        let lines = collect(MmapLineSource.read_lines(file.path()).unwrap());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_sources_agree() {
        let file = write_file("one two\nthree\n\nfour five six\n".as_bytes());

        let buffered = collect(FileLineSource.read_lines(file.path()).unwrap());
        let mapped = collect(MmapLineSource.read_lines(file.path()).unwrap());
        assert_eq!(buffered, mapped);
    }
}
