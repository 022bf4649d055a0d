//! Input layer for fragment files
//!
//! A fragment file is either streamed through a buffered reader (plain,
//! gzip or bzip2) or, when plain and large, mapped and parsed in place.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;

/// Buffer size for streamed input (128KB)
pub const STREAM_BUFFER_SIZE: usize = 128 * 1024;

/// Plain files at least this large are memory mapped (64MB)
pub const MAP_THRESHOLD: u64 = 64 * 1024 * 1024;

/// How a plain file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadStrategy {
    /// Stream with the given buffer size
    Stream(usize),
    /// Map the whole file
    Map,
    /// Map files of at least [`MAP_THRESHOLD`] bytes, stream the rest
    #[default]
    BySize,
}

/// Compression of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Plain,
    Gzip,
    Bzip2,
}

impl Compression {
    /// Detect from the leading bytes
    pub fn from_magic(magic: &[u8]) -> Self {
        match magic {
            [0x1f, 0x8b, ..] => Compression::Gzip,
            [b'B', b'Z', b'h', ..] => Compression::Bzip2,
            _ => Compression::Plain,
        }
    }

    /// Detect from the extension, falling back to the leading bytes
    pub fn detect(path: &Path) -> io::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => Ok(Compression::Gzip),
            Some("bz2") => Ok(Compression::Bzip2),
            _ => {
                let mut magic = Vec::with_capacity(3);
                File::open(path)?.take(3).read_to_end(&mut magic)?;
                Ok(Self::from_magic(&magic))
            }
        }
    }
}

/// An opened fragment file
pub enum FragmentInput {
    Plain(BufReader<File>),
    Gzip(BufReader<MultiGzDecoder<File>>),
    Bzip2(BufReader<BzDecoder<File>>),
    Mapped(Mmap),
}

impl FragmentInput {
    /// Open `path`, decompressing if needed. `strategy` applies to plain
    /// files only.
    pub fn open<P: AsRef<Path>>(path: P, strategy: ReadStrategy) -> io::Result<Self> {
        let path = path.as_ref();
        let compression = Compression::detect(path)?;
        let file = File::open(path)?;
        log::debug!("opening {:?} ({:?})", path, compression);

        let input = match compression {
            Compression::Gzip => FragmentInput::Gzip(BufReader::with_capacity(
                STREAM_BUFFER_SIZE,
                MultiGzDecoder::new(file),
            )),
            Compression::Bzip2 => FragmentInput::Bzip2(BufReader::with_capacity(
                STREAM_BUFFER_SIZE,
                BzDecoder::new(file),
            )),
            Compression::Plain => match strategy {
                ReadStrategy::Stream(capacity) => {
                    FragmentInput::Plain(BufReader::with_capacity(capacity, file))
                }
                ReadStrategy::Map => Self::map(&file)?,
                ReadStrategy::BySize => {
                    if file.metadata()?.len() >= MAP_THRESHOLD {
                        Self::map(&file)?
                    } else {
                        FragmentInput::Plain(BufReader::with_capacity(STREAM_BUFFER_SIZE, file))
                    }
                }
            },
        };
        Ok(input)
    }

    fn map(file: &File) -> io::Result<Self> {
        // SAFETY: fragment files are not modified while being chained
        let map = unsafe { Mmap::map(file)? };
        Ok(FragmentInput::Mapped(map))
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, FragmentInput::Mapped(_))
    }

    pub fn compression(&self) -> Compression {
        match self {
            FragmentInput::Plain(_) | FragmentInput::Mapped(_) => Compression::Plain,
            FragmentInput::Gzip(_) => Compression::Gzip,
            FragmentInput::Bzip2(_) => Compression::Bzip2,
        }
    }
}

/// Lines of a `BufRead` source, reusing one buffer
pub struct LineReader<R: BufRead> {
    reader: R,
    line: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::with_capacity(256),
        }
    }

    /// Next line without its `\n` or `\r\n` terminator
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.line.clear();
        match self.reader.read_until(b'\n', &mut self.line) {
            Ok(0) => None,
            Ok(_) => {
                let mut content = self.line.as_slice();
                if let Some(rest) = content.strip_suffix(b"\n") {
                    content = rest.strip_suffix(b"\r").unwrap_or(rest);
                }
                Some(Ok(content))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
