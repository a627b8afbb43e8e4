//! BAM file I/O utilities.
//!
//! Readers and writers are created with consistent error context. Both can use several BGZF
//! worker threads: `threads=1` keeps everything on the calling thread, larger values hand
//! block (de)compression to `threads` workers.

use anyhow::{Context, Result};
use noodles::bgzf::{
    MultithreadedReader, MultithreadedWriter, Reader as BgzfReader, Writer as BgzfWriter,
};
use noodles::sam::Header;
use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::num::NonZero;
use std::path::Path;

/// Single-threaded or multi-threaded BGZF reader.
pub enum BgzfReaderEnum {
    /// Decompresses on the calling thread
    SingleThreaded(BgzfReader<File>),
    /// Decompresses on worker threads
    MultiThreaded(MultithreadedReader<File>),
}

impl Read for BgzfReaderEnum {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            BgzfReaderEnum::SingleThreaded(r) => r.read(buf),
            BgzfReaderEnum::MultiThreaded(r) => r.read(buf),
        }
    }
}

impl BufRead for BgzfReaderEnum {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            BgzfReaderEnum::SingleThreaded(r) => r.fill_buf(),
            BgzfReaderEnum::MultiThreaded(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            BgzfReaderEnum::SingleThreaded(r) => r.consume(amt),
            BgzfReaderEnum::MultiThreaded(r) => r.consume(amt),
        }
    }
}

/// BAM reader over either BGZF reader.
pub type BamReaderAuto = noodles::bam::io::Reader<BgzfReaderEnum>;

/// Single-threaded or multi-threaded BGZF writer.
pub enum BgzfWriterEnum {
    /// Compresses on the calling thread
    SingleThreaded(BgzfWriter<File>),
    /// Compresses on worker threads
    MultiThreaded(MultithreadedWriter<File>),
}

impl Write for BgzfWriterEnum {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            BgzfWriterEnum::SingleThreaded(w) => w.write(buf),
            BgzfWriterEnum::MultiThreaded(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            BgzfWriterEnum::SingleThreaded(w) => w.flush(),
            BgzfWriterEnum::MultiThreaded(w) => w.flush(),
        }
    }
}

impl BgzfWriterEnum {
    /// Flushes remaining blocks and writes the BGZF EOF marker.
    ///
    /// # Errors
    /// Returns an error if flushing or finalizing the writer fails.
    pub fn finish(self) -> io::Result<()> {
        match self {
            // The single-threaded writer writes the EOF marker when dropped.
            BgzfWriterEnum::SingleThreaded(mut w) => w.flush(),
            BgzfWriterEnum::MultiThreaded(mut w) => w.finish().map(|_| ()),
        }
    }
}

/// BAM writer over either BGZF writer.
pub type BamWriter = noodles::bam::io::Writer<BgzfWriterEnum>;

/// Open a BAM file and read its header.
///
/// # Errors
/// Returns an error if the file cannot be opened or the header cannot be read
///
/// # Example
/// ```no_run
/// use fgreduce_lib::bam_io::create_bam_reader;
///
/// let (mut reader, header) = create_bam_reader("input.bam", 1).unwrap();
/// ```
pub fn create_bam_reader<P: AsRef<Path>>(
    path: P,
    threads: usize,
) -> Result<(BamReaderAuto, Header)> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref)
        .with_context(|| format!("Failed to open input BAM: {}", path_ref.display()))?;

    let bgzf_reader = match NonZero::new(threads).filter(|n| n.get() > 1) {
        Some(worker_count) => {
            BgzfReaderEnum::MultiThreaded(MultithreadedReader::with_worker_count(worker_count, file))
        }
        None => BgzfReaderEnum::SingleThreaded(BgzfReader::new(file)),
    };

    let mut reader = noodles::bam::io::Reader::from(bgzf_reader);
    let header = reader
        .read_header()
        .with_context(|| format!("Failed to read header from: {}", path_ref.display()))?;

    Ok((reader, header))
}

/// Create a BAM writer and write the header in one operation.
///
/// # Errors
/// Returns an error if the file cannot be created or the header cannot be written
///
/// # Example
/// ```no_run
/// use fgreduce_lib::bam_io::create_bam_writer;
/// use noodles::sam::Header;
///
/// let header = Header::default();
/// let mut writer = create_bam_writer("output.bam", &header, 4).unwrap();
/// ```
pub fn create_bam_writer<P: AsRef<Path>>(
    path: P,
    header: &Header,
    threads: usize,
) -> Result<BamWriter> {
    let path_ref = path.as_ref();
    let output_file = File::create(path_ref)
        .with_context(|| format!("Failed to create output BAM: {}", path_ref.display()))?;

    let bgzf_writer = match NonZero::new(threads).filter(|n| n.get() > 1) {
        Some(worker_count) => BgzfWriterEnum::MultiThreaded(
            MultithreadedWriter::with_worker_count(worker_count, output_file),
        ),
        None => BgzfWriterEnum::SingleThreaded(BgzfWriter::new(output_file)),
    };

    let mut writer = noodles::bam::io::Writer::from(bgzf_writer);
    writer
        .write_header(header)
        .with_context(|| format!("Failed to write header to: {}", path_ref.display()))?;
    Ok(writer)
}

/// Finish a BAM writer, writing the EOF marker.
///
/// # Errors
/// Returns an error if the final blocks cannot be written
pub fn finish_bam_writer(writer: BamWriter) -> Result<()> {
    writer.into_inner().finish().context("Failed to finish output BAM")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fgreduce_sam::builder::RecordBuilder;
    use noodles::sam::alignment::io::Write as AlignmentWrite;
    use noodles::sam::header::record::value::{Map, map::ReferenceSequence};
    use rstest::rstest;
    use std::num::NonZeroUsize;
    use tempfile::NamedTempFile;

    fn create_test_header() -> Header {
        let ref_seq = Map::<ReferenceSequence>::new(
            NonZeroUsize::new(100).expect("100 is non-zero constant"),
        );
        Header::builder().add_reference_sequence(b"chr1", ref_seq).build()
    }

    #[test]
    fn test_create_bam_reader_nonexistent_file() {
        let err = create_bam_reader("/nonexistent/file.bam", 1).err().unwrap();
        assert!(err.to_string().contains("Failed to open input BAM"));
    }

    #[test]
    fn test_create_bam_writer_invalid_path() {
        let header = create_test_header();
        let err = create_bam_writer("/invalid/path/output.bam", &header, 1).err().unwrap();
        assert!(err.to_string().contains("Failed to create output BAM"));
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    fn test_write_then_read(#[case] threads: usize) -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let header = create_test_header();

        let mut writer = create_bam_writer(temp_file.path(), &header, threads)?;
        let record = RecordBuilder::mapped_read()
            .name("q1")
            .sequence("ACGTACGT")
            .alignment_start(10)
            .build();
        writer.write_alignment_record(&header, &record)?;
        finish_bam_writer(writer)?;

        let (mut reader, read_header) = create_bam_reader(temp_file.path(), threads)?;
        assert_eq!(read_header.reference_sequences().len(), 1);
        let records: Vec<_> = reader.record_bufs(&read_header).collect::<std::io::Result<_>>()?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence().as_ref(), b"ACGTACGT");
        Ok(())
    }
}
