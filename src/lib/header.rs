//! SAM header utilities.
//!
//! Builds the header of a reduced BAM: the input's reference sequences, read groups, programs
//! and comments, an `@RG` line per reduced sample, `SO:unsorted`, and a chained `@PG` record.

use anyhow::Result;
use bstr::BString;
use noodles::sam::Header;
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::header::tag as header_tag;
use noodles::sam::header::record::value::map::program::tag;
use noodles::sam::header::record::value::map::read_group::tag as rg_tag;
use noodles::sam::header::record::value::map::{Program, ReadGroup};
use std::collections::HashSet;

/// Program name recorded in `@PG` lines.
pub const PROGRAM_NAME: &str = "fgreduce";

/// Get the ID of the last program in the @PG chain (for PP chaining).
///
/// The last program is the one not referenced by any other program's PP tag.
#[must_use]
pub fn get_last_program_id(header: &Header) -> Option<String> {
    let programs = header.programs();
    let program_map = programs.as_ref();

    let referenced: HashSet<&[u8]> = program_map
        .values()
        .filter_map(|pg| pg.other_fields().get(&tag::PREVIOUS_PROGRAM_ID))
        .map(AsRef::as_ref)
        .collect();

    program_map
        .keys()
        .find(|id| !referenced.contains(id.as_slice()))
        .or_else(|| program_map.keys().next())
        .map(|id| String::from_utf8_lossy(id).to_string())
}

/// Create a unique program ID by appending .1, .2, etc. if needed.
#[must_use]
pub fn make_unique_program_id(header: &Header, base_id: &str) -> String {
    let programs = header.programs();
    let program_map = programs.as_ref();

    if !program_map.contains_key(base_id.as_bytes()) {
        return base_id.to_string();
    }

    (1..)
        .map(|i| format!("{base_id}.{i}"))
        .find(|candidate| !program_map.contains_key(candidate.as_bytes()))
        .unwrap_or_else(|| base_id.to_string())
}

/// Build a @PG record with the program name, version and command line.
///
/// # Errors
///
/// Returns an error if the program record cannot be built.
pub fn build_program_record(
    version: &str,
    command_line: &str,
    previous_program: Option<&str>,
) -> Result<Map<Program>> {
    let mut builder = Map::<Program>::builder()
        .insert(tag::NAME, PROGRAM_NAME)
        .insert(tag::VERSION, version)
        .insert(tag::COMMAND_LINE, command_line);

    if let Some(pp) = previous_program {
        builder = builder.insert(tag::PREVIOUS_PROGRAM_ID, pp);
    }

    Ok(builder.build()?)
}

/// Add a @PG record to an existing header, chained to the last program already present.
///
/// # Errors
///
/// Returns an error if the program record cannot be added to the header.
pub fn add_pg_record(mut header: Header, version: &str, command_line: &str) -> Result<Header> {
    let previous_program = get_last_program_id(&header);
    let unique_id = make_unique_program_id(&header, PROGRAM_NAME);
    let pg_record = build_program_record(version, command_line, previous_program.as_deref())?;

    header.programs_mut().add(BString::from(unique_id), pg_record)?;

    Ok(header)
}

/// Builds the header for reduced output.
///
/// `reduced_samples` are the sample names carried by consensus reads; each gets an `@RG`
/// line whose `ID` and `SM` are that name. Read groups already present are kept.
///
/// # Errors
///
/// Returns an error if a header record cannot be built.
pub fn build_reduced_header(
    input: &Header,
    reduced_samples: &[String],
    version: &str,
    command_line: &str,
) -> Result<Header> {
    let mut builder = Header::builder();

    for (name, seq) in input.reference_sequences() {
        builder = builder.add_reference_sequence(name.as_slice(), seq.clone());
    }
    for (id, rg) in input.read_groups() {
        builder = builder.add_read_group(id.as_slice(), rg.clone());
    }
    for sample in reduced_samples {
        if input.read_groups().contains_key(sample.as_bytes()) {
            continue;
        }
        let rg = Map::<ReadGroup>::builder().insert(rg_tag::SAMPLE, sample.as_str()).build()?;
        builder = builder.add_read_group(BString::from(sample.as_str()), rg);
    }
    for (id, pg) in input.programs().as_ref() {
        builder = builder.add_program(id.as_slice(), pg.clone());
    }
    for comment in input.comments() {
        builder = builder.add_comment(comment.clone());
    }

    let hd = Map::<noodles::sam::header::record::value::map::Header>::builder()
        .insert(header_tag::SORT_ORDER, BString::from("unsorted"))
        .build()?;
    builder = builder.set_header(hd);

    add_pg_record(builder.build(), version, command_line)
}
