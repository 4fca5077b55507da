//! Inject release notes into a nuspec's `<package><metadata><releaseNotes>`.
//!
//! The document is streamed event by event so everything outside the
//! release-notes element (declaration, comments, namespaces, whitespace)
//! is written back as it was read.

use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::warn;

use crate::error::DescriptorError;

use super::json::{WriteOutcome, write_atomic};

const PACKAGE: &[u8] = b"package";
const METADATA: &[u8] = b"metadata";
const RELEASE_NOTES: &str = "releaseNotes";

#[derive(Debug, PartialEq, Eq)]
enum PatchError {
    Xml(String),
    MissingMetadata,
}

/// Overwrite the release notes of the nuspec at `path`.
///
/// A missing file is skipped with a warning rather than treated as an error.
pub fn update_nuspec(path: &Path, notes: &str) -> Result<WriteOutcome, DescriptorError> {
    if !path.exists() {
        let reason = format!("Could not find nuspec to update at path '{}'.", path.display());
        warn!(path = %path.display(), "nuspec not found");
        eprintln!("Warning: {}", reason);
        return Ok(WriteOutcome::Skipped(reason));
    }

    let xml = std::fs::read_to_string(path).map_err(|source| DescriptorError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let patched = set_release_notes(&xml, notes).map_err(|e| match e {
        PatchError::Xml(reason) => DescriptorError::InvalidXml {
            path: path.to_path_buf(),
            reason,
        },
        PatchError::MissingMetadata => DescriptorError::MissingMetadata {
            path: path.to_path_buf(),
        },
    })?;

    write_atomic(path, &patched)?;
    println!("Updated nuspec '{}' with release notes.", path.display());
    Ok(WriteOutcome::Written)
}

fn at_metadata(stack: &[Vec<u8>]) -> bool {
    matches!(stack, [package, metadata] if package == PACKAGE && metadata == METADATA)
}

fn at_package(stack: &[Vec<u8>]) -> bool {
    matches!(stack, [package] if package == PACKAGE)
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), PatchError> {
    writer
        .write_event(event)
        .map_err(|e| PatchError::Xml(e.to_string()))
}

fn emit_notes_element(writer: &mut Writer<Vec<u8>>, notes: &str) -> Result<(), PatchError> {
    emit(writer, Event::Start(BytesStart::new(RELEASE_NOTES)))?;
    emit(writer, Event::Text(BytesText::new(notes)))?;
    emit(writer, Event::End(BytesEnd::new(RELEASE_NOTES)))
}

/// Rewrite `xml` with `notes` as the content of `package/metadata/releaseNotes`.
fn set_release_notes(xml: &str, notes: &str) -> Result<String, PatchError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());

    // Local names of the open elements outside the element being replaced.
    let mut stack: Vec<Vec<u8>> = Vec::new();
    // Nesting depth inside the original releaseNotes, whose content is dropped.
    let mut skip_depth = 0usize;
    let mut saw_metadata = false;
    let mut patched = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| PatchError::Xml(format!("at byte {}: {}", reader.buffer_position(), e)))?;

        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(end) => {
                    skip_depth -= 1;
                    if skip_depth == 0 {
                        stack.pop();
                        emit(&mut writer, Event::End(end))?;
                    }
                }
                Event::Eof => return Err(PatchError::Xml("unexpected end of document".into())),
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(start) => {
                let name = start.local_name().as_ref().to_vec();
                let replace = !patched && at_metadata(&stack) && name == RELEASE_NOTES.as_bytes();
                stack.push(name);
                saw_metadata |= at_metadata(&stack);

                emit(&mut writer, Event::Start(start))?;
                if replace {
                    emit(&mut writer, Event::Text(BytesText::new(notes)))?;
                    skip_depth = 1;
                    patched = true;
                }
            }
            Event::Empty(empty) => {
                let name = empty.local_name().as_ref().to_vec();
                if !patched && at_metadata(&stack) && name == RELEASE_NOTES.as_bytes() {
                    let qname = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                    emit(&mut writer, Event::Start(empty))?;
                    emit(&mut writer, Event::Text(BytesText::new(notes)))?;
                    emit(&mut writer, Event::End(BytesEnd::new(qname)))?;
                    patched = true;
                } else if !saw_metadata && at_package(&stack) && name == METADATA {
                    let qname = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                    emit(&mut writer, Event::Start(empty))?;
                    emit_notes_element(&mut writer, notes)?;
                    emit(&mut writer, Event::End(BytesEnd::new(qname)))?;
                    saw_metadata = true;
                    patched = true;
                } else {
                    emit(&mut writer, Event::Empty(empty))?;
                }
            }
            Event::End(end) => {
                if !patched && at_metadata(&stack) {
                    emit_notes_element(&mut writer, notes)?;
                    patched = true;
                }
                stack.pop();
                emit(&mut writer, Event::End(end))?;
            }
            Event::Eof => break,
            other => emit(&mut writer, other)?,
        }
    }

    if !saw_metadata {
        return Err(PatchError::MissingMetadata);
    }

    String::from_utf8(writer.into_inner()).map_err(|e| PatchError::Xml(e.to_string()))
}
