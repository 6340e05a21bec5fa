//! # Source Emission
//!
//! Serializes a rewritten [`SyntaxTree`] back to Go source.
//!
//! Unmodified regions are copied byte for byte. Besides the tag literals, the
//! only bytes that may change are the spaces in front of trailing field
//! comments: gofmt puts the comments of consecutive single-line fields in one
//! column, placed one space after the widest tag of that run, so a tag that
//! grows or shrinks moves the whole column.

use crate::error::{AppError, AppResult};
use crate::parser::{parse_source, NodeId, NodeKind, SyntaxTree};
use tracing::debug;

/// A replacement of `start..end` in the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

/// One field of a struct member list, as seen by the comment aligner.
#[derive(Debug)]
struct FieldLine {
    row: usize,
    single_line: bool,
    /// Offset where the field ends (after the tag, if any).
    end_byte: usize,
    old_tag_width: usize,
    new_tag_width: usize,
    /// Offset of a comment trailing the field on the same row.
    comment_start: Option<usize>,
}

/// Produces the source text of `tree`, with tag edits applied.
///
/// The source is assumed to be gofmt output already. Apart from the padding in
/// front of trailing field comments, no reformatting is done, so input that was
/// not gofmt-formatted comes back with its layout unchanged.
///
/// Fails with [`AppError::Format`] if the output would not parse back into a
/// tree of the same shape.
pub fn emit(tree: &SyntaxTree) -> AppResult<String> {
    let mut edits = tag_edits(tree);
    edits.extend(alignment_edits(tree));
    edits.sort_by_key(|e| e.start);

    let output = apply(tree.source(), &edits)?;
    debug!("{}: emitted with {} edit(s)", tree.file_name(), edits.len());

    verify(tree, &output)?;
    Ok(output)
}

fn tag_edits(tree: &SyntaxTree) -> Vec<Edit> {
    tree.fields()
        .filter_map(|(_, field)| field.tag.as_ref())
        .filter(|tag| tag.text != tree.text(&tag.span))
        .map(|tag| Edit {
            start: tag.span.start_byte,
            end: tag.span.end_byte,
            text: tag.text.clone(),
        })
        .collect()
}

fn alignment_edits(tree: &SyntaxTree) -> Vec<Edit> {
    let mut edits = Vec::new();
    for id in tree.preorder() {
        if tree.node(id).kind != NodeKind::FieldList {
            continue;
        }
        let lines = field_lines(tree, id);
        for block in comment_blocks(&lines) {
            realign(tree.source(), block, &mut edits);
        }
    }
    edits
}

fn field_lines(tree: &SyntaxTree, list: NodeId) -> Vec<FieldLine> {
    let children = &tree.node(list).children;
    let mut lines = Vec::new();

    for (idx, &child) in children.iter().enumerate() {
        let node = tree.node(child);
        let NodeKind::Field(field) = &node.kind else {
            continue;
        };

        let (old_tag_width, new_tag_width) = field
            .tag
            .as_ref()
            .map(|tag| {
                (
                    tree.text(&tag.span).chars().count(),
                    tag.text.chars().count(),
                )
            })
            .unwrap_or((0, 0));

        // The comment may be attached to the field itself or follow it in the list.
        let candidate = node
            .children
            .last()
            .into_iter()
            .chain(children.get(idx + 1))
            .map(|&c| tree.node(c))
            .find(|c| c.kind == NodeKind::Comment);

        // A comment attached to the field extends its span, so measure from the last real child.
        let end_byte = match field.tag.as_ref() {
            Some(tag) => tag.span.end_byte,
            None => node
                .children
                .iter()
                .map(|&c| tree.node(c))
                .filter(|c| c.kind != NodeKind::Comment)
                .map(|c| c.span.end_byte)
                .max()
                .unwrap_or(node.span.end_byte),
        };

        let comment_start = candidate
            .filter(|c| c.span.start_row == node.span.start_row)
            .map(|c| c.span.start_byte)
            .filter(|&start| start >= end_byte)
            .filter(|&start| {
                tree.source()
                    .get(end_byte..start)
                    .is_some_and(|gap| gap.chars().all(|ch| ch == ' ' || ch == '\t'))
            });

        lines.push(FieldLine {
            row: node.span.start_row,
            single_line: node.span.is_single_line(),
            end_byte,
            old_tag_width,
            new_tag_width,
            comment_start,
        });
    }

    lines
}

/// Splits field lines into maximal runs of adjacent single-line fields with trailing comments.
fn comment_blocks(lines: &[FieldLine]) -> Vec<&[FieldLine]> {
    let mut blocks = Vec::new();
    let mut start = 0;
    while start < lines.len() {
        if !(lines[start].single_line && lines[start].comment_start.is_some()) {
            start += 1;
            continue;
        }
        let mut end = start + 1;
        while end < lines.len()
            && lines[end].single_line
            && lines[end].comment_start.is_some()
            && lines[end].row == lines[end - 1].row + 1
        {
            end += 1;
        }
        blocks.push(&lines[start..end]);
        start = end;
    }
    blocks
}

fn realign(source: &str, block: &[FieldLine], edits: &mut Vec<Edit>) {
    let old_max = block.iter().map(|l| l.old_tag_width).max().unwrap_or(0) as isize;
    let new_max = block.iter().map(|l| l.new_tag_width).max().unwrap_or(0) as isize;

    for line in block {
        let Some(comment_start) = line.comment_start else {
            continue;
        };
        let shift = (new_max - old_max) - (line.new_tag_width as isize - line.old_tag_width as isize);
        if shift == 0 {
            continue;
        }
        let Some(gap) = source.get(line.end_byte..comment_start) else {
            continue;
        };
        // Tabs mean the file was not laid out by gofmt; leave it alone.
        if !gap.bytes().all(|b| b == b' ') {
            continue;
        }
        let width = (gap.len() as isize + shift).max(1) as usize;
        edits.push(Edit {
            start: line.end_byte,
            end: comment_start,
            text: " ".repeat(width),
        });
    }
}

fn apply(source: &str, edits: &[Edit]) -> AppResult<String> {
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.start < cursor || edit.end < edit.start {
            return Err(AppError::Format(format!(
                "Overlapping edit at byte {}",
                edit.start
            )));
        }
        let unchanged = source.get(cursor..edit.start).ok_or_else(|| {
            AppError::Format(format!("Edit at byte {} splits a character", edit.start))
        })?;
        out.push_str(unchanged);
        out.push_str(&edit.text);
        cursor = edit.end;
    }
    let rest = source
        .get(cursor..)
        .ok_or_else(|| AppError::Format(format!("Edit ending at byte {} splits a character", cursor)))?;
    out.push_str(rest);
    Ok(out)
}

fn verify(tree: &SyntaxTree, output: &str) -> AppResult<()> {
    let reparsed = match parse_source(output, tree.file_name()) {
        Ok(t) => t,
        Err(AppError::Parse(err)) => {
            return Err(AppError::Format(format!(
                "Rewritten source does not parse: {}",
                err
            )))
        }
        Err(e) => return Err(e),
    };

    if reparsed.len() != tree.len() {
        return Err(AppError::Format(format!(
            "{}: node count changed from {} to {}",
            tree.file_name(),
            tree.len(),
            reparsed.len()
        )));
    }
    if reparsed.fields().count() != tree.fields().count() {
        return Err(AppError::Format(format!(
            "{}: field count changed",
            tree.file_name()
        )));
    }
    Ok(())
}
