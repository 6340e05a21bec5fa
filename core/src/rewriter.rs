//! # Tag Rewriting
//!
//! Walks a [`SyntaxTree`] and rewrites the designated key of every field tag
//! to lower camel case.

use crate::case::to_lower_camel_case;
use crate::config::TransformOptions;
use crate::error::{AppError, AppResult};
use crate::parser::{NodeId, NodeKind, SyntaxTree, TagLiteral};
use crate::tags::TagList;
use tracing::{trace, warn};

/// `encoding/json` reads this name as "skip the field"; it is never renamed.
const SKIP_NAME: &str = "-";

/// Counters collected during a rewrite.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteReport {
    /// Field declarations visited.
    pub fields: usize,
    /// Fields carrying a tag.
    pub tagged: usize,
    /// Tag names that changed.
    pub renamed: usize,
    /// Malformed tag fragments passed through.
    pub malformed: usize,
}

/// Rewrites the tags of `tree` in place.
///
/// Every entry under `options.key` gets its name converted to lower camel case,
/// with one exception: the name `-` is left as is, since converting it would
/// give an empty name and make `encoding/json` stop skipping the field.
///
/// In lenient mode malformed fragments are kept verbatim; in strict mode the
/// first one aborts the run with [`AppError::Tag`].
pub fn rewrite(tree: &mut SyntaxTree, options: &TransformOptions) -> AppResult<RewriteReport> {
    let mut rewriter = Rewriter {
        options,
        file_name: tree.file_name().to_string(),
        report: RewriteReport::default(),
    };
    let root = tree.root();
    rewriter.visit(tree, root)?;
    Ok(rewriter.report)
}

struct Rewriter<'a> {
    options: &'a TransformOptions,
    file_name: String,
    report: RewriteReport,
}

impl Rewriter<'_> {
    fn visit(&mut self, tree: &mut SyntaxTree, id: NodeId) -> AppResult<()> {
        if let NodeKind::Field(field) = &mut tree.node_mut(id).kind {
            self.report.fields += 1;
            if let Some(tag) = field.tag.as_mut() {
                self.report.tagged += 1;
                self.rewrite_tag(tag)?;
            }
        }

        let children = tree.node(id).children.clone();
        for child in children {
            self.visit(tree, child)?;
        }
        Ok(())
    }

    fn rewrite_tag(&mut self, tag: &mut TagLiteral) -> AppResult<()> {
        let line = tag.span.start_row + 1;
        let column = tag.span.start_column + 1;

        let Some(content) = tag.content() else {
            return self.malformed(line, column, "undecodable tag literal");
        };

        let mut list = TagList::parse(&content);
        let errors: Vec<String> = list.errors().map(|e| e.to_string()).collect();
        for reason in &errors {
            self.malformed(line, column, reason)?;
        }

        let key = self.options.key.as_str();
        let mut changed = false;
        for entry in list.tags_mut().filter(|t| t.key() == key) {
            if entry.name() == SKIP_NAME {
                continue;
            }
            let old = entry.name().to_string();
            if entry.set_name(to_lower_camel_case(&old)) {
                trace!(
                    "{}:{}:{}: {} -> {}",
                    self.file_name,
                    line,
                    column,
                    old,
                    entry.name()
                );
                self.report.renamed += 1;
                changed = true;
            }
        }

        // Serialization is lossless, so untouched literals keep their exact spelling.
        if changed {
            tag.set_content(&list.to_string());
        }
        Ok(())
    }

    fn malformed(&mut self, line: usize, column: usize, reason: &str) -> AppResult<()> {
        if self.options.strict {
            return Err(AppError::Tag(format!(
                "{}:{}:{}: {}",
                self.file_name, line, column, reason
            )));
        }
        warn!(
            "{}:{}:{}: keeping malformed struct tag fragment ({})",
            self.file_name, line, column, reason
        );
        self.report.malformed += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn tags_after(code: &str, options: &TransformOptions) -> (Vec<Option<String>>, RewriteReport) {
        let mut tree = parse_source(code, "t.go").unwrap();
        let report = rewrite(&mut tree, options).unwrap();
        let tags = tree
            .fields()
            .map(|(_, f)| f.tag.as_ref().map(|t| t.text.clone()))
            .collect();
        (tags, report)
    }

    #[test]
    fn test_rewrites_designated_key_only() {
        let code = "package p\n\ntype T struct {\n\tA string `json:\"my_field_name\" yaml:\"my_field_name\"`\n\tB int\n}\n";
        let (tags, report) = tags_after(code, &TransformOptions::default());
        assert_eq!(
            tags,
            vec![
                Some("`json:\"myFieldName\" yaml:\"my_field_name\"`".to_string()),
                None
            ]
        );
        assert_eq!(
            report,
            RewriteReport {
                fields: 2,
                tagged: 1,
                renamed: 1,
                malformed: 0
            }
        );
    }

    #[test]
    fn test_other_key_can_be_designated() {
        let code = "package p\n\ntype T struct {\n\tA string `json:\"my_field\" yaml:\"my_field\"`\n}\n";
        let (tags, _) = tags_after(code, &TransformOptions::new("yaml"));
        assert_eq!(tags[0].as_deref(), Some("`json:\"my_field\" yaml:\"myField\"`"));
    }

    #[test]
    fn test_visits_nested_and_repeated_structs() {
        let code = r#"package p

type Outer struct {
	Inner struct {
		Deep_Name string `json:"deep_name"`
	} `json:"inner_value"`
}

type Second struct {
	X int `json:"x_y"`
}
"#;
        let (tags, report) = tags_after(code, &TransformOptions::default());
        assert_eq!(report.fields, 3);
        assert_eq!(report.renamed, 3);
        assert!(tags.contains(&Some("`json:\"deepName\"`".to_string())));
        assert!(tags.contains(&Some("`json:\"innerValue\"`".to_string())));
        assert!(tags.contains(&Some("`json:\"xY\"`".to_string())));
    }

    #[test]
    fn test_skip_name_and_options_preserved() {
        let code = "package p\n\ntype T struct {\n\tA string `json:\"-\"`\n\tB int `json:\"f2,omitempty\"`\n\tC int `json:\",omitempty\"`\n}\n";
        let (tags, report) = tags_after(code, &TransformOptions::default());
        assert_eq!(tags[0].as_deref(), Some("`json:\"-\"`"));
        assert_eq!(tags[1].as_deref(), Some("`json:\"f2,omitempty\"`"));
        assert_eq!(tags[2].as_deref(), Some("`json:\",omitempty\"`"));
        assert_eq!(report.renamed, 0);
    }

    #[test]
    fn test_interpreted_literal_is_requoted() {
        let code = "package p\n\ntype T struct {\n\tA string \"json:\\\"a_b\\\"\"\n}\n";
        let (tags, _) = tags_after(code, &TransformOptions::default());
        assert_eq!(tags[0].as_deref(), Some("\"json:\\\"aB\\\"\""));
    }

    #[test]
    fn test_malformed_fragment_is_tolerated() {
        let code = "package p\n\ntype T struct {\n\tA string `json:my_field yaml:\"x\" json:\"other_name\"`\n}\n";
        let (tags, report) = tags_after(code, &TransformOptions::default());
        assert_eq!(
            tags[0].as_deref(),
            Some("`json:my_field yaml:\"x\" json:\"otherName\"`")
        );
        assert_eq!(report.malformed, 1);
        assert_eq!(report.renamed, 1);
    }

    #[test]
    fn test_strict_mode_fails_on_malformed_fragment() {
        let code = "package p\n\ntype T struct {\n\tA string `json:my_field`\n}\n";
        let mut tree = parse_source(code, "t.go").unwrap();
        let err = rewrite(&mut tree, &TransformOptions::default().with_strict(true)).unwrap_err();
        match err {
            AppError::Tag(msg) => assert!(msg.starts_with("t.go:4:11:"), "msg: {}", msg),
            other => panic!("expected tag error, got {:?}", other),
        }
    }

    #[test]
    fn test_structure_is_preserved() {
        let code = "package p\n\n// doc\ntype T struct {\n\tA string `json:\"a_b\"` // c\n\tB, C int\n}\n";
        let mut tree = parse_source(code, "t.go").unwrap();
        let before: Vec<_> = tree
            .preorder()
            .into_iter()
            .map(|id| (id, tree.node(id).span, tree.node(id).children.clone()))
            .collect();
        rewrite(&mut tree, &TransformOptions::default()).unwrap();
        let after: Vec<_> = tree
            .preorder()
            .into_iter()
            .map(|id| (id, tree.node(id).span, tree.node(id).children.clone()))
            .collect();
        assert_eq!(before, after);
    }
}
