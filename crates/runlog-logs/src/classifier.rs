use regex::Regex;

use runlog_types::{ClassifiedLine, LineClass, Segment, SegmentStyle};

use crate::config::{ConfigError, MarkerConfig};

const OPEN_TAG: &str = "<span";
const CLOSE_TAG: &str = "</span>";

/// Classifies raw log lines as plain, error or warning.
///
/// Two sources decide the class of a line:
///
/// 1. Marker patterns (configurable regexes with a `body` group) matched
///    against the markup-free text, e.g. `ERROR: Variable X not found.`
/// 2. Inline highlighting markup from the log producer,
///    `<span class="log-error">...</span>`, used when no marker matches.
///
/// Anything malformed or ambiguous classifies as plain. Classification never
/// fails once the classifier is built.
#[derive(Clone, Debug)]
pub struct LineClassifier {
    error: Regex,
    warning: Regex,
}

impl LineClassifier {
    /// Compile the marker patterns
    pub fn new(markers: &MarkerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            error: compile_marker("error", &markers.error)?,
            warning: compile_marker("warning", &markers.warning)?,
        })
    }

    /// Classify every line of a raw log
    pub fn classify(&self, raw: &str) -> Vec<ClassifiedLine> {
        raw.lines()
            .enumerate()
            .map(|(index, line)| self.classify_line(index, line))
            .collect()
    }

    /// Classify a single line
    pub fn classify_line(&self, index: usize, raw: &str) -> ClassifiedLine {
        let Some(segments) = parse_markup(raw) else {
            return ClassifiedLine {
                index,
                class: LineClass::Plain,
                text: raw.to_string(),
                segments: vec![Segment::plain(raw)],
            };
        };

        let text: String = segments.iter().map(|s| s.text.as_str()).collect();
        let class = self
            .marker_class(&text)
            .unwrap_or_else(|| markup_class(&segments, &text));

        ClassifiedLine {
            index,
            class,
            text,
            segments,
        }
    }

    /// Class from marker patterns. `None` means no marker matched.
    fn marker_class(&self, text: &str) -> Option<LineClass> {
        let error = capture_body(&self.error, text);
        let warning = capture_body(&self.warning, text);

        match (error, warning) {
            (Some(body), None) => Some(LineClass::Error { body }),
            (None, Some(body)) => Some(LineClass::Warning { body }),
            // Both patterns claim the line
            (Some(_), Some(_)) => Some(LineClass::Plain),
            (None, None) => None,
        }
    }
}

fn compile_marker(kind: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidMarker { kind, source })?;
    if !regex.capture_names().flatten().any(|name| name == "body") {
        return Err(ConfigError::MissingBodyGroup { kind });
    }
    Ok(regex)
}

fn capture_body(regex: &Regex, text: &str) -> Option<String> {
    regex.captures(text).map(|caps| {
        caps.name("body")
            .map(|m| m.as_str().trim_end().to_string())
            .unwrap_or_default()
    })
}

/// Class implied by markup alone
fn markup_class(segments: &[Segment], text: &str) -> LineClass {
    let has_error = segments.iter().any(|s| s.style == SegmentStyle::Error);
    let has_warning = segments.iter().any(|s| s.style == SegmentStyle::Warning);

    match (has_error, has_warning) {
        (true, false) => LineClass::Error {
            body: text.trim().to_string(),
        },
        (false, true) => LineClass::Warning {
            body: text.trim().to_string(),
        },
        _ => LineClass::Plain,
    }
}

/// Split a line into styled segments, removing span tags.
///
/// Returns `None` for malformed markup: nested or unclosed spans, stray
/// closing tags, unterminated tags or attributes.
fn parse_markup(line: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut open: Option<SegmentStyle> = None;
    let mut rest = line;

    while let Some(pos) = rest.find('<') {
        let (before, tail) = rest.split_at(pos);
        buf.push_str(before);

        if tail.starts_with(CLOSE_TAG) {
            let style = open.take()?;
            flush(&mut segments, &mut buf, style);
            rest = &tail[CLOSE_TAG.len()..];
        } else if is_open_tag(tail) {
            if open.is_some() {
                return None;
            }
            let end = tag_end(tail)?;
            let style = span_style(&tail[OPEN_TAG.len()..end])?;
            flush(&mut segments, &mut buf, SegmentStyle::Plain);
            open = Some(style);
            rest = &tail[end + 1..];
        } else {
            // A literal '<', e.g. "if x < 3"
            buf.push('<');
            rest = &tail[1..];
        }
    }
    buf.push_str(rest);

    if open.is_some() {
        return None;
    }
    flush(&mut segments, &mut buf, SegmentStyle::Plain);

    Some(segments)
}

/// Byte offset of the '>' closing a tag, skipping quoted attribute values.
/// `None` when the tag or one of its quotes is never closed.
fn tag_end(tail: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in tail.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            (None, _) => {}
        }
    }
    None
}

fn is_open_tag(tail: &str) -> bool {
    tail.strip_prefix(OPEN_TAG)
        .and_then(|after| after.chars().next())
        .is_some_and(|c| c == '>' || c.is_whitespace())
}

/// Style from the attribute text of an opening tag (`class="log-error"`)
fn span_style(attrs: &str) -> Option<SegmentStyle> {
    let Some(pos) = attrs.find("class=") else {
        return Some(SegmentStyle::Emphasis);
    };
    let value = &attrs[pos + "class=".len()..];

    let classes = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = &value[1..];
            let end = inner.find(quote)?;
            &inner[..end]
        }
        _ => value.split_whitespace().next().unwrap_or(""),
    };

    Some(
        classes
            .split_whitespace()
            .map(SegmentStyle::from_class)
            .find(|style| *style != SegmentStyle::Emphasis)
            .unwrap_or(SegmentStyle::Emphasis),
    )
}

fn flush(segments: &mut Vec<Segment>, buf: &mut String, style: SegmentStyle) {
    if !buf.is_empty() {
        segments.push(Segment::new(std::mem::take(buf), style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runlog_types::LineKind;

    fn default_classifier() -> LineClassifier {
        LineClassifier::new(&MarkerConfig::default()).unwrap()
    }

    fn classify(line: &str) -> ClassifiedLine {
        default_classifier().classify_line(0, line)
    }

    #[test]
    fn test_plain_line() {
        let line = classify("NOTE: The data set WORK.A has 10 observations.");
        assert_eq!(line.kind(), LineKind::Plain);
        assert_eq!(line.text, "NOTE: The data set WORK.A has 10 observations.");
    }

    #[test]
    fn test_error_marker() {
        let line = classify("ERROR: Variable X not found.");
        assert_eq!(
            line.class,
            LineClass::Error {
                body: "Variable X not found.".to_string()
            }
        );
    }

    #[test]
    fn test_numbered_error_marker() {
        let line = classify("ERROR 22-322: Syntax error, expecting one of the following: ;.");
        assert_eq!(line.kind(), LineKind::Error);
        assert_eq!(
            line.class.body(),
            Some("Syntax error, expecting one of the following: ;.")
        );
    }

    #[test]
    fn test_warning_marker() {
        let line = classify("WARNING: Apparent symbolic reference N not resolved.");
        assert_eq!(line.kind(), LineKind::Warning);
        assert_eq!(
            line.class.body(),
            Some("Apparent symbolic reference N not resolved.")
        );
    }

    #[test]
    fn test_marker_must_start_line() {
        let line = classify("  put 'ERROR: not really';");
        assert_eq!(line.kind(), LineKind::Plain);
    }

    #[test]
    fn test_markup_is_stripped() {
        let line = classify(r#"<span class="log-error">ERROR: bad</span> value"#);
        assert_eq!(line.text, "ERROR: bad value");
        assert_eq!(line.kind(), LineKind::Error);
        assert_eq!(line.class.body(), Some("bad value"));
        assert_eq!(
            line.segments,
            vec![
                Segment::new("ERROR: bad", SegmentStyle::Error),
                Segment::plain(" value"),
            ]
        );
    }

    #[test]
    fn test_markup_alone_classifies() {
        let line = classify(r#"step <span class='warning'>ended early</span>"#);
        assert_eq!(line.text, "step ended early");
        assert_eq!(
            line.class,
            LineClass::Warning {
                body: "step ended early".to_string()
            }
        );
    }

    #[test]
    fn test_multiple_classes_on_span() {
        let line = classify(r#"<span class="log-line log-warning">careful</span>"#);
        assert_eq!(line.segments[0].style, SegmentStyle::Warning);
    }

    #[test]
    fn test_span_without_class_is_emphasis() {
        let line = classify("<span>bold</span> text");
        assert_eq!(line.kind(), LineKind::Plain);
        assert_eq!(line.segments[0], Segment::new("bold", SegmentStyle::Emphasis));
    }

    #[test]
    fn test_conflicting_markup_is_plain() {
        let line = classify(
            r#"<span class="log-error">a</span> <span class="log-warning">b</span>"#,
        );
        assert_eq!(line.kind(), LineKind::Plain);
        assert_eq!(line.text, "a b");
    }

    #[test]
    fn test_unclosed_span_degrades() {
        let raw = r#"<span class="log-error">ERROR: broken"#;
        let line = classify(raw);
        assert_eq!(line.kind(), LineKind::Plain);
        assert_eq!(line.text, raw);
        assert_eq!(line.segments, vec![Segment::plain(raw)]);
    }

    #[test]
    fn test_nested_span_degrades() {
        let raw = r#"<span class="a"><span class="log-error">x</span></span>"#;
        let line = classify(raw);
        assert_eq!(line.kind(), LineKind::Plain);
        assert_eq!(line.text, raw);
    }

    #[test]
    fn test_stray_close_degrades() {
        let raw = "ERROR: oops</span>";
        let line = classify(raw);
        assert_eq!(line.kind(), LineKind::Plain);
        assert_eq!(line.text, raw);
    }

    #[test]
    fn test_unterminated_attribute_degrades() {
        let raw = r#"<span class="log-error>ERROR: x</span>"#;
        assert_eq!(classify(raw).kind(), LineKind::Plain);
    }

    #[test]
    fn test_quoted_angle_bracket_in_attribute() {
        let line = classify(r#"<span class="log-note" title="a>b">NOTE: x</span>"#);
        assert_eq!(line.text, "NOTE: x");
        assert_eq!(line.segments, vec![Segment::new("NOTE: x", SegmentStyle::Note)]);
        assert_eq!(line.kind(), LineKind::Plain);

        let line = classify(r#"<span class='log-error' data-x='1>0'>ERROR: boom</span>"#);
        assert_eq!(line.text, "ERROR: boom");
        assert_eq!(
            line.class,
            LineClass::Error {
                body: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_unbalanced_quote_degrades() {
        let raw = r#"<span class="log-note" title="a>NOTE: x</span>"#;
        let line = classify(raw);
        assert_eq!(line.kind(), LineKind::Plain);
        assert_eq!(line.text, raw);
    }

    #[test]
    fn test_literal_angle_brackets() {
        let line = classify("if x < 3 and y <spanner> 2 then");
        assert_eq!(line.text, "if x < 3 and y <spanner> 2 then");
        assert_eq!(line.kind(), LineKind::Plain);
    }

    #[test]
    fn test_multibyte_text_no_panic() {
        let line = classify("<span class=\"log-note\">╭──── ✓ ────╮</span>");
        assert_eq!(line.text, "╭──── ✓ ────╮");
        assert_eq!(line.segments[0].style, SegmentStyle::Note);
    }

    #[test]
    fn test_classify_lines() {
        let lines = default_classifier().classify("a\r\nERROR: b\nWARNING: c\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "a");
        assert_eq!(lines[1].index, 1);
        assert_eq!(lines[1].kind(), LineKind::Error);
        assert_eq!(lines[2].kind(), LineKind::Warning);
    }

    #[test]
    fn test_empty_log() {
        assert!(default_classifier().classify("").is_empty());
    }

    #[test]
    fn test_custom_markers() {
        let markers = MarkerConfig {
            error: r"^E\d+ (?P<body>.*)$".to_string(),
            warning: r"^W\d+ (?P<body>.*)$".to_string(),
        };
        let classifier = LineClassifier::new(&markers).unwrap();
        assert_eq!(
            classifier.classify_line(0, "E42 boom").class,
            LineClass::Error {
                body: "boom".to_string()
            }
        );
        assert_eq!(
            classifier.classify_line(0, "ERROR: boom").kind(),
            LineKind::Plain
        );
    }

    #[test]
    fn test_overlapping_markers_are_plain() {
        let markers = MarkerConfig {
            error: r"^!(?P<body>.*)$".to_string(),
            warning: r"^!!(?P<body>.*)$".to_string(),
        };
        let classifier = LineClassifier::new(&markers).unwrap();
        assert_eq!(classifier.classify_line(0, "!!x").kind(), LineKind::Plain);
        assert_eq!(classifier.classify_line(0, "!x").kind(), LineKind::Error);
    }

    #[test]
    fn test_invalid_marker_pattern() {
        let markers = MarkerConfig {
            error: "(".to_string(),
            ..MarkerConfig::default()
        };
        let err = LineClassifier::new(&markers).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMarker { kind: "error", .. }));
    }

    #[test]
    fn test_marker_without_body_group() {
        let markers = MarkerConfig {
            warning: "^WARNING:".to_string(),
            ..MarkerConfig::default()
        };
        let err = LineClassifier::new(&markers).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBodyGroup { kind: "warning" }));
    }
}
