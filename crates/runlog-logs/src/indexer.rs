use runlog_types::{ClassifiedLine, Diagnostic, DiagnosticKind, LineClass};

/// Errors and warnings extracted from a classified log
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticIndex {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Builds the diagnostic lists from classified lines
pub struct DiagnosticIndexer;

impl DiagnosticIndexer {
    /// Collect diagnostics, ordered by line with per-kind sequence ids
    pub fn index(lines: &[ClassifiedLine]) -> DiagnosticIndex {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for line in lines {
            match &line.class {
                LineClass::Plain => {}
                LineClass::Error { body } => {
                    errors.push(diagnostic(DiagnosticKind::Error, body, line.index))
                }
                LineClass::Warning { body } => {
                    warnings.push(diagnostic(DiagnosticKind::Warning, body, line.index))
                }
            }
        }

        DiagnosticIndex {
            errors: sequence(errors),
            warnings: sequence(warnings),
        }
    }
}

fn diagnostic(kind: DiagnosticKind, body: &str, line: usize) -> Diagnostic {
    Diagnostic {
        kind,
        body: body.to_string(),
        line,
        sequence_id: 0,
    }
}

/// Sort by line and number in that order
fn sequence(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics.sort_by_key(|d| d.line);
    for (sequence_id, d) in diagnostics.iter_mut().enumerate() {
        d.sequence_id = sequence_id;
    }
    diagnostics
}

impl DiagnosticIndex {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// All diagnostics merged in line order
    pub fn by_line(&self) -> Vec<&Diagnostic> {
        by_line(&self.errors, &self.warnings)
    }
}

/// Merge two line-ordered lists
pub fn by_line<'a>(errors: &'a [Diagnostic], warnings: &'a [Diagnostic]) -> Vec<&'a Diagnostic> {
    let mut merged: Vec<&Diagnostic> = errors.iter().chain(warnings.iter()).collect();
    merged.sort_by_key(|d| d.line);
    merged
}

/// Number of diagnostics whose line falls in `start..=end`
pub fn count_in_range(diagnostics: &[Diagnostic], start: usize, end: usize) -> usize {
    let lo = diagnostics.partition_point(|d| d.line < start);
    let hi = diagnostics.partition_point(|d| d.line <= end);
    hi - lo
}

/// A heading plus its entries in the diagnostic tree
#[derive(Clone, Debug)]
pub struct DiagnosticGroup<'a> {
    pub kind: DiagnosticKind,
    pub entries: &'a [Diagnostic],
}

impl DiagnosticGroup<'_> {
    /// Heading text, e.g. "Errors (3)"
    pub fn heading(&self) -> String {
        format!("{} ({})", self.kind.label(), self.entries.len())
    }
}

/// Diagnostics arranged for a collapsible tree: errors first, then warnings
#[derive(Clone, Debug)]
pub struct DiagnosticTree<'a> {
    pub groups: [DiagnosticGroup<'a>; 2],
}

impl<'a> DiagnosticTree<'a> {
    pub fn new(errors: &'a [Diagnostic], warnings: &'a [Diagnostic]) -> Self {
        Self {
            groups: [
                DiagnosticGroup {
                    kind: DiagnosticKind::Error,
                    entries: errors,
                },
                DiagnosticGroup {
                    kind: DiagnosticKind::Warning,
                    entries: warnings,
                },
            ],
        }
    }

    pub fn empty() -> Self {
        Self::new(&[], &[])
    }

    /// Selectable entries in display order
    pub fn entries(&self) -> impl Iterator<Item = &'a Diagnostic> + '_ {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry at a flat position
    pub fn get(&self, position: usize) -> Option<&'a Diagnostic> {
        let [errors, warnings] = &self.groups;
        match position.checked_sub(errors.entries.len()) {
            None => errors.entries.get(position),
            Some(rest) => warnings.entries.get(rest),
        }
    }

    /// Display rows: one heading per group plus its entries
    pub fn row_count(&self) -> usize {
        self.len() + self.groups.len()
    }

    /// Display row of the entry at a flat position
    pub fn row_of(&self, position: usize) -> usize {
        if position < self.groups[0].entries.len() {
            position + 1
        } else {
            position + 2
        }
    }

    /// What sits at a display row
    pub fn row(&self, row: usize) -> Option<TreeRow<'a>> {
        let [errors, warnings] = &self.groups;
        let first = errors.entries.len() + 1;
        match row {
            0 => Some(TreeRow::Heading(errors.clone())),
            r if r < first => Some(TreeRow::Entry {
                position: r - 1,
                diagnostic: &errors.entries[r - 1],
            }),
            r if r == first => Some(TreeRow::Heading(warnings.clone())),
            r => warnings.entries.get(r - first - 1).map(|diagnostic| TreeRow::Entry {
                position: r - 2,
                diagnostic,
            }),
        }
    }
}

/// One display row of the diagnostic tree
#[derive(Clone, Debug)]
pub enum TreeRow<'a> {
    Heading(DiagnosticGroup<'a>),
    Entry {
        /// Flat position, as used by [`DiagnosticTree::get`]
        position: usize,
        diagnostic: &'a Diagnostic,
    },
}
