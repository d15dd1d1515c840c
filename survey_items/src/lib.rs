/*!
Summaries of "hot" satisfaction surveys exported as delimited text.

The export holds one block of item columns named `"<item label>.<modality>"`, where
each column counts the respondents who picked that modality, or holds their
free-text comment when the modality is `Commentaire`. The last row of the export is
a totals row computed by the survey tool. A few open questions sit further right,
at fixed positions.

```
use survey_items::builder::Builder;
use survey_items::*;

let mut builder = Builder::from_names(&[
    "id", "tech", "Accueil.Satisfait", "Accueil.Très satisfait", "Accueil.Commentaire",
])?;
builder.add_row_simple(&["1", "a", "", "1", "Bien"])?;
builder.add_row_simple(&["2", "b", "1", "", ""])?;
builder.add_row_simple(&["", "", "1", "1", ""])?;

let report = build_report(&builder.build(), &ReportRules::default())?;
let item = &report.items[0];
assert_eq!(item.label, "Accueil");
assert_eq!(item.comments, vec!["Bien".to_string()]);
if let Distribution::Counts { total, modalities } = &item.distribution {
    assert_eq!(*total, 2);
    // Satisfaction levels are always displayed from best to worst.
    assert_eq!(modalities[0].label, "Très satisfait");
}
# Ok::<(), SurveyErrors>(())
```
*/
mod config;
pub mod builder;
pub mod decode;
pub mod manual;

use log::{debug, info, warn};

use std::collections::HashMap;

pub use crate::config::*;
pub use crate::decode::{decode_table, DEFAULT_DELIMITER};

// **** Column selection ****

/// The item block of a table: a window of columns, split between the totals row
/// and the rows of the respondents.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ItemBlock<'a> {
    /// (position in the table, display name) for each column of the window.
    pub columns: Vec<(usize, &'a str)>,
    /// The last row. Missing when the table only has a header.
    pub totals: Option<&'a [String]>,
    /// All the other rows, in order.
    pub responses: &'a [Vec<String>],
}

/// Restricts the table to the given window of columns.
///
/// The window is clipped to the width of the table: a file narrower than expected is
/// not an error.
pub fn select_columns(table: &RawTable, window: ColumnWindow) -> ItemBlock<'_> {
    let clipped = window.clip(table.num_columns());
    if clipped != window {
        debug!(
            "select_columns: window {:?} clipped to {:?}",
            window, clipped
        );
    }
    let columns: Vec<(usize, &str)> = (clipped.start..clipped.end)
        .map(|idx| (idx, table.header[idx].as_str()))
        .collect();
    let (totals, responses) = match table.rows.split_last() {
        Some((last, rest)) => (Some(last.as_slice()), rest),
        None => (None, &table.rows[..]),
    };
    ItemBlock {
        columns,
        totals,
        responses,
    }
}

// **** Item grouping ****

/// The columns that belong to one item.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ItemColumns {
    pub label: String,
    /// (modality label, column position), in the order of the columns.
    pub modality_columns: Vec<(String, usize)>,
    pub comment_columns: Vec<usize>,
}

impl ItemColumns {
    fn new(label: &str) -> ItemColumns {
        ItemColumns {
            label: label.to_string(),
            modality_columns: Vec::new(),
            comment_columns: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modality_columns.is_empty() && self.comment_columns.is_empty()
    }
}

/// Splits a column name on the last delimiter into (item label, modality).
///
/// A name without delimiter is an item on its own, with an empty modality.
pub fn split_column_name(name: &str) -> (&str, &str) {
    match name.rsplit_once(MODALITY_DELIMITER) {
        Some((base, modality)) => (base.trim(), modality.trim()),
        None => (name.trim(), ""),
    }
}

pub fn is_comment_modality(modality: &str) -> bool {
    modality.to_lowercase().contains(COMMENT_MARKER)
}

/// Groups the columns of the block by item label.
///
/// Items come in the order of their first column.
pub fn group_items(block: &ItemBlock) -> Vec<ItemColumns> {
    let mut items: Vec<ItemColumns> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (col, name) in block.columns.iter() {
        let (base, modality) = split_column_name(name);
        let item_idx = *index.entry(base.to_string()).or_insert_with(|| {
            items.push(ItemColumns::new(base));
            items.len() - 1
        });
        let item = &mut items[item_idx];
        if is_comment_modality(modality) {
            item.comment_columns.push(*col);
        } else {
            item.modality_columns.push((modality.to_string(), *col));
        }
    }
    debug!(
        "group_items: {} columns grouped into {} items",
        block.columns.len(),
        items.len()
    );
    items
}

// **** Distributions ****

/// Reads a count from the totals row. Anything that is not a number counts as zero.
pub fn parse_count(cell: Option<&str>) -> i64 {
    let s = match cell {
        Some(s) => s.trim(),
        None => return 0,
    };
    if let Ok(x) = s.parse::<i64>() {
        return x;
    }
    // Some tools write integral counts as floats.
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() && x.abs() < i64::MAX as f64 => x.trunc() as i64,
        _ => 0,
    }
}

/// Rounds to one decimal on the exact binary value, ties to even.
fn round_one_decimal(x: f64) -> f64 {
    format!("{:.1}", x).parse::<f64>().unwrap_or(x)
}

fn satisfaction_rank(label: &str) -> Option<usize> {
    SATISFACTION_SCALE
        .iter()
        .position(|(level, _)| *level == label)
}

/// True if every label is a level of the satisfaction scale.
pub fn is_satisfaction_scale(labels: &[&str]) -> bool {
    labels.iter().all(|l| satisfaction_rank(l).is_some())
}

/// Computes the distribution of answers of an item from the totals row.
pub fn aggregate_distribution(item: &ItemColumns, totals: Option<&[String]>) -> Distribution {
    if item.modality_columns.is_empty() {
        return Distribution::NoModalities;
    }
    let totals = match totals {
        Some(t) => t,
        None => return Distribution::NoTotal,
    };

    let counts: Vec<(&str, i64)> = item
        .modality_columns
        .iter()
        .map(|(label, col)| {
            let cell = totals.get(*col).map(|s| s.as_str());
            let count = parse_count(cell);
            if count == 0 && cell.map_or(false, |s| !s.trim().is_empty() && s.trim() != "0") {
                debug!(
                    "aggregate_distribution: item {:?}: unreadable count {:?} for {:?}",
                    item.label, cell, label
                );
            }
            (label.as_str(), count)
        })
        .collect();
    let total: i64 = match counts
        .iter()
        .try_fold(0i64, |acc, (_, c)| acc.checked_add(*c))
    {
        Some(t) => t,
        None => {
            debug!(
                "aggregate_distribution: item {:?}: the counts overflow, no total available",
                item.label
            );
            return Distribution::NoTotal;
        }
    };
    if total <= 0 {
        debug!(
            "aggregate_distribution: item {:?}: no total available",
            item.label
        );
        return Distribution::NoTotal;
    }

    let labels: Vec<&str> = counts.iter().map(|(l, _)| *l).collect();
    let mut modalities: Vec<ModalityCount> = counts
        .iter()
        .map(|(label, count)| ModalityCount {
            label: label.to_string(),
            count: *count,
            percentage: round_one_decimal(*count as f64 / total as f64 * 100.0),
            color: String::new(),
        })
        .collect();

    if is_satisfaction_scale(&labels) {
        // A stable sort keeps the source order among duplicated levels.
        modalities.sort_by_key(|m| satisfaction_rank(&m.label));
        for m in modalities.iter_mut() {
            if let Some(rank) = satisfaction_rank(&m.label) {
                m.color = SATISFACTION_SCALE[rank].1.to_string();
            }
        }
    } else {
        let mut seen: Vec<String> = Vec::new();
        for m in modalities.iter_mut() {
            let idx = match seen.iter().position(|l| *l == m.label) {
                Some(idx) => idx,
                None => {
                    seen.push(m.label.clone());
                    seen.len() - 1
                }
            };
            m.color = CATEGORY_PALETTE[idx % CATEGORY_PALETTE.len()].to_string();
        }
    }

    Distribution::Counts { total, modalities }
}

// **** Comments ****

fn non_empty_cells(rows: &[Vec<String>], column: usize) -> impl Iterator<Item = String> + '_ {
    rows.iter()
        .filter_map(move |row| row.get(column))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Collects the free-text answers of an item, column by column, then row by row.
///
/// The totals row is never part of `responses`.
pub fn collect_comments(item: &ItemColumns, responses: &[Vec<String>]) -> Vec<String> {
    item.comment_columns
        .iter()
        .flat_map(|col| non_empty_cells(responses, *col))
        .collect()
}

// **** Open questions ****

/// The label of an open question: the column name without its `.Commentaire` suffix,
/// or the text before the first delimiter.
pub fn open_question_label(name: &str) -> String {
    if name.contains(COMMENT_SUFFIX) {
        name.replace(COMMENT_SUFFIX, "").trim().to_string()
    } else {
        name.split(MODALITY_DELIMITER)
            .next()
            .unwrap_or("")
            .trim()
            .to_string()
    }
}

/// Extracts the open questions at the given positions of the full table.
///
/// Positions beyond the width of the table are skipped. The last row of the table is
/// a summary row and is never read.
pub fn extract_open_questions(table: &RawTable, positions: &[usize]) -> Vec<OpenQuestionReport> {
    let respondents: &[Vec<String>] = match table.rows.split_last() {
        Some((_, rest)) => rest,
        None => &[],
    };
    let mut res: Vec<OpenQuestionReport> = Vec::new();
    for pos in positions.iter() {
        let name = match table.column_name(*pos) {
            Some(name) => name,
            None => {
                debug!(
                    "extract_open_questions: column {} is beyond the {} columns of the table, skipping",
                    pos,
                    table.num_columns()
                );
                continue;
            }
        };
        let responses: Vec<String> = non_empty_cells(respondents, *pos).collect();
        debug!(
            "extract_open_questions: column {} ({:?}): {} responses",
            pos,
            name,
            responses.len()
        );
        res.push(OpenQuestionReport {
            column: *pos,
            label: open_question_label(name),
            responses,
        });
    }
    res
}

/// Looks for signs that the configured positions do not match the layout of the table.
///
/// The open questions are found by position only. Nothing correlates them with the
/// item block, so a change in the export silently moves them to other columns.
pub fn check_layout(table: &RawTable, rules: &ReportRules) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();
    for pos in rules.open_question_positions.iter() {
        match table.column_name(*pos) {
            None => warnings.push(format!(
                "open question column {} is missing: the table only has {} columns",
                pos,
                table.num_columns()
            )),
            Some(name) => {
                if rules.item_window.clip(table.num_columns()).contains(*pos) {
                    warnings.push(format!(
                        "open question column {} ({:?}) is also part of the item block",
                        pos, name
                    ));
                }
                if !is_comment_modality(name) {
                    warnings.push(format!(
                        "open question column {} ({:?}) is not a comment column",
                        pos, name
                    ));
                }
            }
        }
    }
    for w in warnings.iter() {
        warn!("{}", w);
    }
    warnings
}

// **** Report ****

/// Builds the summary of a survey.
///
/// Only a table that does not go beyond its identity columns is an error. Bad cells,
/// missing columns and empty items are reported in the summary instead.
pub fn build_report(table: &RawTable, rules: &ReportRules) -> Result<SurveyReport, SurveyErrors> {
    decode::check_width(table)?;
    info!(
        "Processing {} rows, item columns: {:?}, open questions: {:?}",
        table.num_rows(),
        rules.item_window,
        rules.open_question_positions
    );

    let block = select_columns(table, rules.item_window);
    let items: Vec<ItemReport> = group_items(&block)
        .iter()
        .filter(|ic| !ic.is_empty())
        .map(|ic| {
            let distribution = aggregate_distribution(ic, block.totals);
            let comments = collect_comments(ic, block.responses);
            debug!(
                "build_report: item {:?}: {} modalities, {} comment columns, {} comments",
                ic.label,
                ic.modality_columns.len(),
                ic.comment_columns.len(),
                comments.len()
            );
            ItemReport {
                label: ic.label.clone(),
                distribution,
                has_comment_columns: !ic.comment_columns.is_empty(),
                comments,
            }
        })
        .collect();
    info!("Found {} items", items.len());

    let open_questions = extract_open_questions(table, &rules.open_question_positions);
    let warnings = check_layout(table, rules);

    Ok(SurveyReport {
        items,
        open_questions,
        num_rows: table.num_rows(),
        num_item_columns: block.columns.len(),
        warnings,
    })
}
