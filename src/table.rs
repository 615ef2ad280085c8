//! Question table: numbering, filtering, sorting, column visibility and
//! pagination over one question set.
//!
//! Rows are numbered once, on the difficulty-sorted dataset, and keep that
//! number through every later filter or sort.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    models::{Difficulty, QaPair, QuestionPage, QuestionRow},
    titles::{difficulty_label, format_minutes},
};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("page_size must be between 1 and {MAX_PAGE_SIZE}")]
    PageSize,

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("unknown difficulty: {0}")]
    Difficulty(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Number,
    Question,
    Difficulty,
    EstimatedTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Number,
    Question,
    Answer,
    Difficulty,
    EstimatedTime,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Number,
        Column::Question,
        Column::Answer,
        Column::Difficulty,
        Column::EstimatedTime,
    ];

    /// Everything except `answer`, which is only shown on request.
    pub const DEFAULT_VISIBLE: [Column; 4] = [
        Column::Number,
        Column::Question,
        Column::Difficulty,
        Column::EstimatedTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Column::Number => "number",
            Column::Question => "question",
            Column::Answer => "answer",
            Column::Difficulty => "difficulty",
            Column::EstimatedTime => "estimated_time",
        }
    }

    pub fn parse(name: &str) -> Result<Self, TableError> {
        Column::ALL
            .into_iter()
            .find(|column| column.as_str() == name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }
}

/// TableQuery
///
/// Query parameters accepted by the question table route.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TableQuery {
    /// Case-insensitive substring match on the question text.
    pub filter: Option<String>,
    /// Exact difficulty (0, 1 or 2).
    pub difficulty: Option<u8>,
    /// Case-insensitive exact tag match.
    pub tag: Option<String>,
    pub sort: Option<SortColumn>,
    pub order: Option<SortOrder>,
    /// Zero-based page index.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    /// Comma-separated visible columns, e.g. `number,question,answer`.
    pub columns: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberedQuestion {
    pub number: usize,
    pub pair: QaPair,
}

/// sort_by_difficulty
///
/// Stable ascending sort; questions of equal difficulty keep dataset order.
pub fn sort_by_difficulty(questions: &mut [QaPair]) {
    questions.sort_by_key(|q| q.difficulty);
}

/// pagination_summary
///
/// `"{start} - {end} of {total} question(s)."` with `start = page * size + 1`
/// and `end = min(start + size, total)`.
pub fn pagination_summary(page_index: usize, page_size: usize, total: usize) -> String {
    let start = page_index.saturating_mul(page_size).saturating_add(1);
    let end = start.saturating_add(page_size).min(total);
    format!("{} - {} of {} question(s).", start, end, total)
}

/// QuestionTable
#[derive(Debug, Clone, Default)]
pub struct QuestionTable {
    rows: Vec<NumberedQuestion>,
}

impl QuestionTable {
    /// Numbers `questions` from 1 in the order given. Callers pass the
    /// difficulty-sorted dataset.
    pub fn new(questions: Vec<QaPair>) -> Self {
        let rows = questions
            .into_iter()
            .enumerate()
            .map(|(index, pair)| NumberedQuestion {
                number: index + 1,
                pair,
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks a row up by its 1-based number.
    pub fn get(&self, number: usize) -> Option<&NumberedQuestion> {
        number.checked_sub(1).and_then(|index| self.rows.get(index))
    }

    pub fn filter(&self, query: &TableQuery) -> Result<Vec<&NumberedQuestion>, TableError> {
        let difficulty = query
            .difficulty
            .map(|d| Difficulty::try_from(d).map_err(|_| TableError::Difficulty(d)))
            .transpose()?;
        let needle = query
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let tag = query
            .tag
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(self
            .rows
            .iter()
            .filter(|row| {
                needle
                    .as_ref()
                    .is_none_or(|n| row.pair.question.to_lowercase().contains(n))
            })
            .filter(|row| difficulty.is_none_or(|d| row.pair.difficulty == d))
            .filter(|row| {
                tag.as_ref()
                    .is_none_or(|t| row.pair.tags.iter().any(|own| own.to_lowercase() == *t))
            })
            .collect())
    }

    /// Filters, sorts and paginates, returning one page ready to serialize.
    pub fn render(
        &self,
        id: &str,
        heading: String,
        query: &TableQuery,
        default_page_size: usize,
    ) -> Result<QuestionPage, TableError> {
        let page_size = query.page_size.unwrap_or(default_page_size);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(TableError::PageSize);
        }
        let page_index = query.page.unwrap_or(0);
        let columns = visible_columns(query.columns.as_deref())?;

        let mut rows = self.filter(query)?;
        if let Some(column) = query.sort {
            sort_rows(&mut rows, column, query.order.unwrap_or_default());
        }

        let total = rows.len();
        let offset = page_index.saturating_mul(page_size);
        let page_rows = rows
            .into_iter()
            .skip(offset)
            .take(page_size)
            .map(|row| render_row(row, &columns))
            .collect();

        Ok(QuestionPage {
            id: id.to_string(),
            heading,
            columns: columns.iter().map(|c| c.as_str().to_string()).collect(),
            rows: page_rows,
            page_index,
            page_size,
            total,
            can_previous: page_index > 0,
            can_next: offset.saturating_add(page_size) < total,
            summary: pagination_summary(page_index, page_size, total),
        })
    }
}

fn visible_columns(list: Option<&str>) -> Result<Vec<Column>, TableError> {
    let Some(list) = list.filter(|s| !s.trim().is_empty()) else {
        return Ok(Column::DEFAULT_VISIBLE.to_vec());
    };
    let requested = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Column::parse)
        .collect::<Result<Vec<_>, _>>()?;
    // Keep table order regardless of the order requested.
    Ok(Column::ALL
        .into_iter()
        .filter(|c| requested.contains(c))
        .collect())
}

fn sort_rows(rows: &mut [&NumberedQuestion], column: SortColumn, order: SortOrder) {
    rows.sort_by(|a, b| {
        let ordering = match column {
            SortColumn::Number => a.number.cmp(&b.number),
            SortColumn::Question => a
                .pair
                .question
                .to_lowercase()
                .cmp(&b.pair.question.to_lowercase()),
            SortColumn::Difficulty => a.pair.difficulty.cmp(&b.pair.difficulty),
            SortColumn::EstimatedTime => a.pair.estimated_time.cmp(&b.pair.estimated_time),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn render_row(row: &NumberedQuestion, columns: &[Column]) -> QuestionRow {
    let mut out = QuestionRow::default();
    for column in columns {
        match column {
            Column::Number => out.number = Some(row.number),
            Column::Question => out.question = Some(row.pair.question.clone()),
            Column::Answer => {
                out.answer = row.pair.answer.first().map(|s| s.content.clone());
            }
            Column::Difficulty => out.difficulty = Some(difficulty_label(row.pair.difficulty)),
            Column::EstimatedTime => {
                out.estimated_time = Some(format_minutes(row.pair.estimated_time))
            }
        }
    }
    out
}
