//! Record filtering
//!
//! A [`RecordFilter`] is a conjunction of optional predicates built up with
//! builder methods in the style of a query object. Applying it never reorders
//! records.

use std::str::FromStr;

use chrono::{Datelike, FixedOffset, Months, NaiveDate, Offset, Utc};

use crate::models::{Money, RecordType, TransactionRecord};

/// Category selector of the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Type(RecordType),
    /// Estimated income whose contract or third-party paperwork is incomplete
    IncompleteDocuments,
}

impl CategoryFilter {
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        match self {
            Self::All => true,
            Self::Type(record_type) => record.record_type == *record_type,
            Self::IncompleteDocuments => record.has_incomplete_documents(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" | "全部" => Ok(Self::All),
            "incomplete_documents" | "incomplete" | "资料未完成" => Ok(Self::IncompleteDocuments),
            other => RecordType::from_label(other)
                .map(Self::Type)
                .ok_or_else(|| format!("Unknown category: '{}'", other)),
        }
    }
}

/// Headline statistic a drill-down starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Income,
    Expense,
    Balance,
    EstimatedIncome,
    EstimatedExpense,
    Unpaid,
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "balance" => Ok(Self::Balance),
            "estimated_income" | "estimated" => Ok(Self::EstimatedIncome),
            "estimated_expense" => Ok(Self::EstimatedExpense),
            "unpaid" => Ok(Self::Unpaid),
            other => Err(format!("Unknown statistic: '{}'", other)),
        }
    }
}

/// First and last day of the calendar month containing `date`
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date - chrono::Duration::days(i64::from(date.day0()));
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}

/// Composite predicate over records
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFilter {
    /// Case-insensitive substring of the name; empty matches everything
    pub search_term: String,
    pub category: CategoryFilter,
    /// Inclusive lower bound on amount
    pub min_amount: Option<Money>,
    /// Inclusive upper bound on amount
    pub max_amount: Option<Money>,
    /// First calendar day included
    pub start_date: Option<NaiveDate>,
    /// Last calendar day included, through the end of that day
    pub end_date: Option<NaiveDate>,
    /// Offset in which calendar days are evaluated
    pub offset: FixedOffset,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category: CategoryFilter::All,
            min_amount: None,
            max_amount: None,
            start_date: None,
            end_date: None,
            offset: Utc.fix(),
        }
    }
}

impl RecordFilter {
    /// Create a filter that lets everything through
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn record_type(self, record_type: RecordType) -> Self {
        self.category(CategoryFilter::Type(record_type))
    }

    pub fn min_amount(mut self, amount: Money) -> Self {
        self.min_amount = Some(amount);
        self
    }

    pub fn max_amount(mut self, amount: Money) -> Self {
        self.max_amount = Some(amount);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn date_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date(start).end_date(end)
    }

    /// Evaluate calendar days at this UTC offset
    pub fn in_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Drill-down preset for a headline statistic
    ///
    /// Income, expense and estimated statistics narrow to their category within
    /// the month containing `today`; balance keeps every category in that
    /// month; unpaid shows all estimated income regardless of date.
    pub fn for_stat(kind: StatKind, today: NaiveDate) -> Self {
        let (first, last) = month_bounds(today);
        let this_month = Self::new().date_range(first, last);
        match kind {
            StatKind::Income => this_month.record_type(RecordType::Income),
            StatKind::Expense => this_month.record_type(RecordType::Expense),
            StatKind::EstimatedIncome => this_month.record_type(RecordType::EstimatedIncome),
            StatKind::EstimatedExpense => this_month.record_type(RecordType::EstimatedExpense),
            StatKind::Balance => this_month,
            StatKind::Unpaid => Self::new().record_type(RecordType::EstimatedIncome),
        }
    }

    /// Whether any predicate narrows the result
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty()
            || self.category != CategoryFilter::All
            || self.min_amount.is_some()
            || self.max_amount.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if !self.search_term.is_empty()
            && !record
                .name
                .to_lowercase()
                .contains(&self.search_term.to_lowercase())
        {
            return false;
        }

        if !self.category.matches(record) {
            return false;
        }

        if self.min_amount.is_some_and(|min| record.amount < min)
            || self.max_amount.is_some_and(|max| record.amount > max)
        {
            return false;
        }

        if self.start_date.is_some() || self.end_date.is_some() {
            let day = record
                .effective_date()
                .with_timezone(&self.offset)
                .date_naive();
            if self.start_date.is_some_and(|start| day < start)
                || self.end_date.is_some_and(|end| day > end)
            {
                return false;
            }
        }

        true
    }

    /// Records passing every predicate, in their original order
    pub fn apply<'r>(&self, records: &'r [TransactionRecord]) -> Vec<&'r TransactionRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
