//! Transaction record model
//!
//! A record is an income, an expense, or an estimated (not yet settled)
//! income/expense. Estimated entries can be realized into their actual
//! counterpart and reverted again; no other type change is possible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::RecordId;
use super::money::Money;

/// Kind of a record; the direction of `amount` follows from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Income,
    Expense,
    EstimatedIncome,
    EstimatedExpense,
}

impl RecordType {
    pub const ALL: [RecordType; 4] = [
        RecordType::Income,
        RecordType::Expense,
        RecordType::EstimatedIncome,
        RecordType::EstimatedExpense,
    ];

    /// Storage key, e.g. `estimated_income`
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::EstimatedIncome => "estimated_income",
            Self::EstimatedExpense => "estimated_expense",
        }
    }

    /// Localized label used in CSV files and listings
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "收入",
            Self::Expense => "支出",
            Self::EstimatedIncome => "预估收入",
            Self::EstimatedExpense => "预估支出",
        }
    }

    /// Resolve a localized label or a storage key
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label() == label || t.as_key().eq_ignore_ascii_case(label))
    }

    pub fn is_estimated(&self) -> bool {
        matches!(self, Self::EstimatedIncome | Self::EstimatedExpense)
    }

    /// Income or expense that has actually happened
    pub fn is_actual(&self) -> bool {
        !self.is_estimated()
    }

    /// The type this one becomes under a conversion, if the conversion applies
    pub fn convert(self, conversion: Conversion) -> Option<RecordType> {
        match (conversion, self) {
            (Conversion::Realize, Self::EstimatedIncome) => Some(Self::Income),
            (Conversion::Realize, Self::EstimatedExpense) => Some(Self::Expense),
            (Conversion::Revert, Self::Income) => Some(Self::EstimatedIncome),
            (Conversion::Revert, Self::Expense) => Some(Self::EstimatedExpense),
            _ => None,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Unknown record type: '{}'", s))
    }
}

/// Direction of a type conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Estimated entry becomes its actual counterpart
    Realize,
    /// Actual entry goes back to being estimated
    Revert,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Realize => write!(f, "realize"),
            Self::Revert => write!(f, "revert"),
        }
    }
}

/// Completion state of one piece of paperwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Incomplete,
    NotNeeded,
    Completed,
}

impl DocumentStatus {
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::NotNeeded => "not_needed",
            Self::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Incomplete => "未完成",
            Self::NotNeeded => "无需",
            Self::Completed => "已完成",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [Self::Incomplete, Self::NotNeeded, Self::Completed]
            .into_iter()
            .find(|d| d.as_key().eq_ignore_ascii_case(s) || d.label() == s)
            .ok_or_else(|| format!("Unknown document status: '{}'", s))
    }
}

/// Partial update of the three paperwork trackers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentUpdate {
    pub contract: Option<DocumentStatus>,
    pub third_party: Option<DocumentStatus>,
    pub invoice: Option<DocumentStatus>,
}

impl DocumentUpdate {
    pub fn is_empty(&self) -> bool {
        self.contract.is_none() && self.third_party.is_none() && self.invoice.is_none()
    }
}

/// A bookkeeping entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: RecordId,

    pub name: String,

    /// Magnitude only, never negative
    pub amount: Money,

    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Creation time, or the time supplied by an imported file
    pub date: DateTime<Utc>,

    /// Set once an estimated entry has been realized
    #[serde(default)]
    pub is_converted: bool,

    #[serde(default)]
    pub converted_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub contract_status: DocumentStatus,

    #[serde(default)]
    pub third_party_status: DocumentStatus,

    #[serde(default)]
    pub invoice_status: DocumentStatus,
}

impl TransactionRecord {
    /// Create a record as entered by hand; it starts unconverted
    pub fn new(name: impl Into<String>, amount: Money, record_type: RecordType) -> Self {
        Self::with_date(name, amount, record_type, Utc::now())
    }

    pub fn with_date(
        name: impl Into<String>,
        amount: Money,
        record_type: RecordType,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            amount,
            record_type,
            date,
            is_converted: false,
            converted_at: None,
            contract_status: DocumentStatus::default(),
            third_party_status: DocumentStatus::default(),
            invoice_status: DocumentStatus::default(),
        }
    }

    /// Timestamp that places an actual entry in time
    ///
    /// Realized entries count from their conversion, everything else from
    /// `date`.
    pub fn effective_date(&self) -> DateTime<Utc> {
        match self.converted_at {
            Some(at) if self.record_type.is_actual() => at,
            _ => self.date,
        }
    }

    /// Estimated income with contract or third-party paperwork outstanding
    pub fn has_incomplete_documents(&self) -> bool {
        self.record_type == RecordType::EstimatedIncome
            && (self.contract_status == DocumentStatus::Incomplete
                || self.third_party_status == DocumentStatus::Incomplete)
    }

    /// Apply a conversion in place
    ///
    /// Realizing marks the record converted at `at`; reverting clears both the
    /// flag and the timestamp.
    pub fn apply_conversion(
        &mut self,
        conversion: Conversion,
        at: DateTime<Utc>,
    ) -> Result<(), RecordValidationError> {
        let target = self.record_type.convert(conversion).ok_or(
            RecordValidationError::ForbiddenConversion {
                from: self.record_type,
                conversion,
            },
        )?;

        self.record_type = target;
        match conversion {
            Conversion::Realize => {
                self.is_converted = true;
                self.converted_at = Some(at);
            }
            Conversion::Revert => {
                self.is_converted = false;
                self.converted_at = None;
            }
        }
        Ok(())
    }

    pub fn apply_documents(&mut self, update: DocumentUpdate) {
        if let Some(status) = update.contract {
            self.contract_status = status;
        }
        if let Some(status) = update.third_party {
            self.third_party_status = status;
        }
        if let Some(status) = update.invoice {
            self.invoice_status = status;
        }
    }

    /// Validate field-level invariants
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.amount.is_negative() {
            return Err(RecordValidationError::NegativeAmount(self.amount));
        }
        if !self.amount.is_within_limit() {
            return Err(RecordValidationError::AmountTooLarge(self.amount));
        }
        if self.is_converted && self.record_type.is_estimated() {
            return Err(RecordValidationError::ConvertedEstimate);
        }
        if self.converted_at.is_some() != self.is_converted {
            return Err(RecordValidationError::ConversionTimestamp);
        }
        Ok(())
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.record_type,
            self.name,
            self.amount
        )
    }
}

/// Validation errors for records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    NegativeAmount(Money),
    AmountTooLarge(Money),
    ForbiddenConversion {
        from: RecordType,
        conversion: Conversion,
    },
    ConvertedEstimate,
    ConversionTimestamp,
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Amount must not be negative (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount {} exceeds the limit of {}", amount, Money::MAX)
            }
            Self::ForbiddenConversion { from, conversion } => write!(
                f,
                "Cannot {} a record of type {}",
                conversion,
                from.as_key()
            ),
            Self::ConvertedEstimate => {
                write!(f, "An estimated record cannot be marked as converted")
            }
            Self::ConversionTimestamp => write!(
                f,
                "Conversion time must be set exactly when the record is converted"
            ),
        }
    }
}

impl std::error::Error for RecordValidationError {}
