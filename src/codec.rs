// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Document <-> model mapping. Decoding never fails; bad fields fall back to [`defaults`].

use crate::document::{Document, FieldValue, Fields, Timestamp};
use crate::error::{Result, SyncError};
use crate::models::{
    BudgetPatch, Budget, DashboardStats, NewBudget, NewReminder, NewTransaction, Reminder,
    Transaction, TxType,
};
use crate::utils::parse_date;
use chrono::{Duration, Local, NaiveTime, TimeZone};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Values substituted for absent or malformed fields.
pub mod defaults {
    use crate::models::TxType;
    use rust_decimal::Decimal;

    pub const TEXT: &str = "";
    pub const AMOUNT: Decimal = Decimal::ZERO;
    pub const BALANCE: Decimal = Decimal::ZERO;
    pub const TRANSACTION_TYPE: TxType = TxType::Expenditure;
    pub const HIGHLIGHT: bool = false;
    pub const ICON: &str = "default";
    pub const REMINDER_TYPE: TxType = TxType::Expenditure;
}

pub mod field {
    pub const DATE: &str = "date";
    pub const DESCRIPTION: &str = "description";
    pub const AMOUNT: &str = "amount";
    pub const CATEGORY: &str = "category";
    pub const TYPE: &str = "type";
    pub const SPENT: &str = "spent";
    pub const START_DATE: &str = "startDate";
    pub const END_DATE: &str = "endDate";
    pub const TITLE: &str = "title";
    pub const SUBTITLE: &str = "subtitle";
    pub const HIGHLIGHT: &str = "highlight";
    pub const DUE_DATE: &str = "dueDate";
    pub const ICON: &str = "icon";
    pub const BALANCE: &str = "balance";
    pub const INCOME: &str = "income";
    pub const SAVINGS: &str = "savings";
    pub const CREATED_AT: &str = "createdAt";
}

/// Encode a calendar day as the timestamp of its local midnight.
pub fn encode_day(day: &str) -> Result<FieldValue> {
    let date = parse_date(day)?;
    let midnight = date.and_time(NaiveTime::MIN);
    // Zones whose DST shift skips midnight start the day an hour later.
    let local = Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .ok_or_else(|| SyncError::InvalidDate(day.to_string()))?;
    Ok(FieldValue::Timestamp(Timestamp::from_datetime(&local)))
}

/// Normalise a stored date to `YYYY-MM-DD`. Strings pass through untouched.
pub fn decode_day(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Timestamp(ts) => ts.to_datetime().map(|dt| {
            dt.with_timezone(&Local)
                .date_naive()
                .format("%Y-%m-%d")
                .to_string()
        }),
        FieldValue::String(s) => Some(s.clone()),
        _ => None,
    }
}

pub fn encode_amount(amount: Decimal) -> FieldValue {
    if amount.fract().is_zero() {
        if let Some(i) = amount.to_i64() {
            return FieldValue::Integer(i);
        }
    }
    FieldValue::Double(amount.to_f64().unwrap_or_default())
}

pub fn decode_amount(value: &FieldValue) -> Option<Decimal> {
    match value {
        FieldValue::Integer(i) => Some(Decimal::from(*i)),
        FieldValue::Double(f) => Decimal::try_from(*f).ok(),
        FieldValue::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

fn encode_type(kind: TxType) -> FieldValue {
    FieldValue::String(kind.as_str().to_string())
}

struct Reader<'a> {
    doc: &'a Document,
    kind: &'static str,
}

impl<'a> Reader<'a> {
    fn new(doc: &'a Document, kind: &'static str) -> Self {
        Self { doc, kind }
    }

    fn present(&self, name: &str) -> Option<&'a FieldValue> {
        match self.doc.get(name) {
            None | Some(FieldValue::Null) => None,
            Some(v) => Some(v),
        }
    }

    fn anomaly(&self, name: &str, what: &str) {
        log::warn!(
            "{} document {}: field '{}' {}, using default",
            self.kind,
            self.doc.id,
            name,
            what
        );
    }

    fn typed<T>(&self, name: &str, f: impl FnOnce(&FieldValue) -> Option<T>) -> Option<T> {
        let value = self.present(name)?;
        let out = f(value);
        if out.is_none() {
            self.anomaly(name, "has an unexpected shape");
        }
        out
    }

    fn text(&self, name: &str) -> Option<String> {
        self.typed(name, |v| v.as_str().map(str::to_string))
    }

    fn amount(&self, name: &str) -> Option<Decimal> {
        self.typed(name, decode_amount)
    }

    fn flag(&self, name: &str) -> Option<bool> {
        self.typed(name, FieldValue::as_bool)
    }

    fn day(&self, name: &str) -> Option<String> {
        self.typed(name, decode_day)
    }

    fn tx_type(&self, name: &str) -> Option<TxType> {
        self.typed(name, |v| v.as_str().and_then(|s| s.parse::<TxType>().ok()))
    }

    fn required<T>(&self, name: &str, value: Option<T>, default: impl FnOnce() -> T) -> T {
        match value {
            Some(v) => v,
            None => {
                if self.present(name).is_none() {
                    self.anomaly(name, "is missing");
                }
                default()
            }
        }
    }

    fn required_text(&self, name: &str) -> String {
        self.required(name, self.text(name), || defaults::TEXT.to_string())
    }

    fn required_amount(&self, name: &str) -> Decimal {
        self.required(name, self.amount(name), || defaults::AMOUNT)
    }

    fn required_day(&self, name: &str) -> String {
        self.required(name, self.day(name), || defaults::TEXT.to_string())
    }
}

pub fn decode_transaction(doc: &Document) -> Transaction {
    let r = Reader::new(doc, "transaction");
    Transaction {
        id: doc.id.clone(),
        date: r.required_day(field::DATE),
        description: r.required_text(field::DESCRIPTION),
        amount: r.required_amount(field::AMOUNT),
        category: r.required_text(field::CATEGORY),
        r#type: r.required(field::TYPE, r.tx_type(field::TYPE), || {
            defaults::TRANSACTION_TYPE
        }),
    }
}

pub fn encode_transaction(tx: &NewTransaction, created_at: Timestamp) -> Result<Fields> {
    let mut f = Fields::new();
    f.insert(field::DATE.into(), encode_day(&tx.date)?);
    f.insert(field::DESCRIPTION.into(), tx.description.as_str().into());
    f.insert(field::AMOUNT.into(), encode_amount(tx.amount));
    f.insert(field::CATEGORY.into(), tx.category.as_str().into());
    f.insert(field::TYPE.into(), encode_type(tx.r#type));
    f.insert(field::CREATED_AT.into(), created_at.into());
    Ok(f)
}

pub fn decode_budget(doc: &Document) -> Budget {
    let r = Reader::new(doc, "budget");
    Budget {
        id: doc.id.clone(),
        category: r.required_text(field::CATEGORY),
        amount: r.required_amount(field::AMOUNT),
        spent: r.required_amount(field::SPENT),
        start_date: r.required_day(field::START_DATE),
        end_date: r.required_day(field::END_DATE),
    }
}

pub fn encode_budget(budget: &NewBudget) -> Result<Fields> {
    let mut f = Fields::new();
    f.insert(field::CATEGORY.into(), budget.category.as_str().into());
    f.insert(field::AMOUNT.into(), encode_amount(budget.amount));
    f.insert(field::SPENT.into(), encode_amount(budget.spent));
    f.insert(field::START_DATE.into(), encode_day(&budget.start_date)?);
    f.insert(field::END_DATE.into(), encode_day(&budget.end_date)?);
    Ok(f)
}

pub fn encode_budget_patch(patch: &BudgetPatch) -> Result<Fields> {
    let mut f = Fields::new();
    if let Some(category) = &patch.category {
        f.insert(field::CATEGORY.into(), category.as_str().into());
    }
    if let Some(amount) = patch.amount {
        f.insert(field::AMOUNT.into(), encode_amount(amount));
    }
    if let Some(spent) = patch.spent {
        f.insert(field::SPENT.into(), encode_amount(spent));
    }
    if let Some(start) = &patch.start_date {
        f.insert(field::START_DATE.into(), encode_day(start)?);
    }
    if let Some(end) = &patch.end_date {
        f.insert(field::END_DATE.into(), encode_day(end)?);
    }
    Ok(f)
}

pub fn decode_reminder(doc: &Document) -> Reminder {
    let r = Reader::new(doc, "reminder");
    Reminder {
        id: doc.id.clone(),
        title: r.required_text(field::TITLE),
        subtitle: r.text(field::SUBTITLE),
        highlight: r.flag(field::HIGHLIGHT).unwrap_or(defaults::HIGHLIGHT),
        is_ai: false,
        amount: r.amount(field::AMOUNT),
        description: r.text(field::DESCRIPTION),
        category: r.text(field::CATEGORY),
        due_date: r.day(field::DUE_DATE),
        icon: Some(
            r.text(field::ICON)
                .unwrap_or_else(|| defaults::ICON.to_string()),
        ),
        r#type: Some(r.tx_type(field::TYPE).unwrap_or(defaults::REMINDER_TYPE)),
    }
}

pub fn encode_reminder(rem: &NewReminder, created_at: Timestamp) -> Result<Fields> {
    let mut f = Fields::new();
    f.insert(field::TITLE.into(), rem.title.as_str().into());
    if let Some(subtitle) = &rem.subtitle {
        f.insert(field::SUBTITLE.into(), subtitle.as_str().into());
    }
    f.insert(field::HIGHLIGHT.into(), rem.highlight.into());
    if let Some(amount) = rem.amount {
        f.insert(field::AMOUNT.into(), encode_amount(amount));
    }
    if let Some(description) = &rem.description {
        f.insert(field::DESCRIPTION.into(), description.as_str().into());
    }
    if let Some(category) = &rem.category {
        f.insert(field::CATEGORY.into(), category.as_str().into());
    }
    if let Some(due) = &rem.due_date {
        f.insert(field::DUE_DATE.into(), encode_day(due)?);
    }
    f.insert(
        field::ICON.into(),
        rem.icon.as_deref().unwrap_or(defaults::ICON).into(),
    );
    f.insert(
        field::TYPE.into(),
        encode_type(rem.r#type.unwrap_or(defaults::REMINDER_TYPE)),
    );
    f.insert(field::CREATED_AT.into(), created_at.into());
    Ok(f)
}

/// Balance held on the user document; zero when the document or field is absent.
pub fn decode_balance(doc: Option<&Document>) -> Decimal {
    doc.and_then(|d| Reader::new(d, "user").amount(field::BALANCE))
        .unwrap_or(defaults::BALANCE)
}

pub fn encode_balance(balance: Decimal) -> Fields {
    let mut f = Fields::new();
    f.insert(field::BALANCE.into(), encode_amount(balance));
    f
}

pub fn decode_overview(doc: Option<&Document>) -> DashboardStats {
    let Some(doc) = doc else {
        return DashboardStats::default();
    };
    let r = Reader::new(doc, "stats");
    let income = r.amount(field::INCOME).unwrap_or(defaults::AMOUNT);
    let savings = r.amount(field::SAVINGS).unwrap_or(defaults::AMOUNT);
    DashboardStats {
        balance: r.amount(field::BALANCE).unwrap_or(defaults::BALANCE),
        income,
        expenditure: income - savings,
        savings,
    }
}
