// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An authenticated principal issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expenditure,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expenditure => "expenditure",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expenditure" => Ok(TxType::Expenditure),
            other => Err(format!(
                "Invalid type '{}', expected income|expenditure",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: String, // YYYY-MM-DD
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    #[serde(rename = "type")]
    pub r#type: TxType,
}

impl Transaction {
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: String,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    #[serde(rename = "type")]
    pub r#type: TxType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub amount: Decimal,
    pub spent: Decimal,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub amount: Decimal,
    pub spent: Decimal,
    pub start_date: String,
    pub end_date: String,
}

/// Partial budget update. `None` fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPatch {
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub spent: Option<Decimal>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl BudgetPatch {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.amount.is_none()
            && self.spent.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub highlight: bool,
    pub is_ai: bool,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Option<TxType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewReminder {
    pub title: String,
    pub subtitle: Option<String>,
    pub highlight: bool,
    pub is_ai: bool,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Option<TxType>,
}

impl NewReminder {
    pub fn with_id(self, id: impl Into<String>) -> Reminder {
        Reminder {
            id: id.into(),
            title: self.title,
            subtitle: self.subtitle,
            highlight: self.highlight,
            is_ai: self.is_ai,
            amount: self.amount,
            description: self.description,
            category: self.category,
            due_date: self.due_date,
            icon: self.icon,
            r#type: self.r#type,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub balance: Decimal,
    pub income: Decimal,
    pub expenditure: Decimal,
    pub savings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: NaiveDate, // first day of the month
    pub label: String,    // e.g. "Mar 2024"
    pub total: Decimal,
}

/// Six consecutive months ending at the current month, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub points: Vec<MonthTotal>,
}

impl ChartSeries {
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn totals(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.total).collect()
    }

    pub fn total_for(&self, label: &str) -> Option<Decimal> {
        self.points
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.total)
    }
}
