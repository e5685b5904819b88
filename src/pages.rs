//! Record Pages
//!
//! One page per record type, all rendered by `RecordPage`.

use leptos::prelude::*;

use crate::components::RecordPage;
use crate::models::{Attendance, Bonus, Contract, Expense, Fine, Payment, Protocol, Record};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Contracts,
    Payments,
    Expenses,
    Bonuses,
    Fines,
    Attendance,
    Protocols,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Contracts,
        Page::Payments,
        Page::Expenses,
        Page::Bonuses,
        Page::Fines,
        Page::Attendance,
        Page::Protocols,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Contracts => Contract::RESOURCE.label,
            Self::Payments => Payment::RESOURCE.label,
            Self::Expenses => Expense::RESOURCE.label,
            Self::Bonuses => Bonus::RESOURCE.label,
            Self::Fines => Fine::RESOURCE.label,
            Self::Attendance => Attendance::RESOURCE.label,
            Self::Protocols => Protocol::RESOURCE.label,
        }
    }

    /// Whether the year selector affects this page
    pub fn year_scoped(&self) -> bool {
        match self {
            Self::Contracts => Contract::RESOURCE.year_scoped,
            Self::Payments => Payment::RESOURCE.year_scoped,
            Self::Expenses => Expense::RESOURCE.year_scoped,
            Self::Bonuses => Bonus::RESOURCE.year_scoped,
            Self::Fines => Fine::RESOURCE.year_scoped,
            Self::Attendance => Attendance::RESOURCE.year_scoped,
            Self::Protocols => Protocol::RESOURCE.year_scoped,
        }
    }

    pub fn view(&self) -> AnyView {
        match self {
            Self::Contracts => view! { <RecordPage<Contract> /> }.into_any(),
            Self::Payments => view! { <RecordPage<Payment> /> }.into_any(),
            Self::Expenses => view! { <RecordPage<Expense> /> }.into_any(),
            Self::Bonuses => view! { <RecordPage<Bonus> /> }.into_any(),
            Self::Fines => view! { <RecordPage<Fine> /> }.into_any(),
            Self::Attendance => view! { <RecordPage<Attendance> /> }.into_any(),
            Self::Protocols => view! { <RecordPage<Protocol> /> }.into_any(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pages_have_distinct_labels() {
        let labels: HashSet<_> = Page::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels.len(), Page::ALL.len());
        assert_eq!(Page::default(), Page::Contracts);
        assert!(!Page::Attendance.year_scoped());
    }
}
