use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A single support-request record as persisted in the `tickets` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    /// Formatted `YYYY-MM-DD HH:MM:SS`, set once by the store at creation.
    pub created_at: String,
}

/// Caller-side input for a ticket about to be created. The store assigns
/// `id`, `status` and `created_at` itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Category {
    #[strum(serialize = "IT Support")]
    ItSupport,
    #[strum(serialize = "Customer Support")]
    CustomerSupport,
    Billing,
    #[default]
    General,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Ticket workflow state. Any status may move to any other status; there is
/// no enforced transition graph.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Status {
    #[default]
    Open,
    #[strum(serialize = "In Progress")]
    InProgress,
    Closed,
}

macro_rules! impl_cycle {
    ($ty:ty) => {
        impl $ty {
            /// The next variant in declaration order, wrapping around.
            pub fn next(self) -> Self {
                let all: Vec<Self> = <Self as strum::IntoEnumIterator>::iter().collect();
                let i = all.iter().position(|v| *v == self).unwrap_or(0);
                all[(i + 1) % all.len()]
            }

            /// The previous variant in declaration order, wrapping around.
            pub fn prev(self) -> Self {
                let all: Vec<Self> = <Self as strum::IntoEnumIterator>::iter().collect();
                let i = all.iter().position(|v| *v == self).unwrap_or(0);
                all[(i + all.len() - 1) % all.len()]
            }
        }
    };
}

impl_cycle!(Category);
impl_cycle!(Priority);
impl_cycle!(Status);

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Category::ItSupport, "IT Support")]
    #[case(Category::CustomerSupport, "Customer Support")]
    #[case(Category::Billing, "Billing")]
    #[case(Category::General, "General")]
    fn category_display_round_trips(#[case] category: Category, #[case] text: &str) {
        assert_eq!(category.to_string(), text);
        assert_eq!(Category::from_str(text).unwrap(), category);
    }

    #[test]
    fn status_display_matches_persisted_strings() {
        assert_eq!(Status::Open.to_string(), "Open");
        assert_eq!(Status::InProgress.to_string(), "In Progress");
        assert_eq!(Status::Closed.to_string(), "Closed");
    }

    #[test]
    fn defaults_match_the_form_defaults() {
        let draft = TicketDraft::default();
        assert_eq!(draft.category, Category::General);
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(Status::default(), Status::Open);
    }

    #[test]
    fn cycling_wraps_in_both_directions() {
        assert_eq!(Status::Closed.next(), Status::Open);
        assert_eq!(Status::Open.prev(), Status::Closed);
        assert_eq!(Priority::Medium.next(), Priority::High);
        assert_eq!(Category::General.next(), Category::ItSupport);
    }
}
