use chrono::Datelike;
use thiserror::Error;

use models::{CategoryGroup, CostRecord, ReportItem};

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("cost record '{0}' has no date, cannot derive day-of-month")]
    MissingDate(String),
}

/// Groups cost records by category, accumulating a running total and an
/// ordered item list per category.
///
/// Category order is the order each category is first encountered in the
/// input; item order within a category is the input order. No sorting, no
/// deduplication.
pub fn group_costs_by_category(costs: &[CostRecord]) -> Result<Vec<CategoryGroup>, GroupError> {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for cost in costs {
        let occurred_at = cost
            .occurred_at
            .ok_or_else(|| GroupError::MissingDate(cost.description.clone()))?;

        let item = ReportItem {
            description: cost.description.clone(),
            amount: cost.amount,
            day: occurred_at.day(),
        };

        match groups.iter_mut().find(|g| g.category == cost.category) {
            Some(group) => {
                group.total_amount += cost.amount;
                group.items.push(item);
            }
            None => groups.push(CategoryGroup {
                category: cost.category.clone(),
                total_amount: cost.amount,
                items: vec![item],
            }),
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn cost(description: &str, category: &str, amount: f64, day: u32) -> CostRecord {
        CostRecord {
            id: format!("id-{}", description),
            description: description.to_string(),
            category: category.to_string(),
            owner_id: "u1".to_string(),
            amount,
            occurred_at: Some(Utc.with_ymd_and_hms(2025, 2, day, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_group_empty_input() {
        let groups = group_costs_by_category(&[]).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_group_accumulates_totals_per_category() {
        let costs = vec![
            cost("Lunch", "food", 100.0, 10),
            cost("Gym", "sport", 40.0, 11),
            cost("Dinner", "food", 60.0, 12),
        ];

        let groups = group_costs_by_category(&costs).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "food");
        assert_eq!(groups[0].total_amount, 160.0);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[1].category, "sport");
        assert_eq!(groups[1].total_amount, 40.0);
    }

    #[test]
    fn test_group_preserves_first_encounter_order() {
        let costs = vec![
            cost("a", "health", 1.0, 1),
            cost("b", "food", 2.0, 2),
            cost("c", "health", 3.0, 3),
            cost("d", "housing", 4.0, 4),
        ];

        let groups = group_costs_by_category(&costs).unwrap();
        let categories: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec!["health", "food", "housing"]);

        // Item order within a category is the input order
        assert_eq!(groups[0].items[0].description, "a");
        assert_eq!(groups[0].items[1].description, "c");
    }

    #[test]
    fn test_group_total_conservation() {
        let costs = vec![
            cost("a", "food", 12.5, 1),
            cost("b", "education", 30.0, 2),
            cost("c", "food", 7.5, 3),
            cost("d", "sport", 50.0, 4),
        ];

        let groups = group_costs_by_category(&costs).unwrap();
        let grouped_total: f64 = groups.iter().map(|g| g.total_amount).sum();
        let input_total: f64 = costs.iter().map(|c| c.amount).sum();
        assert_eq!(grouped_total, input_total);

        // Every input item lands in exactly one bucket
        let item_count: usize = groups.iter().map(|g| g.items.len()).sum();
        assert_eq!(item_count, costs.len());
    }

    #[test]
    fn test_group_extracts_day_of_month() {
        let costs = vec![cost("Lunch", "food", 100.0, 10)];
        let groups = group_costs_by_category(&costs).unwrap();
        assert_eq!(groups[0].items[0].day, 10);
    }

    #[test]
    fn test_group_fails_on_missing_date() {
        let mut record = cost("Lunch", "food", 100.0, 10);
        record.occurred_at = None;

        let result = group_costs_by_category(&[record]);
        assert!(matches!(result, Err(GroupError::MissingDate(_))));
    }
}
