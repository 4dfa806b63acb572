//! Partitioning of records by electorate.

use std::collections::BTreeMap;

use log::debug;

use crate::record::LetterRecord;

/// The letters for one electorate, ordered by submission date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectorateGroup {
    pub electorate: String,
    pub records: Vec<LetterRecord>,
}

/// Partitions records by exact electorate name and sorts each partition by
/// date ascending. The sort is stable, so letters submitted the same day
/// keep their input order. Empty input yields an empty map.
///
/// The `BTreeMap` keeps electorate iteration deterministic downstream.
pub fn group_records(records: Vec<LetterRecord>) -> BTreeMap<String, ElectorateGroup> {
    let mut groups: BTreeMap<String, ElectorateGroup> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.electorate.clone())
            .or_insert_with(|| ElectorateGroup {
                electorate: record.electorate.clone(),
                records: Vec::new(),
            })
            .records
            .push(record);
    }
    for group in groups.values_mut() {
        group.records.sort_by_key(|r| r.date);
    }
    debug!("group_records: {} groups", groups.len());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(electorate: &str, day: u32, mp: &str) -> LetterRecord {
        LetterRecord {
            electorate: electorate.to_string(),
            mp_identifier: mp.to_string(),
            salutation: format!("Dear Mx {}", mp),
            display_name: mp.to_string(),
            date: NaiveDate::from_ymd_opt(2023, 3, day).unwrap(),
            body_template: String::new(),
        }
    }

    #[test]
    fn partition_is_faithful() {
        let records = vec![
            record("East", 2, "Smith"),
            record("West", 1, "Jones"),
            record("East", 1, "Brown"),
        ];
        let groups = group_records(records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["East"].records.len(), 2);
        assert_eq!(groups["West"].records.len(), 1);
        let total: usize = groups.values().map(|g| g.records.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn groups_are_date_ordered() {
        let groups = group_records(vec![record("East", 9, "Smith"), record("East", 3, "Jones")]);
        let dates: Vec<u32> = groups["East"]
            .records
            .iter()
            .map(|r| r.date.format("%d").to_string().parse().unwrap())
            .collect();
        assert_eq!(dates, vec![3, 9]);
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let groups = group_records(vec![
            record("East", 3, "First"),
            record("East", 3, "Second"),
            record("East", 3, "Third"),
        ]);
        let names: Vec<&str> = groups["East"]
            .records
            .iter()
            .map(|r| r.mp_identifier.as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn electorate_names_match_exactly() {
        let groups = group_records(vec![record("East", 1, "Smith"), record("east", 1, "Jones")]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(group_records(Vec::new()).is_empty());
    }
}
