//! The static employee directory
//!
//! Employees are a fixed reference table, not records in the event store.
//! An attendee entry on an event references an employee by exact trimmed
//! string equality on the name; that brittle string join is the system's
//! only relational link.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// One member of the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub affiliation: String,
    pub group: String,
}

/// Ordered employee enumeration. The order is significant: ranking ties are
/// broken by directory order.
#[derive(Debug, Clone)]
pub struct Directory {
    employees: Vec<Employee>,
}

#[derive(Deserialize)]
struct RosterFile {
    employees: Vec<Employee>,
}

impl Default for Directory {
    fn default() -> Self {
        Self {
            employees: default_roster(),
        }
    }
}

impl Directory {
    /// Build a directory from an explicit roster, validating that names are
    /// unique and each group belongs to exactly one affiliation.
    pub fn from_employees(employees: Vec<Employee>) -> Result<Self> {
        if employees.is_empty() {
            return Err(Error::Validation("roster has no employees".to_string()));
        }

        let mut seen_names: HashMap<&str, ()> = HashMap::new();
        let mut group_owner: HashMap<&str, &str> = HashMap::new();
        for emp in &employees {
            if emp.name.trim().is_empty() {
                return Err(Error::Validation("roster entry has an empty name".to_string()));
            }
            if seen_names.insert(emp.name.as_str(), ()).is_some() {
                return Err(Error::Validation(format!(
                    "duplicate employee name in roster: {}",
                    emp.name
                )));
            }
            match group_owner.get(emp.group.as_str()) {
                Some(owner) if *owner != emp.affiliation => {
                    return Err(Error::Validation(format!(
                        "group {} appears under both {} and {}",
                        emp.group, owner, emp.affiliation
                    )));
                }
                Some(_) => {}
                None => {
                    group_owner.insert(emp.group.as_str(), emp.affiliation.as_str());
                }
            }
        }

        Ok(Self { employees })
    }

    /// Load a replacement roster from a TOML file with `[[employees]]` entries.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let file: RosterFile = toml::from_str(&raw)?;
        Self::from_employees(file.employees)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Whether `name` (already trimmed by the caller) is in the directory.
    pub fn contains(&self, name: &str) -> bool {
        self.employees.iter().any(|e| e.name == name)
    }

    /// Distinct affiliations in directory order.
    pub fn affiliations(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for emp in &self.employees {
            if !seen.contains(&emp.affiliation.as_str()) {
                seen.push(emp.affiliation.as_str());
            }
        }
        seen
    }

    /// Distinct groups in directory order.
    pub fn groups(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for emp in &self.employees {
            if !seen.contains(&emp.group.as_str()) {
                seen.push(emp.group.as_str());
            }
        }
        seen
    }
}

fn default_roster() -> Vec<Employee> {
    const ROSTER: &[(&str, &str, &str)] = &[
        ("박호주", "영업제1추진부", "서울1그룹"),
        ("송학", "영업제1추진부", "서울1그룹"),
        ("김한수", "영업제1추진부", "서울1그룹"),
        ("정반효", "영업제1추진부", "서울1그룹"),
        ("정의헌", "영업제1추진부", "서울1그룹"),
        ("홍현우", "영업제1추진부", "서울1그룹"),
        ("김현상", "영업제1추진부", "서울2그룹"),
        ("박권준", "영업제1추진부", "서울2그룹"),
        ("이유진", "영업제1추진부", "서울2그룹"),
        ("윤창기", "영업제1추진부", "서울2그룹"),
        ("이재원", "영업제1추진부", "서울2그룹"),
        ("조훈구", "영업제1추진부", "서울2그룹"),
        ("강태우", "영업제1추진부", "서울3그룹"),
        ("김현수", "영업제1추진부", "서울3그룹"),
        ("유창훈", "영업제1추진부", "서울3그룹"),
        ("김경하", "영업제1추진부", "서울3그룹"),
        ("신재영", "영업제1추진부", "서울3그룹"),
        ("한준희", "영업제1추진부", "서울3그룹"),
        ("김태헌", "영업제2추진부", "대구그룹"),
        ("류제성", "영업제2추진부", "대구그룹"),
        ("이호건", "영업제2추진부", "대구그룹"),
        ("구성주", "영업제2추진부", "부산그룹"),
        ("김동수", "영업제2추진부", "부산그룹"),
        ("김상훈", "영업제2추진부", "부산그룹"),
        ("윤명훈", "영업제2추진부", "부산그룹"),
        ("최상현", "영업제2추진부", "부산그룹"),
        ("태영준", "영업제2추진부", "부산그룹"),
        ("김도아", "영업제2추진부", "호남그룹"),
        ("김무경", "영업제2추진부", "호남그룹"),
        ("윤필도", "영업제2추진부", "호남그룹"),
        ("이상훈", "영업제2추진부", "호남그룹"),
        ("정한준", "영업제2추진부", "호남그룹"),
    ];

    ROSTER
        .iter()
        .map(|(name, affiliation, group)| Employee {
            name: (*name).to_string(),
            affiliation: (*affiliation).to_string(),
            group: (*group).to_string(),
        })
        .collect()
}
