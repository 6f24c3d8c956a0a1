use crate::config::HelpdeskConfig;

/// A routing target: the label stored on tickets and the address alerted for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub name: String,
    pub address: String,
    keywords: Vec<String>,
}

impl Department {
    pub fn new(name: impl Into<String>, address: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Routes query text to a department by first-match keyword search.
///
/// Departments are checked in declaration order, so when text mentions
/// keywords of several departments the earlier one wins.
#[derive(Debug, Clone)]
pub struct DepartmentRouter {
    departments: Vec<Department>,
    fallback: Department,
}

impl DepartmentRouter {
    pub fn new(departments: Vec<Department>, fallback: Department) -> Self {
        Self {
            departments,
            fallback,
        }
    }

    pub fn from_config(config: &HelpdeskConfig) -> Self {
        let departments = config
            .departments
            .iter()
            .map(|d| Department {
                name: d.name.clone(),
                address: d.address.clone(),
                keywords: d.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        let fallback = Department::new(
            config.default_department.clone(),
            config.default_address.clone(),
            &[],
        );
        Self::new(departments, fallback)
    }

    /// The department a piece of text belongs to; the fallback when nothing matches.
    pub fn route(&self, text: Option<&str>) -> &Department {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return &self.fallback;
        };
        let lower = text.to_lowercase();

        self.departments
            .iter()
            .find(|d| d.matches(&lower))
            .unwrap_or(&self.fallback)
    }

    /// Label-only form of [`route`](Self::route).
    pub fn classify(&self, text: Option<&str>) -> &str {
        &self.route(text).name
    }

    pub fn fallback(&self) -> &Department {
        &self.fallback
    }

    /// Address for a department label, including the fallback label.
    pub fn address_for(&self, name: &str) -> Option<&str> {
        self.departments
            .iter()
            .chain(std::iter::once(&self.fallback))
            .find(|d| d.name == name)
            .map(|d| d.address.as_str())
    }
}
