//! The fixed set of job roles an evaluation can target.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Data Engineer")]
    DataEngineer,
    #[serde(rename = "Data Scientist")]
    DataScientist,
    #[serde(rename = "Data Analyst")]
    DataAnalyst,
    #[default]
    #[serde(rename = "Machine Learning Engineer")]
    MachineLearningEngineer,
    #[serde(rename = "Technical Product Manager")]
    TechnicalProductManager,
    #[serde(rename = "Cloud/DevOps Engineer")]
    CloudDevOpsEngineer,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::DataEngineer,
        Role::DataScientist,
        Role::DataAnalyst,
        Role::MachineLearningEngineer,
        Role::TechnicalProductManager,
        Role::CloudDevOpsEngineer,
    ];

    /// Display label; also the wire form.
    pub fn label(self) -> &'static str {
        match self {
            Role::DataEngineer => "Data Engineer",
            Role::DataScientist => "Data Scientist",
            Role::DataAnalyst => "Data Analyst",
            Role::MachineLearningEngineer => "Machine Learning Engineer",
            Role::TechnicalProductManager => "Technical Product Manager",
            Role::CloudDevOpsEngineer => "Cloud/DevOps Engineer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = AppError;

    /// Exact label match only; the caller picks from a fixed list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.label() == s)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Unknown role '{s}'. Expected one of: {}",
                    Role::ALL.map(Role::label).join(", ")
                ))
            })
    }
}
