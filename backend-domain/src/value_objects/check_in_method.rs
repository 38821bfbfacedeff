// Check-in method value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInMethod {
    Scan,
    Manual,
}

impl CheckInMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInMethod::Scan => "scan",
            CheckInMethod::Manual => "manual",
        }
    }
}

impl From<&str> for CheckInMethod {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "manual" => CheckInMethod::Manual,
            _ => CheckInMethod::Scan,
        }
    }
}
