use serde::{Deserialize, Serialize};

/// Coarse device class derived from a user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Android,
    Ios,
    Desktop,
}

impl DeviceType {
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.to_ascii_lowercase().contains("android") {
            return DeviceType::Android;
        }
        if ["iPad", "iPhone", "iPod"]
            .iter()
            .any(|marker| user_agent.contains(marker))
        {
            return DeviceType::Ios;
        }
        DeviceType::Desktop
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Android => "android",
            DeviceType::Ios => "ios",
            DeviceType::Desktop => "desktop",
        }
    }
}
