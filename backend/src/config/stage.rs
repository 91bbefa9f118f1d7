use anyhow::anyhow;

/// Deployment stage. Defaults to `Production` so the fixture authenticator is
/// never selected by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    Local,
    #[default]
    Production,
}

impl Stage {
    pub fn is_local(&self) -> bool {
        matches!(self, Stage::Local)
    }
}

impl TryFrom<&String> for Stage {
    type Error = anyhow::Error;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Stage::Local),
            "production" => Ok(Stage::Production),
            other => Err(anyhow!("unknown stage: {other}")),
        }
    }
}
