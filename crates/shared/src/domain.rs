use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub name: String,
    pub abv: f64,
    pub ibu: u32,
    pub description: String,
    pub image_url: String,
}

impl Product {
    pub fn theme(&self) -> IbuTheme {
        IbuTheme::from_ibu(self.ibu)
    }

    /// ABV rendered with one decimal, e.g. `5.2%`.
    pub fn abv_label(&self) -> String {
        format!("{:.1}%", self.abv)
    }
}

/// Bitterness bucket used to pick card colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IbuTheme {
    Low,
    Mid,
    High,
    Extreme,
}

impl IbuTheme {
    pub fn from_ibu(ibu: u32) -> Self {
        if ibu < 25 {
            Self::Low
        } else if ibu < 50 {
            Self::Mid
        } else if ibu < 75 {
            Self::High
        } else {
            Self::Extreme
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
            Self::Extreme => "extreme",
        }
    }
}
