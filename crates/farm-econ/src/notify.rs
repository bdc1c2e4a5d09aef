//! Outcome-to-notification mapping for the presentation layer.

use crate::money::format_money;
use crate::{ActionKind, Applied, Outcome, Rejection};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Error => "error",
        })
    }
}

/// Transient message shown to the player after an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub description: Option<String>,
}

impl Notification {
    fn new(level: Level, message: String) -> Self {
        Self {
            level,
            message,
            description: None,
        }
    }

    fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Ok(applied) => Self::applied(applied),
            Err(rejection) => Self::rejected(rejection),
        }
    }

    pub fn applied(applied: &Applied) -> Self {
        match applied {
            Applied::Traveled { region, cost } => Self::new(
                Level::Success,
                format!(
                    "Traveled to {}! Cost: {}",
                    region.display_name,
                    format_money(*cost)
                ),
            )
            .with_description(format!(
                "Soil: {} (pH {})",
                region.soil_type, region.ph_range
            )),
            Applied::Planted { region, .. } => Self::new(
                Level::Success,
                format!("Seeds planted in {}!", region.display_name),
            )
            .with_description(format!(
                "Best crops here: {}",
                region.best_crops.join(", ")
            )),
            Applied::Harvested { reward } => Self::new(
                Level::Success,
                format!("Harvested crops! Earned {}", format_money(*reward)),
            ),
            Applied::Upgraded { .. } => Self::new(
                Level::Success,
                "Farm upgraded! Increased production efficiency!".to_string(),
            ),
            Applied::Boosted { bonus, .. } => Self::new(
                Level::Success,
                format!("Star boost activated! Bonus: {}", format_money(*bonus)),
            ),
        }
    }

    pub fn rejected(rejection: &Rejection) -> Self {
        match rejection {
            Rejection::AlreadyThere { region } => {
                Self::new(Level::Info, format!("You're already in {region}"))
            }
            Rejection::InsufficientFunds { action, needed, .. } => {
                let message = match action {
                    ActionKind::Plant => "Not enough cash to plant!".to_string(),
                    other => format!("Need {} to {}!", format_money(*needed), other),
                };
                Self::new(Level::Error, message)
            }
            Rejection::InsufficientStars { needed, .. } => {
                Self::new(Level::Error, format!("Need {needed} stars to boost!"))
            }
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)?;
        if let Some(description) = &self.description {
            write!(f, "\n    {description}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_core::Region;

    #[test]
    fn travel_message_carries_soil() {
        let n = Notification::applied(&Applied::Traveled {
            region: Region::Europe.descriptor(),
            cost: 5_000,
        });
        assert_eq!(n.level, Level::Success);
        assert_eq!(n.message, "Traveled to Europe! Cost: $5,000");
        assert_eq!(
            n.description.as_deref(),
            Some("Soil: Temperate Neutral (pH 6.5 - 7)")
        );
    }

    #[test]
    fn plant_lists_crops() {
        let d = Region::Americas.descriptor();
        let n = Notification::applied(&Applied::Planted {
            region: d,
            best_crops: d.best_crops,
            cost: 1_000,
        });
        assert_eq!(n.message, "Seeds planted in Americas!");
        assert_eq!(
            n.description.as_deref(),
            Some("Best crops here: Coffee, Sugarcane")
        );
    }

    #[test]
    fn rejection_messages() {
        let already = Notification::rejected(&Rejection::AlreadyThere {
            region: Region::Africa,
        });
        assert_eq!(already.level, Level::Info);
        assert_eq!(already.message, "You're already in Africa");

        let travel = Notification::rejected(&Rejection::InsufficientFunds {
            action: ActionKind::Travel,
            needed: 5_000,
            available: 10,
        });
        assert_eq!(travel.message, "Need $5,000 to travel!");

        let upgrade = Notification::rejected(&Rejection::InsufficientFunds {
            action: ActionKind::Upgrade,
            needed: 10_000,
            available: 10,
        });
        assert_eq!(upgrade.message, "Need $10,000 to upgrade!");

        let plant = Notification::rejected(&Rejection::InsufficientFunds {
            action: ActionKind::Plant,
            needed: 1_000,
            available: 10,
        });
        assert_eq!(plant.message, "Not enough cash to plant!");

        let boost = Notification::rejected(&Rejection::InsufficientStars {
            needed: 10,
            available: 3,
        });
        assert_eq!(boost.level, Level::Error);
        assert_eq!(boost.message, "Need 10 stars to boost!");
    }

    #[test]
    fn display_indents_description() {
        let n = Notification::applied(&Applied::Traveled {
            region: Region::Africa.descriptor(),
            cost: 5_000,
        });
        assert_eq!(
            n.to_string(),
            "[success] Traveled to Africa! Cost: $5,000\n    Soil: Tropical Acidic (pH 5 - 6)"
        );
    }
}
