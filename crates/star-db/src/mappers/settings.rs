//! Settings model -> entity mapper

use star_core::entities::StarboardSettings;
use star_core::error::DomainError;
use star_core::value_objects::Snowflake;

use crate::models::SettingsModel;

/// Rows are re-validated; a threshold edited below 1 by hand is rejected
impl TryFrom<SettingsModel> for StarboardSettings {
    type Error = DomainError;

    fn try_from(model: SettingsModel) -> Result<Self, Self::Error> {
        StarboardSettings::new(
            Snowflake::new(model.guild_id),
            model.channel_id.map(Snowflake::new),
            model.threshold,
        )
    }
}
