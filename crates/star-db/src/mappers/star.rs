//! Star reaction model -> entity mapper

use star_core::entities::StarReaction;
use star_core::value_objects::Snowflake;

use crate::models::StarReactionModel;

impl From<StarReactionModel> for StarReaction {
    fn from(model: StarReactionModel) -> Self {
        StarReaction {
            guild_id: Snowflake::new(model.guild_id),
            message_id: Snowflake::new(model.message_id),
            user_id: Snowflake::new(model.user_id),
            created_at: model.created_at,
        }
    }
}
