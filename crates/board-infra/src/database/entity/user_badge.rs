//! Awarded badge entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use board_core::domain::{Badge, UserBadge};
use board_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_badges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// Stable badge code, see [`Badge::code`].
    pub badge: String,
    pub awarded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Unknown badge codes surface as query errors.
impl TryFrom<Model> for UserBadge {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let badge: Badge = model
            .badge
            .parse()
            .map_err(|_| RepoError::Query(format!("Unknown badge code '{}'", model.badge)))?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            badge,
            awarded_at: model.awarded_at.into(),
        })
    }
}

impl From<UserBadge> for ActiveModel {
    fn from(award: UserBadge) -> Self {
        Self {
            id: Set(award.id),
            user_id: Set(award.user_id),
            badge: Set(award.badge.code().to_string()),
            awarded_at: Set(award.awarded_at.into()),
        }
    }
}
