//! User vote entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use board_core::domain::VoteType as DomainVoteType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum VoteType {
    #[sea_orm(string_value = "upvote")]
    Upvote,
    #[sea_orm(string_value = "downvote")]
    Downvote,
}

impl From<DomainVoteType> for VoteType {
    fn from(vote: DomainVoteType) -> Self {
        match vote {
            DomainVoteType::Upvote => VoteType::Upvote,
            DomainVoteType::Downvote => VoteType::Downvote,
        }
    }
}

impl From<VoteType> for DomainVoteType {
    fn from(vote: VoteType) -> Self {
        match vote {
            VoteType::Upvote => DomainVoteType::Upvote,
            VoteType::Downvote => DomainVoteType::Downvote,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_votes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub vote_type: VoteType,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for board_core::domain::UserVote {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            post_id: model.post_id,
            vote_type: model.vote_type.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<board_core::domain::UserVote> for ActiveModel {
    fn from(vote: board_core::domain::UserVote) -> Self {
        Self {
            id: Set(vote.id),
            user_id: Set(vote.user_id),
            post_id: Set(vote.post_id),
            vote_type: Set(vote.vote_type.into()),
            created_at: Set(vote.created_at.into()),
            updated_at: Set(vote.updated_at.into()),
        }
    }
}
