//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use board_core::domain::PostStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Status {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "Declined")]
    Declined,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl From<PostStatus> for Status {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Pending => Status::Pending,
            PostStatus::Approved => Status::Approved,
            PostStatus::Declined => Status::Declined,
            PostStatus::Admin => Status::Admin,
        }
    }
}

impl From<Status> for PostStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => PostStatus::Pending,
            Status::Approved => PostStatus::Approved,
            Status::Declined => PostStatus::Declined,
            Status::Admin => PostStatus::Admin,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_by: Uuid,
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub status: Status,
    pub upvotes: i32,
    pub downvotes: i32,
    pub report_count: i32,
    pub submitted_at: DateTimeWithTimeZone,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
    pub review_msg: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::post_report::Entity")]
    PostReport,
    #[sea_orm(has_many = "super::user_vote::Entity")]
    UserVote,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostReport.def()
    }
}

impl Related<super::user_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserVote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for board_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            created_by: model.created_by,
            category: model.category,
            content: model.content,
            status: model.status.into(),
            upvotes: model.upvotes,
            downvotes: model.downvotes,
            report_count: model.report_count,
            submitted_at: model.submitted_at.into(),
            reviewed_at: model.reviewed_at.map(Into::into),
            review_msg: model.review_msg,
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<board_core::domain::Post> for ActiveModel {
    fn from(post: board_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            created_by: Set(post.created_by),
            category: Set(post.category),
            content: Set(post.content),
            status: Set(post.status.into()),
            upvotes: Set(post.upvotes),
            downvotes: Set(post.downvotes),
            report_count: Set(post.report_count),
            submitted_at: Set(post.submitted_at.into()),
            reviewed_at: Set(post.reviewed_at.map(Into::into)),
            review_msg: Set(post.review_msg),
        }
    }
}
