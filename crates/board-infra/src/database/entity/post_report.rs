//! Post report entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub reporter_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub created_at: DateTimeWithTimeZone,
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
        from = "Column::ReporterId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Reporter,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for board_core::domain::PostReport {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            reporter_id: model.reporter_id,
            reason: model.reason,
            created_at: model.created_at.into(),
        }
    }
}

impl From<board_core::domain::PostReport> for ActiveModel {
    fn from(report: board_core::domain::PostReport) -> Self {
        Self {
            id: Set(report.id),
            post_id: Set(report.post_id),
            reporter_id: Set(report.reporter_id),
            reason: Set(report.reason),
            created_at: Set(report.created_at.into()),
        }
    }
}
