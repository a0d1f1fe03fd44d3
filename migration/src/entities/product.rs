use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub external_link: String,
    pub clicks: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_analytics::Entity")]
    ProductAnalytics,
}

impl Related<super::product_analytics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductAnalytics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
